//! Identifiers for system entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a physical CPU core.
///
/// Cores are numbered densely from zero. Per-core kernel state (such as
/// the FPU register cache) is indexed by this identifier; it is assigned
/// at bring-up and never changes for the lifetime of the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoreId(pub usize);

impl CoreId {
    /// Returns the core index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core{}", self.0)
    }
}
