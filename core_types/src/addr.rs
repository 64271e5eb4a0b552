//! Physical address type

use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical memory address.
///
/// Distinct from virtual addresses and from plain sizes; arithmetic is
/// restricted to offsetting by a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalAddress(u64);

impl PhysicalAddress {
    /// Creates a physical address from a raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw address value
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the address offset forward by `bytes`.
    ///
    /// Overflow past the 64-bit physical space is a caller bug on the
    /// platforms this kernel targets; checked in debug builds.
    pub fn offset(&self, bytes: u64) -> Self {
        debug_assert!(self.0.checked_add(bytes).is_some());
        Self(self.0.wrapping_add(bytes))
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
