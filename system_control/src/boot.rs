//! Boot-time memory layout derivation

use crate::{Fatal, SystemControl};
use core_types::PhysicalAddress;
use hal::FirmwareChannel;
use serde::{Deserialize, Serialize};

/// Memory-layout facts derived once at boot.
///
/// After derivation the firmware is not consulted again for layout; the
/// caller owns this value for the lifetime of the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootMemoryLayout {
    /// Kernel physical base, after the slide rule
    pub kernel_base: PhysicalAddress,
    /// Whether memory-region sizing should use the enlarged resource
    /// region
    pub increase_resource_region_size: bool,
}

impl BootMemoryLayout {
    /// Derives the layout from firmware, starting from a nominal base.
    pub fn derive<F: FirmwareChannel>(
        sysctl: &mut SystemControl<F>,
        nominal_base: PhysicalAddress,
    ) -> Result<Self, Fatal> {
        Ok(Self {
            kernel_base: sysctl.kernel_physical_base_address(nominal_base)?,
            increase_resource_region_size: sysctl.should_increase_resource_region_size()?,
        })
    }
}
