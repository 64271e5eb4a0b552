//! # Kernel Core Contract Tests
//!
//! This crate provides "golden" tests for the firmware-facing behavior
//! of the kernel core, to ensure it doesn't drift accidentally over
//! time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: hardware/firmware contracts are written
//!   as code
//! - **Testability first**: contract tests fail when derived layout,
//!   randomness, or lazy-switch behavior changes
//! - **Deterministic**: every test seeds its own random source
//!
//! ## Structure
//!
//! - [`layout`]: memory-mode decode table and slide-rule boundaries
//! - [`randomness`]: size contract, rejection-sampling uniformity, halt
//!   paths
//! - [`fpu`]: full context-switch scenarios over the lazy register cache

pub mod fpu;
pub mod layout;
pub mod randomness;

/// Common helpers for building a plausibly-configured firmware
pub mod test_helpers {
    use hal::ConfigItem;
    use sim_firmware::SimFirmware;
    use system_control::{SystemControl, MEMORY_CONTROLLER_CONFIG_REGISTER};

    /// One GiB in bytes.
    pub const GIB: u64 = 1 << 30;

    /// Builds a kernel configuration word from its documented fields.
    pub fn kernel_config_word(memory_mode_bits: u64, increase_rrs: bool) -> u64 {
        (memory_mode_bits << 10) | (u64::from(increase_rrs) << 3)
    }

    /// Builds a firmware reporting `installed` bytes of DRAM and the
    /// given kernel configuration word.
    pub fn firmware_with_board(installed: u64, config_word: u64) -> SimFirmware {
        SimFirmware::new()
            .with_register(
                MEMORY_CONTROLLER_CONFIG_REGISTER,
                ((installed >> 20) & 0x3FFF) as u32,
            )
            .with_config(ConfigItem::KernelConfiguration, config_word)
    }

    /// Builds a system control facade over a board with `installed`
    /// DRAM and the given memory-mode bits.
    pub fn system_control_for(installed: u64, memory_mode_bits: u64) -> SystemControl<SimFirmware> {
        SystemControl::new(firmware_with_board(
            installed,
            kernel_config_word(memory_mode_bits, false),
        ))
    }
}
