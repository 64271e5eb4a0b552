//! Firmware/secure-monitor call gate abstraction

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the configuration query interface this kernel speaks.
pub const CONFIG_VERSION: u32 = 1;

/// Largest random-byte request the firmware accepts in one call.
///
/// The monitor fills a fixed-size buffer on its side; requests beyond
/// this limit are a caller contract violation, not a transient failure.
pub const RANDOM_BYTES_MAX: usize = 0x38;

/// Errors that can occur on a firmware call
///
/// Every failure at this boundary is unrecoverable for the kernel: there
/// is no degraded mode for boot-time memory layout or randomness. Callers
/// propagate these upward until the machine is halted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FirmwareError {
    /// The monitor refused a register access
    #[error("Register access rejected: {address:#x}")]
    RegisterRejected { address: u32 },

    /// The monitor does not know the requested configuration item
    #[error("Unsupported configuration item: {0:?}")]
    UnsupportedConfigItem(ConfigItem),

    /// The random source produced no data
    #[error("Random source unavailable")]
    RandomSourceUnavailable,

    /// Random request larger than the monitor's fixed buffer
    #[error("Random request of {requested} bytes exceeds firmware buffer of {limit}")]
    RandomRequestTooLarge { requested: usize, limit: usize },
}

/// Opaque configuration items the firmware can be queried for.
///
/// Item identifiers are part of the monitor call ABI and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigItem {
    /// Board/SoC revision word
    HardwareType,
    /// Raw memory-mode selector (also folded into `KernelConfiguration`)
    MemoryMode,
    /// Whether the monitor was booted with debugging facilities enabled
    IsDebugMode,
    /// Packed kernel configuration word (see `system_control` for layout)
    KernelConfiguration,
}

impl ConfigItem {
    /// Returns the wire identifier used on the monitor call
    pub fn item_id(&self) -> u32 {
        match self {
            ConfigItem::HardwareType => 5,
            ConfigItem::MemoryMode => 10,
            ConfigItem::IsDebugMode => 11,
            ConfigItem::KernelConfiguration => 12,
        }
    }
}

/// Synchronous call gate to the higher-privilege firmware layer.
///
/// Each call either succeeds or leaves the caller with no recovery path;
/// there is no partial-failure handling at this layer. Implementations
/// back this with the platform's secure-monitor call instruction; tests
/// back it with `sim_firmware::SimFirmware`.
pub trait FirmwareChannel {
    /// Reads and optionally writes a named hardware-control register.
    ///
    /// Bits of `value` selected by `mask` are written; the value the
    /// register held before the write is returned. A pure read passes
    /// `mask = 0, value = 0`.
    fn read_write_register(
        &mut self,
        address: u32,
        mask: u32,
        value: u32,
    ) -> Result<u32, FirmwareError>;

    /// Queries an opaque configuration word by item identifier.
    fn get_config(&mut self, config_version: u32, item: ConfigItem) -> Result<u64, FirmwareError>;

    /// Fills `dst` with firmware-sourced random data.
    ///
    /// `dst.len()` must not exceed [`RANDOM_BYTES_MAX`].
    fn generate_random_bytes(&mut self, dst: &mut [u8]) -> Result<(), FirmwareError>;

    /// Requests a firmware-level panic display with a diagnostic code.
    ///
    /// Does not return. Hardware implementations must loop forever after
    /// issuing the monitor call in case the monitor ever hands control
    /// back.
    fn panic(&mut self, code: u32) -> !;
}
