//! Fatal error kind

use hal::FirmwareError;
use thiserror::Error;

/// Diagnostic code for a deliberate halt request.
pub const STOP_PANIC_CODE: u32 = 0xF00;

/// A non-recoverable condition.
///
/// There is no degraded mode for boot-time memory layout or randomness,
/// so nothing in this enum is ever caught or retried. Callers propagate
/// it with `?` until the boot path hands it to
/// [`SystemControl::halt_on`](crate::SystemControl::halt_on), which maps
/// it to a diagnostic panic code and stops the machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Fatal {
    /// A firmware call failed
    #[error("Firmware call failed: {0}")]
    Firmware(#[from] FirmwareError),

    /// A caller violated the random-byte size contract
    #[error("Random request of {requested} bytes exceeds the {limit}-byte firmware limit")]
    RandomRequestTooLarge { requested: usize, limit: usize },
}

impl Fatal {
    /// Returns the diagnostic code displayed when this condition halts
    /// the machine
    pub fn panic_code(&self) -> u32 {
        match self {
            Fatal::Firmware(_) => 0xF01,
            Fatal::RandomRequestTooLarge { .. } => 0xF02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_codes_are_distinct() {
        let firmware = Fatal::Firmware(FirmwareError::RandomSourceUnavailable);
        let contract = Fatal::RandomRequestTooLarge {
            requested: 57,
            limit: 56,
        };
        assert_ne!(firmware.panic_code(), contract.panic_code());
        assert_ne!(firmware.panic_code(), STOP_PANIC_CODE);
    }
}
