//! Firmware call audit trail
//!
//! Records every call crossing the simulated firmware channel so tests
//! can assert on the traffic an operation implies.
//!
//! ## Philosophy
//!
//! - Test-only: this is NOT production logging, it's for test verification
//! - Deterministic: calls are recorded in order for reproducible tests
//! - Queryable: tests can assert on the trail to verify boundary behavior
//!   (for example, that a layout query re-reads firmware on every call)

use hal::ConfigItem;
use serde::{Deserialize, Serialize};

/// A single call observed on the firmware channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirmwareCall {
    /// A register read/write (pure reads carry `mask == 0`)
    RegisterReadWrite { address: u32, mask: u32 },

    /// A configuration word query
    ConfigQuery { item: ConfigItem },

    /// A random-byte request
    RandomBytes { len: usize },

    /// A panic/halt request
    PanicRequest { code: u32 },
}

/// Chronological record of firmware channel traffic
#[derive(Debug, Default)]
pub struct FirmwareCallLog {
    calls: Vec<FirmwareCall>,
}

impl FirmwareCallLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    /// Records a call
    pub fn record(&mut self, call: FirmwareCall) {
        self.calls.push(call);
    }

    /// Returns all recorded calls in order
    pub fn calls(&self) -> &[FirmwareCall] {
        &self.calls
    }

    /// Returns how many times `address` was accessed
    pub fn register_accesses(&self, address: u32) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, FirmwareCall::RegisterReadWrite { address: a, .. } if *a == address))
            .count()
    }

    /// Returns how many configuration queries were made for `item`
    pub fn config_queries(&self, item: ConfigItem) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, FirmwareCall::ConfigQuery { item: i } if *i == item))
            .count()
    }

    /// Returns how many random-byte requests were made
    pub fn random_requests(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, FirmwareCall::RandomBytes { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_counts_by_kind() {
        let mut log = FirmwareCallLog::new();
        log.record(FirmwareCall::RegisterReadWrite {
            address: 0x10,
            mask: 0,
        });
        log.record(FirmwareCall::ConfigQuery {
            item: ConfigItem::KernelConfiguration,
        });
        log.record(FirmwareCall::RandomBytes { len: 8 });
        log.record(FirmwareCall::RandomBytes { len: 8 });

        assert_eq!(log.register_accesses(0x10), 1);
        assert_eq!(log.register_accesses(0x20), 0);
        assert_eq!(log.config_queries(ConfigItem::KernelConfiguration), 1);
        assert_eq!(log.random_requests(), 2);
    }

    #[test]
    fn test_calls_serialize_for_snapshots() {
        let call = FirmwareCall::ConfigQuery {
            item: ConfigItem::KernelConfiguration,
        };
        let json = serde_json::to_string(&call).unwrap();
        assert!(json.contains("KernelConfiguration"));
    }
}
