//! Deterministic fault injection for the simulated firmware
//!
//! Allows tests to make specific monitor calls fail, to verify that the
//! kernel treats every firmware failure as unrecoverable.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: faults fire on exact calls, never randomly
//! - **Composable**: multiple faults can be queued on one plan
//! - **Test-focused**: not intended for production use
//!
//! ## Example
//!
//! ```
//! use sim_firmware::fault_injection::{FaultPlan, FirmwareFault};
//!
//! let plan = FaultPlan::new()
//!     .with_fault(FirmwareFault::RejectRegisterAccess { address: 0x7001_9050, count: 1 })
//!     .with_fault(FirmwareFault::FailRandomSource { count: 2 });
//! ```

use hal::ConfigItem;

/// A fault to inject into the firmware channel
#[derive(Debug, Clone)]
pub enum FirmwareFault {
    /// Reject the next N accesses to a specific register
    RejectRegisterAccess { address: u32, count: usize },

    /// Fail the next N configuration queries for an item
    FailConfigQuery { item: ConfigItem, count: usize },

    /// Fail the next N random-byte requests
    FailRandomSource { count: usize },
}

/// A queue of faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<FirmwareFault>,
}

impl FaultPlan {
    /// Creates an empty fault plan
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Adds a fault to the plan
    pub fn with_fault(mut self, fault: FirmwareFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Consumes one pending register fault for `address`, if any
    pub fn take_register_fault(&mut self, address: u32) -> bool {
        self.take(|f| {
            matches!(f, FirmwareFault::RejectRegisterAccess { address: a, .. } if *a == address)
        })
    }

    /// Consumes one pending configuration fault for `item`, if any
    pub fn take_config_fault(&mut self, item: ConfigItem) -> bool {
        self.take(|f| matches!(f, FirmwareFault::FailConfigQuery { item: i, .. } if *i == item))
    }

    /// Consumes one pending random-source fault, if any
    pub fn take_random_fault(&mut self) -> bool {
        self.take(|f| matches!(f, FirmwareFault::FailRandomSource { .. }))
    }

    fn take(&mut self, matches: impl Fn(&FirmwareFault) -> bool) -> bool {
        let idx = match self.faults.iter().position(matches) {
            Some(idx) => idx,
            None => return false,
        };
        let exhausted = match &mut self.faults[idx] {
            FirmwareFault::RejectRegisterAccess { count, .. }
            | FirmwareFault::FailConfigQuery { count, .. }
            | FirmwareFault::FailRandomSource { count } => {
                *count -= 1;
                *count == 0
            }
        };
        if exhausted {
            self.faults.remove(idx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_fault_fires_exactly_count_times() {
        let mut plan = FaultPlan::new().with_fault(FirmwareFault::RejectRegisterAccess {
            address: 0x10,
            count: 2,
        });
        assert!(plan.take_register_fault(0x10));
        assert!(plan.take_register_fault(0x10));
        assert!(!plan.take_register_fault(0x10));
    }

    #[test]
    fn test_faults_are_address_specific() {
        let mut plan = FaultPlan::new().with_fault(FirmwareFault::RejectRegisterAccess {
            address: 0x10,
            count: 1,
        });
        assert!(!plan.take_register_fault(0x20));
        assert!(plan.take_register_fault(0x10));
    }

    #[test]
    fn test_random_and_config_faults() {
        let mut plan = FaultPlan::new()
            .with_fault(FirmwareFault::FailRandomSource { count: 1 })
            .with_fault(FirmwareFault::FailConfigQuery {
                item: ConfigItem::KernelConfiguration,
                count: 1,
            });
        assert!(plan.take_random_fault());
        assert!(!plan.take_random_fault());
        assert!(plan.take_config_fault(ConfigItem::KernelConfiguration));
        assert!(!plan.take_config_fault(ConfigItem::KernelConfiguration));
    }
}
