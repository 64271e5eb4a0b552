//! # Simulated Firmware
//!
//! This crate provides a simulated implementation of the HAL traits.
//!
//! ## Purpose
//!
//! The simulated firmware allows testing privileged kernel code without
//! hardware or a secure monitor:
//! - Runs under `cargo test`
//! - Deterministic (seeded randomness, no real concurrency)
//! - Fast (no monitor round trips)
//! - Inspectable (register state, call traffic, and FPU accesses are all
//!   visible to tests)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! Code that sits on a firmware contract is usually untestable because
//! the contract only exists on hardware. By providing a simulated monitor
//! from day one, the layout, randomness, and halt paths can be verified
//! in-process. This is not a "toy" or "mock" - it implements the full
//! channel contract, including its failure modes.

pub mod call_log;
pub mod fault_injection;
pub mod fpu;
pub mod interrupts;

mod rng;

pub use call_log::{FirmwareCall, FirmwareCallLog};
pub use fault_injection::{FaultPlan, FirmwareFault};
pub use fpu::SimFpu;
pub use interrupts::SimInterrupts;

use hal::{ConfigItem, FirmwareChannel, FirmwareError, RANDOM_BYTES_MAX};
use rng::SplitMix64;
use std::collections::HashMap;

/// Panic payload raised by [`SimFirmware::panic`].
///
/// The real monitor paints a diagnostic screen and never returns; the
/// simulation raises a Rust panic carrying the diagnostic code so tests
/// can observe the halt with `std::panic::catch_unwind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwarePanic {
    /// Diagnostic code passed to the monitor
    pub code: u32,
}

/// Simulated secure-monitor channel
///
/// Register and configuration state are supplied up front through the
/// builder methods; random data comes from a seeded generator. Unknown
/// registers and configuration items are rejected, which is also how the
/// unrecoverable-failure paths are exercised.
pub struct SimFirmware {
    registers: HashMap<u32, u32>,
    config: HashMap<ConfigItem, u64>,
    rng: SplitMix64,
    fault_plan: FaultPlan,
    call_log: FirmwareCallLog,
}

impl SimFirmware {
    /// Creates a simulated firmware with no registers or configuration
    /// and a fixed default random seed
    pub fn new() -> Self {
        Self {
            registers: HashMap::new(),
            config: HashMap::new(),
            rng: SplitMix64::new(0x5EED),
            fault_plan: FaultPlan::new(),
            call_log: FirmwareCallLog::new(),
        }
    }

    /// Sets the content of a hardware-control register
    pub fn with_register(mut self, address: u32, value: u32) -> Self {
        self.registers.insert(address, value);
        self
    }

    /// Sets the word returned for a configuration item
    pub fn with_config(mut self, item: ConfigItem, word: u64) -> Self {
        self.config.insert(item, word);
        self
    }

    /// Seeds the random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SplitMix64::new(seed);
        self
    }

    /// Installs a fault plan
    pub fn with_fault_plan(mut self, plan: FaultPlan) -> Self {
        self.fault_plan = plan;
        self
    }

    /// Returns the chronological log of calls that crossed the channel
    pub fn call_log(&self) -> &FirmwareCallLog {
        &self.call_log
    }

    /// Returns the current content of a register, if configured
    pub fn register(&self, address: u32) -> Option<u32> {
        self.registers.get(&address).copied()
    }
}

impl Default for SimFirmware {
    fn default() -> Self {
        Self::new()
    }
}

impl FirmwareChannel for SimFirmware {
    fn read_write_register(
        &mut self,
        address: u32,
        mask: u32,
        value: u32,
    ) -> Result<u32, FirmwareError> {
        self.call_log
            .record(FirmwareCall::RegisterReadWrite { address, mask });

        if self.fault_plan.take_register_fault(address) {
            return Err(FirmwareError::RegisterRejected { address });
        }

        let old = match self.registers.get(&address).copied() {
            Some(v) => v,
            None => return Err(FirmwareError::RegisterRejected { address }),
        };
        let new = (old & !mask) | (value & mask);
        self.registers.insert(address, new);
        Ok(old)
    }

    fn get_config(&mut self, _config_version: u32, item: ConfigItem) -> Result<u64, FirmwareError> {
        self.call_log.record(FirmwareCall::ConfigQuery { item });

        if self.fault_plan.take_config_fault(item) {
            return Err(FirmwareError::UnsupportedConfigItem(item));
        }

        self.config
            .get(&item)
            .copied()
            .ok_or(FirmwareError::UnsupportedConfigItem(item))
    }

    fn generate_random_bytes(&mut self, dst: &mut [u8]) -> Result<(), FirmwareError> {
        self.call_log
            .record(FirmwareCall::RandomBytes { len: dst.len() });

        if dst.len() > RANDOM_BYTES_MAX {
            return Err(FirmwareError::RandomRequestTooLarge {
                requested: dst.len(),
                limit: RANDOM_BYTES_MAX,
            });
        }
        if self.fault_plan.take_random_fault() {
            return Err(FirmwareError::RandomSourceUnavailable);
        }

        self.rng.fill_bytes(dst);
        Ok(())
    }

    fn panic(&mut self, code: u32) -> ! {
        self.call_log.record(FirmwareCall::PanicRequest { code });
        std::panic::panic_any(FirmwarePanic { code });
    }
}
