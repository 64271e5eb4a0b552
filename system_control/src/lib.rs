//! # System Control
//!
//! This crate translates firmware-level facts into kernel-usable facts:
//! the physical memory layout slide, a resource-region sizing policy bit,
//! bounded and ranged randomness, and the single point of non-recoverable
//! system halt.
//!
//! ## Philosophy
//!
//! - **The firmware channel is injected, never ambient**: every operation
//!   goes through the [`hal::FirmwareChannel`] the facade was built with,
//!   so tests substitute a simulation.
//! - **No degraded mode at boot**: a failing firmware call yields
//!   [`Fatal`], which propagates untouched until the machine halts.
//! - **Queries are not cached**: configuration reads hit firmware every
//!   call. These paths are boot-time-only by intent.

pub mod boot;
pub mod config;
pub mod error;

pub use config::MemoryMode;
pub use error::{Fatal, STOP_PANIC_CODE};

use config::RESOURCE_REGION_SIZE_BIT;
use core_types::PhysicalAddress;
use hal::{ConfigItem, FirmwareChannel, CONFIG_VERSION, RANDOM_BYTES_MAX};

/// Memory-controller configuration register exposed through the firmware
/// register gate. Bits [13:0] hold the installed DRAM size in MiB units.
pub const MEMORY_CONTROLLER_CONFIG_REGISTER: u32 = 0x7001_9050;

const DRAM_SIZE_FIELD_MASK: u32 = 0x3FFF;
const DRAM_SIZE_FIELD_SHIFT: u32 = 20;

/// Facade over the firmware channel for layout, randomness, and halt.
pub struct SystemControl<F: FirmwareChannel> {
    firmware: F,
}

impl<F: FirmwareChannel> SystemControl<F> {
    /// Creates the facade over a firmware channel
    pub fn new(firmware: F) -> Self {
        Self { firmware }
    }

    /// Returns the underlying channel (test inspection)
    pub fn firmware(&self) -> &F {
        &self.firmware
    }

    /// Installed DRAM size in bytes, read from the memory controller.
    fn real_memory_size(&mut self) -> Result<u64, Fatal> {
        let word = self
            .firmware
            .read_write_register(MEMORY_CONTROLLER_CONFIG_REGISTER, 0, 0)?;
        Ok(u64::from(word & DRAM_SIZE_FIELD_MASK) << DRAM_SIZE_FIELD_SHIFT)
    }

    fn kernel_configuration(&mut self) -> Result<u64, Fatal> {
        Ok(self
            .firmware
            .get_config(CONFIG_VERSION, ConfigItem::KernelConfiguration)?)
    }

    fn intended_memory_size(&mut self) -> Result<u64, Fatal> {
        let word = self.kernel_configuration()?;
        Ok(MemoryMode::from_kernel_configuration(word).intended_size())
    }

    /// Derives the kernel's physical base address.
    ///
    /// When the configured (intended) DRAM size is at least half of what
    /// is installed, the kernel region is slid forward to center it:
    /// `base + (real - intended) / 2`. Otherwise the nominal base is
    /// returned unchanged. The subtraction saturates; the intended size
    /// may legitimately exceed the installed size.
    ///
    /// Called once at boot; the result is owned by the caller thereafter.
    pub fn kernel_physical_base_address(
        &mut self,
        base: PhysicalAddress,
    ) -> Result<PhysicalAddress, Fatal> {
        let real = self.real_memory_size()?;
        let intended = self.intended_memory_size()?;
        if intended * 2 < real {
            Ok(base)
        } else {
            Ok(base.offset(real.saturating_sub(intended) / 2))
        }
    }

    /// Returns the resource-region sizing policy flag (bit 3 of the
    /// kernel configuration word).
    ///
    /// Re-reads firmware on every call; not meant for hot paths.
    pub fn should_increase_resource_region_size(&mut self) -> Result<bool, Fatal> {
        Ok((self.kernel_configuration()? >> RESOURCE_REGION_SIZE_BIT) & 1 != 0)
    }

    /// Fills `dst` with firmware-sourced randomness.
    ///
    /// Requests larger than [`hal::RANDOM_BYTES_MAX`] are a caller bug
    /// and come back as [`Fatal::RandomRequestTooLarge`].
    pub fn generate_random_bytes(&mut self, dst: &mut [u8]) -> Result<(), Fatal> {
        if dst.len() > RANDOM_BYTES_MAX {
            return Err(Fatal::RandomRequestTooLarge {
                requested: dst.len(),
                limit: RANDOM_BYTES_MAX,
            });
        }
        Ok(self.firmware.generate_random_bytes(dst)?)
    }

    /// Draws one full-width uniform random value.
    pub fn generate_random_u64(&mut self) -> Result<u64, Fatal> {
        let mut buf = [0u8; 8];
        self.generate_random_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Draws a uniform value from the inclusive range `[min, max]`.
    ///
    /// Rejection sampling eliminates modulo bias: draws at or above the
    /// largest multiple of the range size are discarded and redrawn. The
    /// loop is unbounded but expected to finish within two draws for any
    /// range. A range spanning the whole 64-bit domain is special-cased;
    /// every draw is already uniform there and the reduction would
    /// otherwise divide by a wrapped-to-zero range size.
    pub fn generate_random_range(&mut self, min: u64, max: u64) -> Result<u64, Fatal> {
        debug_assert!(min <= max);
        let range_size = max.wrapping_sub(min).wrapping_add(1);
        if range_size == 0 {
            return self.generate_random_u64();
        }
        let effective_max = (u64::MAX / range_size) * range_size;
        loop {
            let draw = self.generate_random_u64()?;
            if draw < effective_max {
                return Ok(draw % range_size + min);
            }
        }
    }

    /// Requests a firmware panic display and ceases all forward progress.
    ///
    /// Exists for unrecoverable kernel invariant violations; deliberately
    /// irreversible.
    pub fn stop_system(&mut self) -> ! {
        self.firmware.panic(STOP_PANIC_CODE)
    }

    /// Halts the machine with the diagnostic code of a fatal condition.
    ///
    /// The single funnel from [`Fatal`] to the firmware panic path.
    pub fn halt_on(&mut self, fatal: Fatal) -> ! {
        self.firmware.panic(fatal.panic_code())
    }
}
