//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines hardware and firmware abstraction traits.
//!
//! ## Philosophy
//!
//! **Privileged collaborators must be fully abstracted and swappable.**
//!
//! The secure-monitor call gate, the raw FPU register file, and interrupt
//! masking are the three boundaries this kernel core touches. Each is a
//! trait so that architecture-specific crates can implement it and so
//! that tests can substitute a deterministic simulation.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: All firmware and hardware access goes through traits
//! 2. **No ambient authority**: callers hold a channel, they do not reach
//!    for a global
//! 3. **Testable**: every trait here has a simulated implementation

pub mod firmware;
pub mod fpu;
pub mod interrupts;

pub use firmware::{ConfigItem, FirmwareChannel, FirmwareError, CONFIG_VERSION, RANDOM_BYTES_MAX};
pub use fpu::{FpuBackend, FpuFile, FPU_REGISTER_COUNT};
pub use interrupts::{CriticalSection, InterruptHal};
