//! # Core Types
//!
//! This crate defines the fundamental types used throughout the Talus
//! kernel core.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: per-core state is reached through an
//!   explicit [`CoreId`], never through a hidden "current core" global.
//! - **Type safety first**: physical addresses are a distinct type and
//!   cannot be confused with plain integers or sizes.
//!
//! ## Key Types
//!
//! - [`CoreId`]: Identifier for a physical CPU core
//! - [`PhysicalAddress`]: A physical memory address

pub mod addr;
pub mod ids;

pub use addr::PhysicalAddress;
pub use ids::CoreId;
