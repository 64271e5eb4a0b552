//! Interrupt masking abstraction

/// Interrupt masking for the current core
///
/// Different architectures mask interrupts differently, but all can
/// implement this trait.
pub trait InterruptHal {
    /// Enables interrupts
    fn enable_interrupts(&mut self);

    /// Disables interrupts
    fn disable_interrupts(&mut self);

    /// Returns whether interrupts are enabled
    fn interrupts_enabled(&self) -> bool;
}

/// Token proving that interrupts are masked on the current core.
///
/// Operations that must not be interleaved with trap handlers (the FPU
/// cache valid/dirty transitions) take a `&CriticalSection` so that the
/// type system enforces the masking requirement. Entering saves the
/// previous mask state and dropping restores it, so sections nest.
pub struct CriticalSection<'a> {
    hal: &'a mut dyn InterruptHal,
    was_enabled: bool,
}

impl<'a> CriticalSection<'a> {
    /// Masks interrupts and returns the token
    pub fn enter(hal: &'a mut dyn InterruptHal) -> Self {
        let was_enabled = hal.interrupts_enabled();
        hal.disable_interrupts();
        Self { hal, was_enabled }
    }
}

impl Drop for CriticalSection<'_> {
    fn drop(&mut self) {
        if self.was_enabled {
            self.hal.enable_interrupts();
        }
    }
}
