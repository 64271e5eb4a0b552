//! Simulated per-core interrupt mask

use hal::InterruptHal;

/// Simulated interrupt mask for one core
#[derive(Debug)]
pub struct SimInterrupts {
    enabled: bool,
    disables: usize,
}

impl SimInterrupts {
    /// Creates a simulated mask with interrupts enabled
    pub fn new() -> Self {
        Self {
            enabled: true,
            disables: 0,
        }
    }

    /// Number of times interrupts were disabled
    pub fn disable_count(&self) -> usize {
        self.disables
    }
}

impl Default for SimInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptHal for SimInterrupts {
    fn enable_interrupts(&mut self) {
        self.enabled = true;
    }

    fn disable_interrupts(&mut self) {
        self.enabled = false;
        self.disables += 1;
    }

    fn interrupts_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::CriticalSection;

    #[test]
    fn test_critical_section_restores_mask_state() {
        let mut ints = SimInterrupts::new();
        {
            let _cs = CriticalSection::enter(&mut ints);
        }
        assert!(ints.interrupts_enabled());
        assert_eq!(ints.disable_count(), 1);
    }

    #[test]
    fn test_critical_section_does_not_reenable_when_nested() {
        let mut ints = SimInterrupts::new();
        ints.disable_interrupts();
        {
            let _cs = CriticalSection::enter(&mut ints);
        }
        assert!(!ints.interrupts_enabled());
    }
}
