//! Kernel configuration word layout
//!
//! The firmware packs boot policy into a single 64-bit word queried via
//! `ConfigItem::KernelConfiguration`. This module knows its bit layout:
//! bits [11:10] select the memory mode, bit 3 is the resource-region
//! sizing flag.

use serde::{Deserialize, Serialize};

/// Bit position of the resource-region sizing flag.
pub(crate) const RESOURCE_REGION_SIZE_BIT: u32 = 3;

/// Bit position of the two-bit memory mode field.
pub(crate) const MEMORY_MODE_SHIFT: u32 = 10;
pub(crate) const MEMORY_MODE_MASK: u64 = 0x3;

const FOUR_GIB: u64 = 0x1_0000_0000;
const SIX_GIB: u64 = 0x1_8000_0000;
const EIGHT_GIB: u64 = 0x2_0000_0000;

/// How much DRAM the kernel is configured to assume, independent of what
/// is physically installed.
///
/// The hardware only ever reports a small closed set of encodings;
/// anything unrecognized falls back to the smallest (and therefore
/// safest) size rather than failing the boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryMode {
    /// 4 GiB
    FourGib,
    /// 6 GiB
    SixGib,
    /// 8 GiB
    EightGib,
}

impl MemoryMode {
    /// Decodes the memory mode from a kernel configuration word
    pub fn from_kernel_configuration(word: u64) -> Self {
        match (word >> MEMORY_MODE_SHIFT) & MEMORY_MODE_MASK {
            1 => MemoryMode::SixGib,
            2 => MemoryMode::EightGib,
            // 0 is the 4 GiB encoding; invalid encodings also land here.
            _ => MemoryMode::FourGib,
        }
    }

    /// Returns the DRAM size in bytes this mode stands for
    pub fn intended_size(&self) -> u64 {
        match self {
            MemoryMode::FourGib => FOUR_GIB,
            MemoryMode::SixGib => SIX_GIB,
            MemoryMode::EightGib => EIGHT_GIB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_with_mode(mode_bits: u64) -> u64 {
        mode_bits << MEMORY_MODE_SHIFT
    }

    #[test]
    fn test_decode_table() {
        assert_eq!(
            MemoryMode::from_kernel_configuration(word_with_mode(0)),
            MemoryMode::FourGib
        );
        assert_eq!(
            MemoryMode::from_kernel_configuration(word_with_mode(1)),
            MemoryMode::SixGib
        );
        assert_eq!(
            MemoryMode::from_kernel_configuration(word_with_mode(2)),
            MemoryMode::EightGib
        );
        // The one remaining 2-bit encoding is invalid and must fall back
        // to 4 GiB.
        assert_eq!(
            MemoryMode::from_kernel_configuration(word_with_mode(3)),
            MemoryMode::FourGib
        );
    }

    #[test]
    fn test_decode_ignores_unrelated_bits() {
        let word = word_with_mode(1) | 0xFFFF_FFFF_FFFF_F3FF;
        assert_eq!(
            MemoryMode::from_kernel_configuration(word),
            MemoryMode::SixGib
        );
    }

    #[test]
    fn test_intended_sizes() {
        assert_eq!(MemoryMode::FourGib.intended_size(), 4 << 30);
        assert_eq!(MemoryMode::SixGib.intended_size(), 6 << 30);
        assert_eq!(MemoryMode::EightGib.intended_size(), 8 << 30);
    }
}
