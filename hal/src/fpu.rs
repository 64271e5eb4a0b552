//! Raw FPU register file abstraction

/// Number of extended SIMD/FP registers in the file.
pub const FPU_REGISTER_COUNT: usize = 32;

/// A full snapshot of the extended floating-point register file.
///
/// 32 quad registers plus the hardware status and control words. The
/// encoding of `fpsr`/`fpcr` is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpuFile {
    /// Quad (128-bit) register contents
    pub q: [u128; FPU_REGISTER_COUNT],
    /// Floating-point status word
    pub fpsr: u64,
    /// Floating-point control word
    pub fpcr: u64,
}

impl FpuFile {
    /// Returns an all-zero register file
    pub fn zeroed() -> Self {
        Self {
            q: [0; FPU_REGISTER_COUNT],
            fpsr: 0,
            fpcr: 0,
        }
    }
}

impl Default for FpuFile {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Access to the live hardware FPU register file of the current core.
///
/// Implementations use platform-specific load/store instructions; the
/// simulation keeps the file in memory and counts accesses so tests can
/// verify laziness.
pub trait FpuBackend {
    /// Reads the entire live register file
    fn read_file(&mut self) -> FpuFile;

    /// Writes the entire live register file
    fn write_file(&mut self, file: &FpuFile);
}
