//! Simulated FPU register file

use hal::{FpuBackend, FpuFile};

/// Simulated live FPU register file for one core.
///
/// Counts pulls and pushes so tests can verify the lazy-switch logic
/// touches the hardware exactly as often as it should.
#[derive(Debug, Default)]
pub struct SimFpu {
    file: FpuFile,
    pulls: usize,
    pushes: usize,
}

impl SimFpu {
    /// Creates a simulated FPU with a zeroed register file
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulated FPU with the given live content
    pub fn with_file(file: FpuFile) -> Self {
        Self {
            file,
            pulls: 0,
            pushes: 0,
        }
    }

    /// Overwrites the live file, as if the running context executed
    /// floating-point instructions behind the kernel's back
    pub fn clobber(&mut self, file: FpuFile) {
        self.file = file;
    }

    /// Returns the live file content
    pub fn file(&self) -> &FpuFile {
        &self.file
    }

    /// Number of times the full file was read out
    pub fn pull_count(&self) -> usize {
        self.pulls
    }

    /// Number of times the full file was written
    pub fn push_count(&self) -> usize {
        self.pushes
    }
}

impl FpuBackend for SimFpu {
    fn read_file(&mut self) -> FpuFile {
        self.pulls += 1;
        self.file.clone()
    }

    fn write_file(&mut self, file: &FpuFile) {
        self.pushes += 1;
        self.file = file.clone();
    }
}
