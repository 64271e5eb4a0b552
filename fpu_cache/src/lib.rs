//! # Lazy FPU Register Cache
//!
//! This crate defers saving and restoring a core's extended
//! floating-point/SIMD register file until it is actually needed, by
//! tracking per core whether the hardware file currently matches a known
//! snapshot and whether a write-back is owed.
//!
//! ## Philosophy
//!
//! - **Core-affine, no locks**: each physical core owns exactly one
//!   cache, mutated only by code running on that core. Concurrency
//!   safety comes from never touching another core's cache, not from
//!   locking.
//! - **Explicit core parameter**: callers reach their cache through
//!   [`FpuCacheSet::cache_for`] with an explicit [`CoreId`]; there is no
//!   hidden "current core" global.
//! - **Serialized transitions**: the valid/dirty transitions take a
//!   [`CriticalSection`] token. An interrupt arriving mid-save or
//!   mid-restore would corrupt one context's floating-point state, so
//!   the type system demands proof that interrupts are masked.
//!
//! Getting this wrong is silent and catastrophic: a missed write-back
//! leaks one execution context's floating-point state into another.

use core_types::CoreId;
use hal::interrupts::CriticalSection;
use hal::{FpuBackend, FpuFile};
use serde::{Deserialize, Serialize};

/// Observable state of a per-core cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheState {
    /// Content is meaningless; hardware ownership is unassigned
    Invalid,
    /// Snapshot matches the hardware file; no write-back owed
    Clean,
    /// Content diverges from the last saved snapshot; write-back owed
    /// before the snapshot may be discarded or reassigned
    Dirty,
}

/// Cached extended register file for one physical core.
pub struct FpuRegisterCache {
    file: FpuFile,
    core_id: CoreId,
    valid: bool,
    dirty: bool,
}

impl FpuRegisterCache {
    fn new(core_id: CoreId) -> Self {
        Self {
            file: FpuFile::zeroed(),
            core_id,
            valid: false,
            dirty: false,
        }
    }

    /// Returns the core this cache belongs to (fixed at creation)
    pub fn core_id(&self) -> CoreId {
        self.core_id
    }

    /// Whether the cache holds a real snapshot
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether a write-back is owed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the three-way state the bookkeeping flags encode.
    ///
    /// Dirty wins over valid: divergent content may still live only in
    /// the hardware file, not yet pulled into the cache.
    pub fn state(&self) -> CacheState {
        if self.dirty {
            CacheState::Dirty
        } else if self.valid {
            CacheState::Clean
        } else {
            CacheState::Invalid
        }
    }

    /// Ensures the cache holds a real snapshot and returns it.
    ///
    /// If the cache is invalid, the live hardware file is pulled in;
    /// otherwise the existing snapshot is returned with no hardware
    /// interaction. Repeated calls without an intervening invalidate
    /// perform the pull only once. This is the lazy-restore entry point,
    /// typically reached from the trap raised by the first
    /// floating-point instruction a context executes after being
    /// scheduled.
    pub fn read_registers(
        &mut self,
        hw: &mut dyn FpuBackend,
        _cs: &CriticalSection<'_>,
    ) -> &FpuFile {
        if !self.valid {
            self.file = hw.read_file();
            self.valid = true;
        }
        &self.file
    }

    /// Installs a logical owner's saved file into the hardware and the
    /// cache, leaving the cache clean.
    ///
    /// Completes a lazy restore when the incoming context has a saved
    /// snapshot in its persistent storage slot.
    pub fn restore_registers(
        &mut self,
        hw: &mut dyn FpuBackend,
        saved: &FpuFile,
        _cs: &CriticalSection<'_>,
    ) {
        hw.write_file(saved);
        self.file = saved.clone();
        self.valid = true;
        self.dirty = false;
    }

    /// Mutates the cached snapshot on behalf of the owner and marks a
    /// write-back owed.
    ///
    /// The cache must be valid; that precondition is scheduling
    /// discipline, not a runtime check.
    pub fn update_registers(&mut self, f: impl FnOnce(&mut FpuFile)) {
        debug_assert!(self.valid);
        f(&mut self.file);
        self.dirty = true;
    }

    /// Records that the hardware file may have diverged from the last
    /// saved snapshot.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Writes the owed content into the owner's persistent storage slot
    /// and clears the write-back obligation. Not dirty: no-op.
    ///
    /// If the divergent content was never pulled into the cache, it is
    /// pulled from the hardware first.
    pub fn commit_registers(
        &mut self,
        hw: &mut dyn FpuBackend,
        save_area: &mut FpuFile,
        _cs: &CriticalSection<'_>,
    ) {
        if !self.dirty {
            return;
        }
        if !self.valid {
            self.file = hw.read_file();
            self.valid = true;
        }
        *save_area = self.file.clone();
        self.dirty = false;
    }

    /// Commits any owed content, then marks the cache invalid so the
    /// next access on this core re-fetches.
    ///
    /// Used at the end of a context switch once the outgoing context's
    /// state is safely saved.
    pub fn clean_invalidate(
        &mut self,
        hw: &mut dyn FpuBackend,
        save_area: &mut FpuFile,
        cs: &CriticalSection<'_>,
    ) {
        self.commit_registers(hw, save_area, cs);
        self.valid = false;
    }
}

/// One [`FpuRegisterCache`] per physical core, for the lifetime of the
/// kernel.
///
/// Caches are never destroyed or migrated; at core shutdown the entry is
/// simply abandoned.
pub struct FpuCacheSet {
    caches: Vec<FpuRegisterCache>,
}

impl FpuCacheSet {
    /// Creates one invalid cache per core
    pub fn new(core_count: usize) -> Self {
        Self {
            caches: (0..core_count).map(|i| FpuRegisterCache::new(CoreId(i))).collect(),
        }
    }

    /// Returns the number of cores
    pub fn core_count(&self) -> usize {
        self.caches.len()
    }

    /// Returns the cache owned by `core_id`, with no hardware
    /// interaction.
    ///
    /// Must only be called from code running on that core.
    pub fn cache_for(&mut self, core_id: CoreId) -> &mut FpuRegisterCache {
        &mut self.caches[core_id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::InterruptHal;
    use sim_firmware::{SimFpu, SimInterrupts};

    fn live_file(tag: u128) -> FpuFile {
        let mut file = FpuFile::zeroed();
        file.q[0] = tag;
        file.fpsr = 0x1;
        file
    }

    #[test]
    fn test_initial_state_is_invalid() {
        let mut set = FpuCacheSet::new(2);
        let cache = set.cache_for(CoreId(0));
        assert_eq!(cache.state(), CacheState::Invalid);
        assert!(!cache.is_valid());
        assert!(!cache.is_dirty());
        assert_eq!(cache.core_id(), CoreId(0));
    }

    #[test]
    fn test_read_pulls_hardware_once() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0xAB));
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));

        let cs = CriticalSection::enter(&mut ints);
        let snapshot = cache.read_registers(&mut hw, &cs).clone();
        assert_eq!(snapshot, live_file(0xAB));
        assert_eq!(cache.state(), CacheState::Clean);

        // Second read must not touch the hardware again.
        let again = cache.read_registers(&mut hw, &cs).clone();
        assert_eq!(again, snapshot);
        assert_eq!(hw.pull_count(), 1);
    }

    #[test]
    fn test_commit_clears_dirty_and_writes_save_area() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0xCD));
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));
        let mut save_area = FpuFile::zeroed();

        let cs = CriticalSection::enter(&mut ints);
        cache.read_registers(&mut hw, &cs);
        cache.mark_dirty();
        assert_eq!(cache.state(), CacheState::Dirty);

        cache.commit_registers(&mut hw, &mut save_area, &cs);
        assert_eq!(cache.state(), CacheState::Clean);
        assert!(cache.is_valid());
        assert_eq!(save_area, live_file(0xCD));
    }

    #[test]
    fn test_commit_is_noop_when_clean() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0xEE));
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));
        let mut save_area = FpuFile::zeroed();

        let cs = CriticalSection::enter(&mut ints);
        cache.read_registers(&mut hw, &cs);
        cache.commit_registers(&mut hw, &mut save_area, &cs);

        assert_eq!(save_area, FpuFile::zeroed());
        assert_eq!(hw.pull_count(), 1);
    }

    #[test]
    fn test_commit_pulls_hardware_when_dirty_but_never_read() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0x77));
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));
        let mut save_area = FpuFile::zeroed();

        // A trap recorded divergence before anything was cached.
        cache.mark_dirty();
        assert_eq!(cache.state(), CacheState::Dirty);
        assert!(!cache.is_valid());

        let cs = CriticalSection::enter(&mut ints);
        cache.commit_registers(&mut hw, &mut save_area, &cs);
        assert_eq!(save_area, live_file(0x77));
        assert_eq!(cache.state(), CacheState::Clean);
    }

    #[test]
    fn test_clean_invalidate_ends_invalid_from_any_state() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0x11));
        let mut save_area = FpuFile::zeroed();

        // From Invalid.
        let mut set = FpuCacheSet::new(1);
        let cs = CriticalSection::enter(&mut ints);
        let cache = set.cache_for(CoreId(0));
        cache.clean_invalidate(&mut hw, &mut save_area, &cs);
        assert_eq!(cache.state(), CacheState::Invalid);

        // From Clean.
        cache.read_registers(&mut hw, &cs);
        cache.clean_invalidate(&mut hw, &mut save_area, &cs);
        assert_eq!(cache.state(), CacheState::Invalid);

        // From Dirty; the owed content must be written back first.
        cache.read_registers(&mut hw, &cs);
        cache.update_registers(|file| file.q[1] = 0x22);
        cache.clean_invalidate(&mut hw, &mut save_area, &cs);
        assert_eq!(cache.state(), CacheState::Invalid);
        assert_eq!(save_area.q[1], 0x22);
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0x01));
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));
        let mut save_area = FpuFile::zeroed();

        let cs = CriticalSection::enter(&mut ints);
        cache.read_registers(&mut hw, &cs);
        cache.clean_invalidate(&mut hw, &mut save_area, &cs);

        // New live content appears while the cache is invalid.
        hw.clobber(live_file(0x02));
        let snapshot = cache.read_registers(&mut hw, &cs).clone();
        assert_eq!(snapshot, live_file(0x02));
        assert_eq!(hw.pull_count(), 2);
    }

    #[test]
    fn test_restore_installs_saved_file() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::with_file(live_file(0xAA));
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));

        let saved = live_file(0xBB);
        let cs = CriticalSection::enter(&mut ints);
        cache.restore_registers(&mut hw, &saved, &cs);

        assert_eq!(hw.file(), &saved);
        assert_eq!(hw.push_count(), 1);
        assert_eq!(cache.state(), CacheState::Clean);
        assert_eq!(cache.read_registers(&mut hw, &cs), &saved);
        // The restore primed the cache; no pull happened.
        assert_eq!(hw.pull_count(), 0);
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::new();
        let mut set = FpuCacheSet::new(1);
        let cache = set.cache_for(CoreId(0));

        let cs = CriticalSection::enter(&mut ints);
        cache.read_registers(&mut hw, &cs);
        cache.update_registers(|file| file.fpcr = 0x300_0000);
        assert_eq!(cache.state(), CacheState::Dirty);
    }

    #[test]
    fn test_cores_have_independent_caches() {
        let mut ints = SimInterrupts::new();
        let mut hw0 = SimFpu::with_file(live_file(0x0A));
        let mut set = FpuCacheSet::new(2);

        let cs = CriticalSection::enter(&mut ints);
        set.cache_for(CoreId(0)).read_registers(&mut hw0, &cs);
        assert_eq!(set.cache_for(CoreId(0)).state(), CacheState::Clean);
        assert_eq!(set.cache_for(CoreId(1)).state(), CacheState::Invalid);
        assert_eq!(set.cache_for(CoreId(1)).core_id(), CoreId(1));
    }

    #[test]
    fn test_transitions_run_with_interrupts_masked() {
        let mut ints = SimInterrupts::new();
        let mut hw = SimFpu::new();
        let mut set = FpuCacheSet::new(1);

        {
            let cs = CriticalSection::enter(&mut ints);
            set.cache_for(CoreId(0)).read_registers(&mut hw, &cs);
        }
        assert!(ints.interrupts_enabled());
        assert_eq!(ints.disable_count(), 1);
    }

    #[test]
    fn test_cache_state_serializes() {
        let json = serde_json::to_string(&CacheState::Dirty).unwrap();
        assert_eq!(json, "\"Dirty\"");
    }
}
