//! Instrumented synthetic heap
//!
//! Stands in for the host runtime the reporter would normally sample: it
//! accounts allocations against a size-class ladder, defers frees until a
//! collection sweeps them, and records every pause into the two history
//! rings. All quantities are bookkeeping only (no real memory is held),
//! which keeps long demo runs cheap while exercising every snapshot
//! field.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::{HarnessError, WorkloadConfig};
use crate::history::{PauseHistory, HISTORY_SLOTS};
use crate::snapshot::{
    GcSummary, HeapBreakdown, SizeClassStats, StatsSnapshot, SystemOverhead,
};

/// Span granularity for system-byte accounting.
const SPAN_BYTES: u64 = 64 * 1024;
/// Bookkeeping bytes per span.
const SPAN_HEADER_BYTES: u64 = 96;
/// Idle spans kept resident rather than returned to the OS.
const SPAN_RESERVE_BYTES: u64 = 4 * 1024 * 1024;
/// Collection floor: targets never drop below this.
const MIN_TARGET_BYTES: u64 = 4 * 1024 * 1024;
/// Fixed per-thread cache accounting.
const CACHE_IN_USE_BYTES: u64 = 16 * 1024;
const CACHE_SYS_BYTES: u64 = 32 * 1024;
/// Fixed profiling hash-table accounting.
const HASH_SYS_BYTES: u64 = 16 * 1024;
/// Fixed miscellaneous off-heap accounting.
const OTHER_SYS_BYTES: u64 = 64 * 1024;
/// Fixed stack accounting for the sampling thread.
const STACK_IN_USE_BYTES: u64 = 256 * 1024;
const STACK_SYS_BYTES: u64 = 512 * 1024;

/// Per-class cumulative counters plus garbage pending the next sweep.
#[derive(Debug, Clone)]
struct ClassCounter {
    size: u64,
    allocs: u64,
    frees: u64,
    pending_frees: u64,
}

/// The synthetic allocator/collector the workload drives.
#[derive(Debug)]
pub struct SyntheticHeap {
    growth_percent: u32,

    // Allocator accounting
    bytes_allocated: u64,
    in_use_bytes: u64,
    peak_bytes: u64,
    alloc_count: u64,
    free_count: u64,
    classes: Vec<ClassCounter>,

    // Collector state
    collections: u64,
    forced_collections: u64,
    next_target: u64,
    total_pause_ns: u64,
    last_pause_end: u64,
    pause_durations: PauseHistory,
    pause_ends: PauseHistory,

    started: Instant,
}

impl SyntheticHeap {
    /// Build a heap over the configured size-class ladder.
    pub fn new(config: &WorkloadConfig) -> Result<Self, HarnessError> {
        config.validate()?;

        let mut sizes: Vec<u64> = config.block_sizes.iter().map(|&s| s as u64).collect();
        sizes.sort_unstable();
        sizes.dedup();
        let classes = sizes
            .into_iter()
            .map(|size| ClassCounter {
                size,
                allocs: 0,
                frees: 0,
                pending_frees: 0,
            })
            .collect();

        Ok(Self {
            growth_percent: config.growth_percent,
            bytes_allocated: 0,
            in_use_bytes: 0,
            peak_bytes: 0,
            alloc_count: 0,
            free_count: 0,
            classes,
            collections: 0,
            forced_collections: 0,
            next_target: MIN_TARGET_BYTES,
            total_pause_ns: 0,
            last_pause_end: 0,
            pause_durations: PauseHistory::new(),
            pause_ends: PauseHistory::new(),
            started: Instant::now(),
        })
    }

    /// Account one allocation of `size` bytes.
    pub fn alloc(&mut self, size: usize) {
        let class = self.class_index(size as u64);
        let charged = self.classes[class].size;
        self.classes[class].allocs += 1;
        self.alloc_count += 1;
        self.bytes_allocated += charged;
        self.in_use_bytes += charged;
        self.peak_bytes = self.peak_bytes.max(self.in_use_bytes);
    }

    /// Mark a previously allocated block of `size` bytes as garbage.
    ///
    /// The bytes stay "in use" until the next collection sweeps them; only
    /// then do the free counters move.
    pub fn release(&mut self, size: usize) {
        let class = self.class_index(size as u64);
        self.classes[class].pending_frees += 1;
    }

    /// Collect if in-use bytes have reached the growth target.
    ///
    /// Returns whether a collection ran.
    pub fn maybe_collect(&mut self) -> bool {
        if self.in_use_bytes >= self.next_target {
            self.run_collection(false);
            true
        } else {
            false
        }
    }

    /// Run a collection immediately, regardless of the growth target.
    pub fn force_collect(&mut self) {
        self.run_collection(true);
    }

    /// Completed collections so far.
    pub fn collections(&self) -> u64 {
        self.collections
    }

    fn run_collection(&mut self, forced: bool) {
        let pause_start = Instant::now();

        let mut swept = 0u64;
        let mut freed = 0u64;
        for class in &mut self.classes {
            class.frees += class.pending_frees;
            freed += class.pending_frees;
            swept += class.pending_frees * class.size;
            class.pending_frees = 0;
        }
        self.free_count += freed;
        self.in_use_bytes = self.in_use_bytes.saturating_sub(swept);

        let live = self.in_use_bytes;
        self.next_target =
            (live + live / 100 * self.growth_percent as u64).max(MIN_TARGET_BYTES);

        // A sub-nanosecond sweep would record a raw zero, which the ring
        // reads as an unwritten slot.
        let pause_ns = (pause_start.elapsed().as_nanos() as u64).max(1);
        let end_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1);

        self.collections += 1;
        if forced {
            self.forced_collections += 1;
        }
        self.total_pause_ns += pause_ns;
        self.last_pause_end = end_ns;
        self.pause_durations.record(self.collections, pause_ns);
        self.pause_ends.record(self.collections, end_ns);

        debug!(
            collection = self.collections,
            forced,
            swept_bytes = swept,
            live_bytes = live,
            next_target = self.next_target,
            pause_ns,
            "collection complete"
        );
    }

    /// Assemble a point-in-time statistics snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        let heap_sys = ceil_span(self.peak_bytes);
        let heap_in_use = ceil_span(self.in_use_bytes);
        let heap_idle = heap_sys.saturating_sub(heap_in_use);

        let overhead = SystemOverhead {
            span_in_use: (heap_in_use / SPAN_BYTES) * SPAN_HEADER_BYTES,
            span_from_system: (heap_sys / SPAN_BYTES) * SPAN_HEADER_BYTES,
            cache_in_use: CACHE_IN_USE_BYTES,
            cache_from_system: CACHE_SYS_BYTES,
            hash_from_system: HASH_SYS_BYTES,
            gc_from_system: 2 * (HISTORY_SLOTS as u64) * 8,
            other_from_system: OTHER_SYS_BYTES,
        };
        let overhead_sys = overhead.span_from_system
            + overhead.cache_from_system
            + overhead.hash_from_system
            + overhead.gc_from_system
            + overhead.other_from_system;

        let elapsed_ns = self.started.elapsed().as_nanos() as u64;
        let cpu_fraction = if elapsed_ns > 0 {
            self.total_pause_ns as f64 / elapsed_ns as f64
        } else {
            0.0
        };

        StatsSnapshot {
            bytes_in_use: self.in_use_bytes,
            bytes_allocated: self.bytes_allocated,
            bytes_from_system: heap_sys + STACK_SYS_BYTES + overhead_sys,
            pointer_lookups: 0,
            alloc_count: self.alloc_count,
            free_count: self.free_count,
            heap: HeapBreakdown {
                allocated: self.in_use_bytes,
                from_system: heap_sys,
                idle: heap_idle,
                in_use: heap_in_use,
                released: heap_idle.saturating_sub(SPAN_RESERVE_BYTES),
                objects: self.alloc_count - self.free_count,
                stack_in_use: STACK_IN_USE_BYTES,
                stack_from_system: STACK_SYS_BYTES,
            },
            overhead,
            size_classes: self
                .classes
                .iter()
                .map(|c| SizeClassStats {
                    size: c.size,
                    allocs: c.allocs,
                    frees: c.frees,
                })
                .collect(),
            collections: self.collections,
            pause_durations: self.pause_durations.clone(),
            pause_ends: self.pause_ends.clone(),
            gc: GcSummary {
                next_target_bytes: self.next_target,
                last_pause_end: self.last_pause_end,
                total_pause_ns: self.total_pause_ns,
                forced_collections: self.forced_collections,
                cpu_fraction,
            },
        }
    }

    /// Smallest class that fits `size`; oversized requests land in the
    /// largest class.
    fn class_index(&self, size: u64) -> usize {
        self.classes
            .iter()
            .position(|c| c.size >= size)
            .unwrap_or(self.classes.len() - 1)
    }
}

fn ceil_span(bytes: u64) -> u64 {
    bytes.div_ceil(SPAN_BYTES) * SPAN_BYTES
}
