//! Point-in-time runtime statistics
//!
//! A [`StatsSnapshot`] is an immutable-at-read-time view of a host
//! runtime's allocator and collector state, produced fresh on each
//! sampling tick, rendered once, then discarded. The report renderer
//! never mutates or retains one.

use crate::history::PauseHistory;

/// Heap and stack byte accounting.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct HeapBreakdown {
    /// Bytes of allocated heap objects, including not-yet-swept garbage.
    pub allocated: u64,
    /// Heap bytes obtained from the operating system.
    pub from_system: u64,
    /// Bytes in idle (unused) spans.
    pub idle: u64,
    /// Bytes in in-use spans.
    pub in_use: u64,
    /// Bytes of physical memory returned to the operating system.
    pub released: u64,
    /// Number of live heap objects.
    pub objects: u64,
    /// Stack bytes in use.
    pub stack_in_use: u64,
    /// Stack bytes obtained from the operating system.
    pub stack_from_system: u64,
}

/// Allocator bookkeeping overhead, outside the heap proper.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct SystemOverhead {
    /// Bytes of span metadata in use.
    pub span_in_use: u64,
    /// Bytes reserved for span metadata.
    pub span_from_system: u64,
    /// Bytes of per-thread cache structures in use.
    pub cache_in_use: u64,
    /// Bytes reserved for per-thread caches.
    pub cache_from_system: u64,
    /// Bytes of profiling hash tables.
    pub hash_from_system: u64,
    /// Bytes of collector metadata.
    pub gc_from_system: u64,
    /// Miscellaneous off-heap bytes.
    pub other_from_system: u64,
}

/// Cumulative allocation counters for one allocator size class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct SizeClassStats {
    /// Bucket size in bytes.
    pub size: u64,
    /// Cumulative allocations served from this class.
    pub allocs: u64,
    /// Cumulative frees returned to this class.
    pub frees: u64,
}

impl SizeClassStats {
    /// A class with no cumulative allocations is empty and omitted from
    /// rendered histograms.
    pub fn is_empty(&self) -> bool {
        self.allocs == 0
    }
}

/// Scalar collector summary fields.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct GcSummary {
    /// Heap size that triggers the next collection.
    pub next_target_bytes: u64,
    /// Absolute nanosecond timestamp of the last pause end.
    pub last_pause_end: u64,
    /// Cumulative nanoseconds spent paused since startup.
    pub total_pause_ns: u64,
    /// Collections explicitly requested rather than triggered by growth.
    pub forced_collections: u64,
    /// Fraction of available CPU time consumed by the collector.
    pub cpu_fraction: f64,
}

/// Complete allocator/GC statistics at one instant.
///
/// The two pause rings are parallel: both are indexed by the same logical
/// count, [`StatsSnapshot::collections`], which may exceed the ring
/// capacity once the buffers have wrapped.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct StatsSnapshot {
    /// Bytes of heap currently in use (can fall after a collection).
    pub bytes_in_use: u64,
    /// Cumulative bytes allocated since startup.
    pub bytes_allocated: u64,
    /// Total bytes obtained from the operating system.
    pub bytes_from_system: u64,
    /// Cumulative pointer lookups performed by the runtime.
    pub pointer_lookups: u64,
    /// Cumulative allocation count.
    pub alloc_count: u64,
    /// Cumulative free count.
    pub free_count: u64,
    /// Heap and stack byte breakdown.
    pub heap: HeapBreakdown,
    /// Off-heap bookkeeping overhead.
    pub overhead: SystemOverhead,
    /// Per-size-class cumulative counters, ascending by class index.
    pub size_classes: Vec<SizeClassStats>,
    /// Completed collections; the logical write count for both pause rings.
    pub collections: u64,
    /// Pause length, in nanoseconds, of each recent collection.
    pub pause_durations: PauseHistory,
    /// Absolute nanosecond timestamp at which each recent pause ended.
    pub pause_ends: PauseHistory,
    /// Scalar collector summary.
    pub gc: GcSummary,
}
