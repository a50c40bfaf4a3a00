//! # heapwatch
//!
//! Human-readable, periodic text reports over a host runtime's allocator
//! and garbage-collector statistics.
//!
//! ## Core
//!
//! 1. **Pause history reader**: reconstructs "most recent N samples,
//!    newest first" from a fixed 256-slot circular buffer plus a logical
//!    write count, across wrap-around and partial fill
//! 2. **Report renderer**: formats each enabled section of a statistics
//!    snapshot: summary counters, heap breakdown, bookkeeping overhead,
//!    size-class histogram, pause history
//!
//! The renderer is a pure function from (snapshot, options) to text: it
//! holds no state, takes no locks, and is bounded at 256 iterations per
//! history line.
//!
//! ## Usage Example
//!
//! ```ignore
//! use heapwatch::{render_report, ReportOptions, SyntheticHeap, Workload, WorkloadConfig};
//!
//! let config = WorkloadConfig::default();
//! let mut heap = SyntheticHeap::new(&config)?;
//! let mut workload = Workload::new(&config);
//! workload.step(&mut heap);
//! print!("{}", render_report(&heap.snapshot(), &ReportOptions::default()));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod history; // circular pause-history reader
pub mod report; // section renderers and report assembly
pub mod snapshot; // point-in-time statistics structures

// Harness (stand-in for the host runtime; not consulted by the core)
pub mod harness;

// Re-exports for convenience
pub use harness::{HarnessError, SyntheticHeap, Workload, WorkloadConfig};
pub use history::{PauseHistory, SampleStyle, HISTORY_SLOTS};
pub use report::{display_limit, render_report, ReportOptions};
pub use snapshot::{
    GcSummary, HeapBreakdown, SizeClassStats, StatsSnapshot, SystemOverhead,
};
