//! Text report rendering
//!
//! Turns a [`StatsSnapshot`] plus a set of section toggles into a
//! human-oriented text report: one block per enabled section, blocks
//! separated by a blank line. Rendering is a pure function: no state is
//! retained between calls, and the same snapshot and options always
//! produce byte-identical output.

pub mod units;

use crate::history::SampleStyle;
use crate::snapshot::StatsSnapshot;

/// Which report sections to render, and how deep the pause history goes.
///
/// Constructed once (typically from CLI flags) and passed by reference
/// into every render call; there is no process-wide mutable configuration.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Memory summary, heap breakdown, and collector summary lines.
    pub memory: bool,
    /// System overhead line (off by default).
    pub overhead: bool,
    /// Per-size-class allocation histogram.
    pub size_classes: bool,
    /// Pause duration and pause-end history lines.
    pub gc_history: bool,
    /// Most recent pause entries to render; `None` renders all of them.
    pub history_limit: Option<usize>,
}

impl Default for ReportOptions {
    /// Everything except the overhead section, full history depth.
    fn default() -> Self {
        Self {
            memory: true,
            overhead: false,
            size_classes: true,
            gc_history: true,
            history_limit: None,
        }
    }
}

/// Normalize a flag-level history depth into a limit.
///
/// Zero and negative values mean "no cap": render every valid entry (the
/// ring capacity still bounds the walk).
pub fn display_limit(raw: i64) -> Option<usize> {
    if raw <= 0 {
        None
    } else {
        Some(raw as usize)
    }
}

/// Render the full report: one block per enabled section, blank line
/// between blocks.
///
/// A section that produces no lines (e.g. a histogram with only empty
/// classes) is dropped rather than rendered as a stray blank block.
pub fn render_report(snapshot: &StatsSnapshot, options: &ReportOptions) -> String {
    let mut sections = Vec::new();
    if options.memory {
        sections.push(memory_section(snapshot));
    }
    if options.overhead {
        sections.push(overhead_section(snapshot));
    }
    if options.size_classes {
        sections.push(size_class_section(snapshot));
    }
    if options.gc_history {
        sections.push(gc_history_section(snapshot, options.history_limit));
    }
    sections.retain(|s| !s.is_empty());
    sections.join("\n")
}

/// Summary counters, heap breakdown, and the collector summary line.
fn memory_section(s: &StatsSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "InUse={}, TotalAlloc={}, Sys={}, Lookups={}, Mallocs={}, Frees={}\n",
        units::si_bytes(s.bytes_in_use),
        units::si_bytes(s.bytes_allocated),
        units::si_bytes(s.bytes_from_system),
        units::si_count(s.pointer_lookups),
        units::si_count(s.alloc_count),
        units::si_count(s.free_count),
    ));
    out.push_str(&format!(
        "HeapAlloc={}, HeapSys={}, HeapIdle={}, HeapInuse={}, HeapReleased={}, HeapObjects={}, StackInuse={}, StackSys={}\n",
        units::si_bytes(s.heap.allocated),
        units::si_bytes(s.heap.from_system),
        units::si_bytes(s.heap.idle),
        units::si_bytes(s.heap.in_use),
        units::si_bytes(s.heap.released),
        units::si_count(s.heap.objects),
        units::si_bytes(s.heap.stack_in_use),
        units::si_bytes(s.heap.stack_from_system),
    ));
    out.push_str(&format!(
        "NextGC={}, NumGC={}, LastPause={}, PauseTotal={}, ForcedGC={}, GCCPUFraction={:.2}\n",
        units::si_bytes(s.gc.next_target_bytes),
        s.collections,
        units::clock_ns(s.gc.last_pause_end),
        units::duration_ns(s.gc.total_pause_ns),
        s.gc.forced_collections,
        s.gc.cpu_fraction,
    ));
    out
}

/// Bookkeeping overhead, plain un-humanized integers.
fn overhead_section(s: &StatsSnapshot) -> String {
    format!(
        "SpanInuse={}, SpanSys={}, CacheInuse={}, CacheSys={}, HashSys={}, GCSys={}, OtherSys={}\n",
        s.overhead.span_in_use,
        s.overhead.span_from_system,
        s.overhead.cache_in_use,
        s.overhead.cache_from_system,
        s.overhead.hash_from_system,
        s.overhead.gc_from_system,
        s.overhead.other_from_system,
    )
}

/// One line per non-empty size class, ascending class order.
fn size_class_section(s: &StatsSnapshot) -> String {
    let mut out = String::new();
    for (idx, class) in s.size_classes.iter().enumerate() {
        if class.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "class[{}]: size={}, allocs={}, frees={}\n",
            idx, class.size, class.allocs, class.frees,
        ));
    }
    out
}

/// The two pause history lines, both driven by the shared collection
/// count and the same display limit.
fn gc_history_section(s: &StatsSnapshot, limit: Option<usize>) -> String {
    let mut out = s
        .pause_durations
        .render("PauseNs", s.collections, limit, SampleStyle::Duration);
    out.push_str(&s.pause_ends.render(
        "PauseEnd",
        s.collections,
        limit,
        SampleStyle::WallClock,
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SizeClassStats;

    #[test]
    fn display_limit_zero_and_negative_mean_uncapped() {
        assert_eq!(display_limit(0), None);
        assert_eq!(display_limit(-5), None);
        assert_eq!(display_limit(8), Some(8));
    }

    #[test]
    fn disabled_sections_render_nothing() {
        let snapshot = StatsSnapshot::default();
        let options = ReportOptions {
            memory: false,
            overhead: false,
            size_classes: false,
            gc_history: false,
            history_limit: None,
        };
        assert_eq!(render_report(&snapshot, &options), "");
    }

    #[test]
    fn histogram_skips_empty_classes() {
        let mut snapshot = StatsSnapshot::default();
        snapshot.size_classes = vec![
            SizeClassStats {
                size: 1024,
                allocs: 0,
                frees: 0,
            },
            SizeClassStats {
                size: 2048,
                allocs: 5,
                frees: 2,
            },
        ];
        let section = size_class_section(&snapshot);
        assert_eq!(section, "class[1]: size=2048, allocs=5, frees=2\n");
    }
}
