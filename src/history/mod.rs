//! Fixed-capacity pause history
//!
//! The collector records one duration and one end timestamp per completed
//! collection. Both series live in 256-slot circular buffers: the sample
//! for collection `k` (1-based) sits at physical slot `(k - 1) % 256`, so
//! once the logical write count passes 256 the newest sample overwrites
//! the oldest. Reconstructing "most recent first" order from the raw slots
//! plus the logical count is the job of [`PauseHistory::recent`]; raw
//! indexed access is deliberately not exposed so the wrap-around rules
//! stay in one place.

use crate::report::units;

/// Number of physical slots in a pause history ring.
pub const HISTORY_SLOTS: usize = 256;

/// How a raw 64-bit sample is rendered.
///
/// A history holds either pause lengths or pause-end timestamps; one
/// rendered line never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStyle {
    /// Pause length in nanoseconds, e.g. `12.4ms`.
    Duration,
    /// Absolute nanosecond timestamp, shown as UTC time of day,
    /// e.g. `15:04:05.99`.
    WallClock,
}

/// Fixed 256-slot circular buffer of per-collection samples.
///
/// A slot holding zero has never been written (the buffer starts zeroed
/// and fills slot by slot); the reader skips such slots rather than
/// reporting a zero-length sample. Writers must therefore never record a
/// raw zero; the synthetic heap clamps recorded pauses to 1ns.
#[derive(Clone)]
pub struct PauseHistory {
    slots: [u64; HISTORY_SLOTS],
}

// Serde's derive stops at 32-element arrays; serialize the slots as a
// plain sequence instead.
#[cfg(feature = "visualize")]
impl serde::Serialize for PauseHistory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.slots.iter())
    }
}

impl PauseHistory {
    /// Create an empty (all slots unwritten) history.
    pub fn new() -> Self {
        Self {
            slots: [0; HISTORY_SLOTS],
        }
    }

    /// Record the sample for collection number `seq` (1-based).
    ///
    /// Overwrites whatever the slot held 256 collections ago.
    pub fn record(&mut self, seq: u64, value: u64) {
        debug_assert!(seq > 0, "collection numbers are 1-based");
        self.slots[((seq - 1) % HISTORY_SLOTS as u64) as usize] = value;
    }

    /// The most recent samples, newest first, as `(collection, value)`
    /// pairs.
    ///
    /// `written` is the logical write count (total collections completed);
    /// it may exceed the slot count, in which case the walk covers the 256
    /// surviving samples. `limit` caps the number of returned entries;
    /// `None` returns every valid entry. Unwritten (zero) slots are
    /// skipped without counting against the limit.
    pub fn recent(&self, written: u64, limit: Option<usize>) -> Vec<(u64, u64)> {
        let cap = limit.unwrap_or(HISTORY_SLOTS);
        let mut out = Vec::new();
        if written == 0 || cap == 0 {
            return out;
        }
        // At most min(written, 256) candidate offsets: offsets past the
        // write count would alias slots no logical write has reached, and
        // offsets past the capacity would revisit slots already examined.
        let span = written.min(HISTORY_SLOTS as u64);
        for i in 0..span {
            // i < written, so this cannot underflow.
            let idx = ((written - 1 - i) % HISTORY_SLOTS as u64) as usize;
            let value = self.slots[idx];
            if value == 0 {
                continue;
            }
            out.push((written - i, value));
            if out.len() == cap {
                break;
            }
        }
        out
    }

    /// Render one labelled history line: `"<label>: <seq>: <value>, ..."`.
    ///
    /// Entries are comma-separated, newest first, each prefixed with its
    /// collection number. With no valid entries (a zero write count or an
    /// all-zero buffer) the line is just the label. The output always ends
    /// with exactly one newline.
    pub fn render(
        &self,
        label: &str,
        written: u64,
        limit: Option<usize>,
        style: SampleStyle,
    ) -> String {
        let mut out = format!("{}: ", label);
        for (i, (seq, value)) in self.recent(written, limit).into_iter().enumerate() {
            if i != 0 {
                out.push_str(", ");
            }
            let figure = match style {
                SampleStyle::Duration => units::duration_ns(value),
                SampleStyle::WallClock => units::clock_ns(value),
            };
            out.push_str(&format!("{}: {}", seq, figure));
        }
        out.push('\n');
        out
    }
}

impl Default for PauseHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PauseHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let written = self.slots.iter().filter(|&&v| v != 0).count();
        f.debug_struct("PauseHistory")
            .field("slots", &HISTORY_SLOTS)
            .field("written", &written)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_places_sample_by_collection_number() {
        let mut ring = PauseHistory::new();
        ring.record(1, 11);
        ring.record(2, 22);
        let entries = ring.recent(2, None);
        assert_eq!(entries, vec![(2, 22), (1, 11)]);
    }

    #[test]
    fn ring_wraps_at_capacity() {
        let mut ring = PauseHistory::new();
        for seq in 1..=(HISTORY_SLOTS as u64 + 1) {
            ring.record(seq, seq);
        }
        let entries = ring.recent(HISTORY_SLOTS as u64 + 1, None);
        // Collection 257 overwrote collection 1's slot.
        assert_eq!(entries.len(), HISTORY_SLOTS);
        assert_eq!(entries.first(), Some(&(257, 257)));
        assert_eq!(entries.last(), Some(&(2, 2)));
    }

    #[test]
    fn unwritten_slots_are_skipped_not_counted() {
        let mut ring = PauseHistory::new();
        ring.record(1, 10);
        ring.record(3, 30);
        // Collection 2 never recorded: its slot stays zero.
        let entries = ring.recent(3, Some(2));
        assert_eq!(entries, vec![(3, 30), (1, 10)]);
    }

    #[test]
    fn limit_zero_renders_no_entries() {
        let mut ring = PauseHistory::new();
        ring.record(1, 10);
        assert!(ring.recent(1, Some(0)).is_empty());
    }

    #[test]
    fn render_separates_entries_with_commas() {
        let mut ring = PauseHistory::new();
        ring.record(1, 1_000);
        ring.record(2, 2_000);
        let line = ring.render("PauseNs", 2, None, SampleStyle::Duration);
        assert_eq!(line, "PauseNs: 2: 2µs, 1: 1µs\n");
    }

    #[test]
    fn render_empty_is_bare_label() {
        let ring = PauseHistory::new();
        let line = ring.render("PauseNs", 0, None, SampleStyle::Duration);
        assert_eq!(line, "PauseNs: \n");
    }
}
