//! Human-readable value formatting
//!
//! Byte and count figures use decimal SI prefixes with at most three
//! fractional digits, trailing zeros trimmed. Durations and wall-clock
//! times follow the shapes described in the report module docs.

use chrono::{DateTime, Timelike};

/// Decimal SI scale table, largest first.
const SCALES: [(f64, &str); 6] = [
    (1e18, "E"),
    (1e15, "P"),
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Format a byte quantity with an SI prefix, e.g. `1.536MB`.
pub fn si_bytes(v: u64) -> String {
    si(v, "B")
}

/// Format a bare count with an SI prefix, e.g. `1.2K`.
pub fn si_count(v: u64) -> String {
    si(v, "")
}

fn si(v: u64, unit: &str) -> String {
    for (scale, prefix) in SCALES {
        if v as f64 >= scale {
            return format!("{}{}{}", trim_fraction(v as f64 / scale), prefix, unit);
        }
    }
    format!("{}{}", v, unit)
}

/// Render with three fractional digits, then drop trailing zeros.
fn trim_fraction(x: f64) -> String {
    let mut s = format!("{x:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Format a nanosecond duration: `500ns`, `12.345µs`, `12.4ms`, `2.5s`,
/// `1m2.5s`, `1h2m3s`.
///
/// Sub-second values pick the largest unit that keeps the integer part
/// non-zero; at and above one second the value decomposes into h/m/s with
/// the fraction attached to the seconds figure.
pub fn duration_ns(ns: u64) -> String {
    if ns == 0 {
        return "0s".to_string();
    }
    if ns < 1_000 {
        return format!("{}ns", ns);
    }
    if ns < 1_000_000 {
        return format!("{}µs", trim_fraction(ns as f64 / 1e3));
    }
    if ns < 1_000_000_000 {
        return format!("{}ms", trim_fraction(ns as f64 / 1e6));
    }

    let total_secs = ns / 1_000_000_000;
    let frac = trim_fraction((ns % 1_000_000_000) as f64 / 1e9);
    // trim_fraction leaves "0" for a whole number of seconds
    let frac_digits = frac.strip_prefix("0.").unwrap_or("");

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if frac_digits.is_empty() {
        out.push_str(&format!("{}s", seconds));
    } else {
        out.push_str(&format!("{}.{}s", seconds, frac_digits));
    }
    out
}

/// Format an absolute nanosecond timestamp as UTC time of day,
/// `15:04:05.99` shape: hundredths precision, trailing zeros trimmed,
/// fraction omitted entirely when zero.
pub fn clock_ns(ns: u64) -> String {
    let dt = DateTime::from_timestamp_nanos(ns as i64);
    let base = format!("{:02}:{:02}:{:02}", dt.hour(), dt.minute(), dt.second());
    let hundredths = dt.nanosecond() / 10_000_000;
    if hundredths == 0 {
        base
    } else if hundredths % 10 == 0 {
        format!("{}.{}", base, hundredths / 10)
    } else {
        format!("{}.{:02}", base, hundredths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn si_bytes_below_scale_is_plain() {
        assert_eq!(si_bytes(0), "0B");
        assert_eq!(si_bytes(999), "999B");
    }

    #[test]
    fn si_bytes_scales_and_trims() {
        assert_eq!(si_bytes(1_000), "1KB");
        assert_eq!(si_bytes(1_536), "1.536KB");
        assert_eq!(si_bytes(12_400_000), "12.4MB");
        assert_eq!(si_bytes(2_000_000_000), "2GB");
    }

    #[test]
    fn si_count_has_no_unit_suffix() {
        assert_eq!(si_count(42), "42");
        assert_eq!(si_count(1_200), "1.2K");
    }

    #[test]
    fn duration_sub_second_units() {
        assert_eq!(duration_ns(0), "0s");
        assert_eq!(duration_ns(500), "500ns");
        assert_eq!(duration_ns(12_345), "12.345µs");
        assert_eq!(duration_ns(12_400_000), "12.4ms");
    }

    #[test]
    fn duration_seconds_and_above() {
        assert_eq!(duration_ns(2_500_000_000), "2.5s");
        assert_eq!(duration_ns(62_500_000_000), "1m2.5s");
        assert_eq!(duration_ns(3_723_000_000_000), "1h2m3s");
    }

    #[test]
    fn clock_trims_trailing_zeros() {
        // 15:04:05 UTC plus fractions
        let base_ns = (15 * 3600 + 4 * 60 + 5) * 1_000_000_000u64;
        assert_eq!(clock_ns(base_ns), "15:04:05");
        assert_eq!(clock_ns(base_ns + 990_000_000), "15:04:05.99");
        assert_eq!(clock_ns(base_ns + 500_000_000), "15:04:05.5");
        assert_eq!(clock_ns(base_ns + 120_000_000), "15:04:05.12");
    }
}
