//! Clock parsing and the Q1-window boundary predicate (§4.6, §4.9).
//! These are pure functions with no I/O, tested directly against the
//! boundary values in spec §8.

use log::warn;

pub const REGULATION_PERIOD_MS: i64 = 720_000;
pub const OVERTIME_PERIOD_MS: i64 = 300_000;

pub fn period_length_ms(period: i32) -> i64 {
    if period <= 4 { REGULATION_PERIOD_MS } else { OVERTIME_PERIOD_MS }
}

/// Parses `M:SS`, `MM:SS`, `MM:SS.fff`, and `PT<m>M<s>S` clock strings
/// into milliseconds remaining. Returns `None` for anything that
/// doesn't match one of those shapes.
pub fn parse_clock_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix("PT") {
        return parse_iso_duration_ms(rest);
    }

    let (minutes_str, seconds_str) = raw.split_once(':')?;
    let minutes: i64 = minutes_str.parse().ok()?;
    let seconds: f64 = seconds_str.parse().ok()?;
    Some(minutes * 60_000 + (seconds * 1000.0).round() as i64)
}

fn parse_iso_duration_ms(rest: &str) -> Option<i64> {
    let (minutes_part, rest) = rest.split_once('M')?;
    let seconds_part = rest.strip_suffix('S')?;
    let minutes: i64 = minutes_part.parse().ok()?;
    let seconds: f64 = seconds_part.parse().ok()?;
    Some(minutes * 60_000 + (seconds * 1000.0).round() as i64)
}

/// `seconds_elapsed = period_length - remaining`. A negative result
/// (vendor off-by-one data) is flipped once and logged rather than
/// propagated, per §4.6.
pub fn seconds_elapsed(period: i32, clock_remaining_ms: i64) -> f64 {
    let elapsed_ms = period_length_ms(period) - clock_remaining_ms;
    if elapsed_ms < 0 {
        warn!(
            "negative seconds_elapsed ({elapsed_ms}ms) for period {period}, clock_remaining_ms={clock_remaining_ms}; flipping sign"
        );
        (-elapsed_ms) as f64 / 1000.0
    } else {
        elapsed_ms as f64 / 1000.0
    }
}

/// Clock-safe window predicate for the Q1 window (§4.9). The `end+1000`
/// guard enforces broadcast-second semantics: `end` itself is included,
/// but the millisecond just past it is excluded.
pub fn in_window(clock_ms: i64, start: i64, end: i64) -> bool {
    clock_ms <= start && (clock_ms == end || clock_ms >= end + 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_forms() {
        assert_eq!(parse_clock_ms("12:00"), Some(720_000));
        assert_eq!(parse_clock_ms("0:45.5"), Some(45_500));
    }

    #[test]
    fn parses_iso_duration() {
        assert_eq!(parse_clock_ms("PT11M45.500S"), Some(705_500));
    }

    #[test]
    fn seconds_elapsed_matches_spec_example() {
        let ms = parse_clock_ms("PT11M45.500S").unwrap();
        assert_eq!(seconds_elapsed(1, ms), 14.5);
    }

    #[test]
    fn window_boundary_matches_spec_table() {
        assert!(in_window(720_000, 720_000, 480_000));
        assert!(in_window(600_000, 720_000, 480_000));
        assert!(in_window(480_000, 720_000, 480_000));
        assert!(!in_window(480_001, 720_000, 480_000));
        assert!(!in_window(479_000, 720_000, 480_000));
    }
}
