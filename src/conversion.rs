//! Numeric and time conversion utilities
//!
//! Rounding, epoch-millisecond timestamps and duration renderings used when
//! reducing a parsed session into its summary record.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Output format of `Start date-time`, e.g. `2022-03-26 17:17:44.688000`
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Accepts any number of fractional digits, including none
const START_TIME_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Round to a fixed number of decimal places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_even(value * factor) / factor
}

fn round_half_even(value: f64) -> f64 {
    if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        value.round()
    }
}

/// Convert an epoch timestamp in milliseconds to a UTC date-time with microsecond precision
pub fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let micros = (millis * 1000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

pub fn format_start_time(start: &DateTime<Utc>) -> String {
    start.format(START_TIME_FORMAT).to_string()
}

pub fn parse_start_time(text: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(text.trim(), START_TIME_PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid start date-time '{}': {}", text, e))
}

/// Render a duration as `MM:SS` from whole seconds, truncating the milliseconds.
/// Minutes keep counting past 59 (`75:03`).
pub fn format_duration_mm_ss(duration_ms: f64) -> String {
    let total_secs = if duration_ms.is_finite() && duration_ms > 0.0 {
        (duration_ms / 1000.0).floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Duration in decimal minutes, rounded to 4 decimals
pub fn duration_to_minutes(duration_ms: f64) -> f64 {
    round_to(duration_ms / 60_000.0, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
        assert_eq!(round_to(36.19719549, 6), 36.197195);
        assert_eq!(round_to(-16.1238045001, 6), -16.123805);
        assert_eq!(round_to(10.48851, 4), 10.4885);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(0.625, 2), 0.62);
        assert_eq!(round_to(0.875, 2), 0.88);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_millis_to_datetime_keeps_milliseconds() {
        let dt = millis_to_datetime(1_648_315_064_688.0).unwrap();
        assert_eq!(format_start_time(&dt), "2022-03-26 17:17:44.688000");
        assert!(millis_to_datetime(f64::NAN).is_none());
        assert!(millis_to_datetime(f64::INFINITY).is_none());
    }

    #[test]
    fn test_start_time_parse_round_trip() {
        let dt = millis_to_datetime(1_648_315_064_688.0).unwrap();
        let text = format_start_time(&dt);
        assert_eq!(parse_start_time(&text).unwrap(), dt);
        assert!(parse_start_time("2022-03-26 17:17:44").is_ok());
        assert!(parse_start_time("26/03/2022").is_err());
    }

    #[test]
    fn test_format_duration_mm_ss() {
        assert_eq!(format_duration_mm_ss(0.0), "00:00");
        assert_eq!(format_duration_mm_ss(629_310.0), "10:29");
        assert_eq!(format_duration_mm_ss(59_999.0), "00:59");
        assert_eq!(format_duration_mm_ss(4_503_000.0), "75:03");
    }

    #[test]
    fn test_duration_to_minutes() {
        assert_eq!(duration_to_minutes(629_310.0), 10.4885);
        assert_eq!(duration_to_minutes(600_000.0), 10.0);
    }
}
