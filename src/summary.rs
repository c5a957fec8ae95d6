//! Reduction of a parsed session into its [`SessionRecord`]

use crate::conversion::{
    duration_to_minutes, format_duration_mm_ss, millis_to_datetime, round_to,
};
use crate::error::{Result, SessionError};
use crate::parser::ParsedSession;
use crate::stats::{aggregate_constellations, median};
use crate::types::{FixRecord, SessionRecord};

/// Header names accepted for the columns a summary needs.
/// Matching is case-insensitive; the first name present in a header wins.
#[derive(Debug, Clone)]
pub struct FixColumns {
    pub time: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
}

impl Default for FixColumns {
    fn default() -> Self {
        Self {
            time: vec![
                "timeMillisUtc".to_string(),
                "(UTC)TimeInMs".to_string(),
                "UnixTimeMillis".to_string(),
            ],
            latitude: vec!["Latitude".to_string()],
            longitude: vec!["Longitude".to_string()],
        }
    }
}

/// Summarize one parsed session.
///
/// Fails with [`SessionError::NoFixRecords`] when the file had no usable fixes
/// and with [`SessionError::MissingColumn`] when a fix header lacks a required
/// column. No partial record is ever returned.
pub fn summarize_session(session: &ParsedSession, columns: &FixColumns) -> Result<SessionRecord> {
    if session.fixes.is_empty() {
        return Err(SessionError::NoFixRecords);
    }

    let times = column_values(&session.fixes, &columns.time)?;
    let latitudes = column_values(&session.fixes, &columns.latitude)?;
    let longitudes = column_values(&session.fixes, &columns.longitude)?;

    let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let start = millis_to_datetime(min_time).ok_or_else(|| {
        SessionError::Parse(format!("fix timestamp {} is not a valid epoch time", min_time))
    })?;
    let duration_ms = max_time - min_time;

    let median_latitude = median(&latitudes)
        .ok_or_else(|| SessionError::Parse("latitude column has no usable values".to_string()))?;
    let median_longitude = median(&longitudes)
        .ok_or_else(|| SessionError::Parse("longitude column has no usable values".to_string()))?;

    Ok(SessionRecord {
        start,
        duration_mm_ss: format_duration_mm_ss(duration_ms),
        duration_minutes: duration_to_minutes(duration_ms),
        median_latitude: round_to(median_latitude, 6),
        median_longitude: round_to(median_longitude, 6),
        total_measurements: session.observation_count() as u64,
        constellations: aggregate_constellations(&session.constellations),
    })
}

/// Values of one logical column across all fixes; each record is looked up
/// through the header it was parsed under
fn column_values(fixes: &[FixRecord], candidates: &[String]) -> Result<Vec<f64>> {
    fixes
        .iter()
        .map(|fix| {
            fix.header()
                .position_of(candidates)
                .and_then(|index| fix.value_at(index))
                .ok_or_else(|| {
                    SessionError::MissingColumn(
                        candidates.first().cloned().unwrap_or_default(),
                    )
                })
        })
        .collect()
}
