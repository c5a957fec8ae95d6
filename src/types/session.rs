use crate::conversion::{format_start_time, parse_start_time};
use crate::types::{Constellation, ConstellationStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one measurement session (one input file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SessionRecordRepr", try_from = "SessionRecordRepr")]
pub struct SessionRecord {
    /// Earliest fix timestamp
    pub start: DateTime<Utc>,
    /// Duration as `MM:SS`
    pub duration_mm_ss: String,
    /// Duration in decimal minutes, 4 decimals
    pub duration_minutes: f64,
    /// Median latitude in degrees, 6 decimals
    pub median_latitude: f64,
    /// Median longitude in degrees, 6 decimals
    pub median_longitude: f64,
    /// Number of raw measurements in the file
    pub total_measurements: u64,
    pub constellations: ConstellationStats,
}

/// Interchange layout of a [`SessionRecord`]; key names are read by the charting side
#[derive(Serialize, Deserialize)]
struct SessionRecordRepr {
    #[serde(rename = "Start date-time")]
    start: String,
    #[serde(rename = "Duration [MM:SS]")]
    duration_mm_ss: String,
    #[serde(rename = "Duration [M.f]")]
    duration_minutes: f64,
    #[serde(rename = "Latitude (median) [deg]")]
    median_latitude: f64,
    #[serde(rename = "Longitude (median) [deg]")]
    median_longitude: f64,
    #[serde(rename = "TotalCountOfMeas")]
    total_measurements: u64,
    #[serde(rename = "GnssSystems")]
    gnss_systems: BTreeMap<String, String>,
    #[serde(rename = "MeasCountPerSystem")]
    count_per_system: BTreeMap<String, Option<u64>>,
    #[serde(rename = "MeasPercentagePerSystem")]
    percentage_per_system: BTreeMap<String, Option<f64>>,
}

impl From<SessionRecord> for SessionRecordRepr {
    fn from(record: SessionRecord) -> Self {
        let mut gnss_systems = BTreeMap::new();
        let mut count_per_system = BTreeMap::new();
        let mut percentage_per_system = BTreeMap::new();

        for stats in record.constellations.iter() {
            let key = stats.system.code().to_string();
            gnss_systems.insert(key.clone(), stats.system.name().to_string());
            count_per_system.insert(key.clone(), stats.count);
            percentage_per_system.insert(key, stats.percentage);
        }

        Self {
            start: format_start_time(&record.start),
            duration_mm_ss: record.duration_mm_ss,
            duration_minutes: record.duration_minutes,
            median_latitude: record.median_latitude,
            median_longitude: record.median_longitude,
            total_measurements: record.total_measurements,
            gnss_systems,
            count_per_system,
            percentage_per_system,
        }
    }
}

impl TryFrom<SessionRecordRepr> for SessionRecord {
    type Error = String;

    fn try_from(repr: SessionRecordRepr) -> Result<Self, Self::Error> {
        let start = parse_start_time(&repr.start)?;

        for (key, name) in &repr.gnss_systems {
            let system: Constellation = key.parse()?;
            if system.name() != name {
                return Err(format!(
                    "system code {} is named '{}', expected '{}'",
                    key,
                    name,
                    system.name()
                ));
            }
        }

        let mut constellations = ConstellationStats::empty();
        for (key, count) in &repr.count_per_system {
            let system: Constellation = key.parse()?;
            constellations.get_mut(system).count = *count;
        }
        for (key, percentage) in &repr.percentage_per_system {
            let system: Constellation = key.parse()?;
            constellations.get_mut(system).percentage = *percentage;
        }

        Ok(Self {
            start,
            duration_mm_ss: repr.duration_mm_ss,
            duration_minutes: repr.duration_minutes,
            median_latitude: repr.median_latitude,
            median_longitude: repr.median_longitude,
            total_measurements: repr.total_measurements,
            constellations,
        })
    }
}

/// Ordered sessions of one processing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSequence(Vec<SessionRecord>);

impl SessionSequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, record: SessionRecord) {
        self.0.push(record);
    }

    /// Stable sort by start timestamp
    pub(crate) fn sort_chronologically(&mut self) {
        self.0.sort_by_key(|record| record.start);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionRecord> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SessionRecord] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<SessionRecord> {
        self.0
    }
}

impl From<Vec<SessionRecord>> for SessionSequence {
    fn from(records: Vec<SessionRecord>) -> Self {
        Self(records)
    }
}

impl IntoIterator for SessionSequence {
    type Item = SessionRecord;
    type IntoIter = std::vec::IntoIter<SessionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SessionSequence {
    type Item = &'a SessionRecord;
    type IntoIter = std::slice::Iter<'a, SessionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
