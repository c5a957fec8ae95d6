//! Line classification
//!
//! Each logger line carries its record type in the first comma-separated field.

use crate::types::{LogLine, RecordKind};

pub const FIX_HEADER_TAG: &str = "# Fix";
pub const FIX_DATA_TAG: &str = "Fix";
pub const RAW_OBSERVATION_TAG: &str = "Raw";

/// Classify a line by its trimmed leading field
pub fn classify_line(line: &str) -> RecordKind {
    let tag = line.split(',').next().unwrap_or("");
    kind_for_tag(tag)
}

/// Split a line into its tag and untyped fields
pub fn split_line(line: &str) -> LogLine<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(',').collect();
    let kind = fields
        .first()
        .map(|tag| kind_for_tag(tag))
        .unwrap_or(RecordKind::Other);
    LogLine { kind, fields }
}

fn kind_for_tag(tag: &str) -> RecordKind {
    match tag.trim() {
        FIX_HEADER_TAG => RecordKind::FixHeader,
        FIX_DATA_TAG => RecordKind::FixData,
        RAW_OBSERVATION_TAG => RecordKind::RawObservation,
        _ => RecordKind::Other,
    }
}
