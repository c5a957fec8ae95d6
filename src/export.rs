//! Export functionality for session data
//!
//! Writes a [`SessionSequence`] to the interchange JSON file (every field,
//! unobserved systems as `null`) and to a two-column CSV of median coordinates.
//! Each artifact is written to a temporary file next to its target and renamed
//! into place, so a failed write never leaves a truncated file behind.

use crate::error::{Result, SessionError};
use crate::types::SessionSequence;
use log::{debug, info};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Header of the coordinates CSV, written verbatim
pub const CSV_HEADER: [&str; 2] = ["Longitude (median) [deg]", " Latitude (median) [deg]"];

/// Export options for controlling output formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub json: bool,
    pub csv: bool,
    /// Directory receiving `<project_name>.json` and `<project_name>.csv`
    pub output_dir: PathBuf,
    pub project_name: String,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            json: true,
            csv: true,
            output_dir: output_dir.into(),
            project_name: project_name.into(),
        }
    }
}

/// Paths written by [`export_sessions`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub session_count: usize,
}

/// Compute the JSON and CSV paths for a set of export options
pub fn compute_export_paths(options: &ExportOptions) -> (PathBuf, PathBuf) {
    let json_path = options
        .output_dir
        .join(format!("{}.json", options.project_name));
    let csv_path = options
        .output_dir
        .join(format!("{}.csv", options.project_name));
    (json_path, csv_path)
}

/// Write every enabled artifact for a session sequence
pub fn export_sessions(sessions: SessionSequence, options: &ExportOptions) -> Result<ExportReport> {
    if options.project_name.trim().is_empty() {
        return Err(SessionError::Export("project name is empty".to_string()));
    }

    if !options.output_dir.exists() {
        fs::create_dir_all(&options.output_dir).map_err(|e| {
            SessionError::Export(format!(
                "Failed to create output directory {}: {}",
                options.output_dir.display(),
                e
            ))
        })?;
        debug!("Created output directory: {}", options.output_dir.display());
    }

    let (json_path, csv_path) = compute_export_paths(options);
    let mut report = ExportReport {
        session_count: sessions.len(),
        ..ExportReport::default()
    };

    if options.json {
        export_to_json(&sessions, &json_path)?;
        info!("Exported {} session(s) to: {}", sessions.len(), json_path.display());
        report.json_path = Some(json_path);
    }

    if options.csv {
        export_to_csv(&sessions, &csv_path)?;
        info!("Exported coordinates to: {}", csv_path.display());
        report.csv_path = Some(csv_path);
    }

    Ok(report)
}

/// Write the full sequence as a pretty-printed JSON array (4-space indent)
pub fn export_to_json(sessions: &SessionSequence, output_path: &Path) -> Result<()> {
    write_atomically(output_path, |writer| {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        sessions.serialize(&mut serializer)?;
        writeln!(writer)?;
        Ok(())
    })
}

/// Write one `longitude, latitude` row per session after the header row.
/// Whole-degree values keep their `.0`.
pub fn export_to_csv(sessions: &SessionSequence, output_path: &Path) -> Result<()> {
    write_atomically(output_path, |writer| {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut *writer);
        csv_writer.write_record(CSV_HEADER)?;
        for session in sessions {
            csv_writer.write_record([
                format!("{:?}", session.median_longitude),
                format!(" {:?}", session.median_latitude),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    })
}

/// Read an interchange JSON file back into a session sequence
pub fn read_sessions_json(path: &Path) -> Result<SessionSequence> {
    let file = File::open(path)?;
    let sessions = serde_json::from_reader(BufReader::new(file))?;
    Ok(sessions)
}

/// Read the coordinates CSV back as `(longitude, latitude)` pairs
pub fn read_coordinates_csv(path: &Path) -> Result<Vec<(f64, f64)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let parse = |column: usize| -> Result<f64> {
            record
                .get(column)
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| {
                    SessionError::Parse(format!(
                        "{}: row {} column {} is not a number",
                        path.display(),
                        index + 2,
                        column + 1
                    ))
                })
        };
        rows.push((parse(0)?, parse(1)?));
    }
    Ok(rows)
}

fn write_atomically<F>(output_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        SessionError::Export(format!(
            "Failed to create temporary file in {}: {}",
            dir.display(),
            e
        ))
    })?;

    {
        let mut writer = BufWriter::new(&mut temp);
        write(&mut writer).map_err(|e| {
            SessionError::Export(format!("Failed to write {}: {}", output_path.display(), e))
        })?;
        writer.flush().map_err(|e| {
            SessionError::Export(format!("Failed to flush {}: {}", output_path.display(), e))
        })?;
    }

    temp.persist(output_path).map_err(|e| {
        SessionError::Export(format!(
            "Failed to move output into place at {}: {}",
            output_path.display(),
            e.error
        ))
    })?;
    Ok(())
}
