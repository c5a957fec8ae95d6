//! Session store building
//!
//! Walks an input directory, parses and summarizes every log file found and
//! collects the resulting records in a [`SessionSequence`]. A file that fails
//! to read, parse or summarize is reported and left out; the run continues.

use crate::error::{Result, SessionError};
use crate::parser::{parse_session_file, ParseOptions};
use crate::summary::{summarize_session, FixColumns};
use crate::types::{SessionRecord, SessionSequence};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum recursion depth to prevent stack overflow
const MAX_RECURSION_DEPTH: usize = 100;

/// Progress is logged each time another 5 % of the files is done
const PROGRESS_STEP_PERCENT: usize = 5;

/// Order of records in the built sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionOrder {
    /// Traversal order; entries of each directory are visited sorted by name
    #[default]
    Discovery,
    /// Sorted by start timestamp, ties keep traversal order
    Chronological,
}

/// Settings for one store build
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub parse: ParseOptions,
    pub columns: FixColumns,
    pub order: SessionOrder,
    /// Only files whose name matches are processed
    pub name_filter: Option<Regex>,
}

/// A file left out of the sequence and why
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: SessionError,
}

/// Result of one store build
#[derive(Debug, Default)]
pub struct SessionStore {
    pub sessions: SessionSequence,
    pub skipped: Vec<SkippedFile>,
    /// Files discovered and attempted
    pub files_seen: usize,
}

impl SessionStore {
    pub fn into_sessions(self) -> SessionSequence {
        self.sessions
    }
}

/// Logger file names: `<prefix>_YYYY_MM_DD_HH_MM_SS.<ext>`
pub const LOG_FILE_NAME_PATTERN: &str = r"^.+_\d{4}_\d{2}_\d{2}_\d{2}_\d{2}_\d{2}\.[A-Za-z0-9]+$";

/// Compiled [`LOG_FILE_NAME_PATTERN`], for use as a name filter
pub fn log_file_name_regex() -> Result<Regex> {
    Regex::new(LOG_FILE_NAME_PATTERN)
        .map_err(|e| SessionError::Parse(format!("invalid file name pattern: {}", e)))
}

/// Build the session sequence for every log file below `input_dir`.
///
/// An empty directory yields an empty sequence. A missing or unreadable
/// `input_dir` is an error.
pub fn build_session_store(input_dir: &Path, options: &StoreOptions) -> Result<SessionStore> {
    let files = discover_log_files(input_dir, options.name_filter.as_ref())?;
    info!(
        "Found {} file(s) in {}",
        files.len(),
        input_dir.display()
    );

    let mut store = SessionStore::default();
    let mut progress = Progress::new(files.len());

    for path in &files {
        store.files_seen += 1;
        match process_file(path, options) {
            Ok(record) => store.sessions.push(record),
            Err(error) => {
                warn!("Skipping {}: {}", path.display(), error);
                store.skipped.push(SkippedFile {
                    path: path.clone(),
                    error,
                });
            }
        }
        progress.advance();
    }

    if options.order == SessionOrder::Chronological {
        store.sessions.sort_chronologically();
    }

    info!(
        "All files are processed: {} session(s), {} skipped",
        store.sessions.len(),
        store.skipped.len()
    );
    Ok(store)
}

/// Parse and summarize one file
pub fn process_file(path: &Path, options: &StoreOptions) -> Result<SessionRecord> {
    let parsed = parse_session_file(path, &options.parse)?;
    if parsed.stats.skipped_lines() > 0 {
        warn!(
            "{}: {} malformed line(s) skipped",
            path.display(),
            parsed.stats.skipped_lines()
        );
    }
    summarize_session(&parsed, &options.columns)
}

/// Recursively list files below `dir` in a deterministic order
pub fn discover_log_files(dir: &Path, name_filter: Option<&Regex>) -> Result<Vec<PathBuf>> {
    let canonical = dir.canonicalize()?;
    if !canonical.is_dir() {
        return Err(SessionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        )));
    }

    let mut visited = HashSet::new();
    let mut files = Vec::new();
    find_files_in_dir_with_depth(&canonical, name_filter, &mut visited, &mut files, 0)?;
    Ok(files)
}

/// Internal walker, protecting against symlink cycles and depth overflow
fn find_files_in_dir_with_depth(
    dir: &Path,
    name_filter: Option<&Regex>,
    visited: &mut HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(SessionError::Parse(format!(
            "Maximum recursion depth exceeded in directory traversal ({})",
            MAX_RECURSION_DEPTH
        )));
    }

    if !visited.insert(dir.to_path_buf()) {
        return Ok(());
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if depth > 0 => {
            warn!("Cannot read directory '{}': {}", dir.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => warn!("Cannot read entry in directory '{}': {}", dir.display(), e),
        }
    }
    paths.sort();

    for path in paths {
        let canonical = match path.canonicalize() {
            Ok(canonical) => canonical,
            Err(e) => {
                warn!("Failed to canonicalize path '{}': {}", path.display(), e);
                continue;
            }
        };

        if canonical.is_dir() {
            find_files_in_dir_with_depth(&canonical, name_filter, visited, files, depth + 1)?;
        } else if canonical.is_file() {
            if !visited.insert(canonical.clone()) {
                continue;
            }
            let accepted = match name_filter {
                Some(filter) => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|name| filter.is_match(name))
                    .unwrap_or(false),
                None => true,
            };
            if accepted {
                files.push(canonical);
            } else {
                debug!("Ignoring file not matching name filter: {}", path.display());
            }
        }
    }

    Ok(())
}

struct Progress {
    total: usize,
    done: usize,
    next_percent: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            next_percent: PROGRESS_STEP_PERCENT,
        }
    }

    fn advance(&mut self) {
        self.done += 1;
        let percent = self.done * 100 / self.total.max(1);
        if percent >= self.next_percent {
            info!(
                "Processing progress: {}% ({}/{})",
                percent, self.done, self.total
            );
            while self.next_percent <= percent {
                self.next_percent += PROGRESS_STEP_PERCENT;
            }
        }
    }
}
