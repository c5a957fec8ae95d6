//! Session file parsing
//!
//! Reads one logger file line by line and collects the two record streams it
//! carries: position fixes (`Fix`, described by the file's own `# Fix` header)
//! and the constellation code of every raw measurement (`Raw`).
//!
//! Malformed lines are skipped with a warning and counted in [`ParseStats`];
//! only I/O failures and the optional line bound fail the whole file.

use crate::error::{Result, SessionError};
use crate::parser::classify::split_line;
use crate::types::{Constellation, FixHeader, FixRecord, LogLine, RecordKind};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Index of the `ConstellationType` column in a `Raw` line, tag included
pub const CONSTELLATION_TYPE_INDEX: usize = 28;

/// Per-file parsing limits
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Fail the file once it has more lines than this
    pub max_lines: Option<usize>,
}

/// Line counters for one parsed file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_lines: usize,
    pub header_lines: usize,
    /// `# Fix` lines that replaced a different, earlier header
    pub header_overrides: usize,
    pub fix_records: usize,
    pub raw_observations: usize,
    pub skipped_fix_lines: usize,
    pub skipped_raw_lines: usize,
    /// Lines with any other tag
    pub ignored_lines: usize,
}

impl ParseStats {
    pub fn skipped_lines(&self) -> usize {
        self.skipped_fix_lines + self.skipped_raw_lines
    }
}

/// Both record streams of one file
#[derive(Debug, Clone, Default)]
pub struct ParsedSession {
    /// Header in effect at the end of the file
    pub header: Option<FixHeader>,
    pub fixes: Vec<FixRecord>,
    pub constellations: Vec<Constellation>,
    pub stats: ParseStats,
}

impl ParsedSession {
    pub fn observation_count(&self) -> usize {
        self.constellations.len()
    }
}

/// Parse a logger file from disk
pub fn parse_session_file(path: &Path, options: &ParseOptions) -> Result<ParsedSession> {
    debug!("Parsing session file: {}", path.display());
    let file = File::open(path)?;
    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    parse_session_reader(BufReader::new(file), source, options)
}

/// Parse logger content already held in memory
pub fn parse_session_str(text: &str, options: &ParseOptions) -> Result<ParsedSession> {
    parse_session_reader(text.as_bytes(), "<memory>", options)
}

/// Parse logger content from any buffered reader.
/// `source` only labels log messages.
pub fn parse_session_reader<R: BufRead>(
    reader: R,
    source: &str,
    options: &ParseOptions,
) -> Result<ParsedSession> {
    let mut parser = SessionParser::new(source);

    for (index, line) in reader.split(b'\n').enumerate() {
        let line_number = index + 1;
        if let Some(limit) = options.max_lines {
            if line_number > limit {
                return Err(SessionError::LineLimitExceeded(limit));
            }
        }

        let bytes = line?;
        let text = String::from_utf8_lossy(&bytes);
        parser.feed_line(line_number, &text);
    }

    Ok(parser.finish())
}

struct SessionParser<'s> {
    source: &'s str,
    session: ParsedSession,
}

impl<'s> SessionParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            session: ParsedSession::default(),
        }
    }

    fn feed_line(&mut self, line_number: usize, text: &str) {
        self.session.stats.total_lines += 1;
        let line = split_line(text);

        match line.kind {
            RecordKind::FixHeader => self.handle_header(line_number, &line),
            RecordKind::FixData => self.handle_fix(line_number, &line),
            RecordKind::RawObservation => self.handle_raw(line_number, &line),
            RecordKind::Other => self.session.stats.ignored_lines += 1,
        }
    }

    fn handle_header(&mut self, line_number: usize, line: &LogLine<'_>) {
        let names: Vec<String> = line
            .payload()
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let header = FixHeader::new(names);
        self.session.stats.header_lines += 1;

        if let Some(previous) = &self.session.header {
            if *previous == header {
                debug!(
                    "{}:{}: repeated fix header, identical to the current one",
                    self.source, line_number
                );
                return;
            }
            self.session.stats.header_overrides += 1;
            warn!(
                "{}:{}: fix header redefined ({} -> {} fields); applies to following fix lines",
                self.source,
                line_number,
                previous.len(),
                header.len()
            );
        }

        debug!(
            "{}:{}: fix header with {} fields: {:?}",
            self.source,
            line_number,
            header.len(),
            header.names()
        );
        self.session.header = Some(header);
    }

    fn handle_fix(&mut self, line_number: usize, line: &LogLine<'_>) {
        let Some(header) = &self.session.header else {
            self.session.stats.skipped_fix_lines += 1;
            warn!(
                "{}:{}: fix line before any '# Fix' header, skipped",
                self.source, line_number
            );
            return;
        };

        let payload = line.payload();
        if payload.len() != header.len() {
            self.session.stats.skipped_fix_lines += 1;
            warn!(
                "{}:{}: fix line has {} values but the header has {} fields, skipped",
                self.source,
                line_number,
                payload.len(),
                header.len()
            );
            return;
        }

        let mut values = Vec::with_capacity(payload.len());
        for (name, token) in header.names().iter().zip(payload) {
            match token.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => values.push(value),
                Ok(_) => {
                    self.session.stats.skipped_fix_lines += 1;
                    warn!(
                        "{}:{}: non-finite value '{}' for fix field '{}', skipped",
                        self.source,
                        line_number,
                        token.trim(),
                        name
                    );
                    return;
                }
                Err(_) => {
                    self.session.stats.skipped_fix_lines += 1;
                    warn!(
                        "{}:{}: non-numeric value '{}' for fix field '{}', skipped",
                        self.source,
                        line_number,
                        token.trim(),
                        name
                    );
                    return;
                }
            }
        }

        if let Some(record) = FixRecord::new(header.clone(), values) {
            self.session.fixes.push(record);
            self.session.stats.fix_records += 1;
        }
    }

    fn handle_raw(&mut self, line_number: usize, line: &LogLine<'_>) {
        let Some(field) = line.fields.get(CONSTELLATION_TYPE_INDEX) else {
            self.session.stats.skipped_raw_lines += 1;
            warn!(
                "{}:{}: raw line has {} fields, constellation type needs {}, skipped",
                self.source,
                line_number,
                line.fields.len(),
                CONSTELLATION_TYPE_INDEX + 1
            );
            return;
        };

        match field.parse::<Constellation>() {
            Ok(system) => {
                self.session.constellations.push(system);
                self.session.stats.raw_observations += 1;
            }
            Err(e) => {
                self.session.stats.skipped_raw_lines += 1;
                warn!("{}:{}: {}, skipped", self.source, line_number, e);
            }
        }
    }

    fn finish(self) -> ParsedSession {
        let stats = &self.session.stats;
        debug!(
            "{}: {} lines, {} fixes, {} raw measurements, {} skipped",
            self.source,
            stats.total_lines,
            stats.fix_records,
            stats.raw_observations,
            stats.skipped_lines()
        );
        self.session
    }
}
