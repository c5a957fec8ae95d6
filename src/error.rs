use std::fmt;

/// Broad classes of failure, used to decide whether a file is skipped or the run stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading input failed
    Io,
    /// Input could not be interpreted
    Parse,
    /// Input parsed but holds nothing to summarize
    Degenerate,
    /// An output artifact could not be written or read back
    Write,
}

/// Error type for session parsing, summarizing and export
#[derive(Debug)]
pub enum SessionError {
    /// I/O errors while reading input
    Io(std::io::Error),
    /// Parse errors with context
    Parse(String),
    /// A required column is absent from the `# Fix` header
    MissingColumn(String),
    /// The file contained no usable `Fix` lines
    NoFixRecords,
    /// The file exceeded the configured line bound
    LineLimitExceeded(usize),
    /// Interchange (JSON) encoding or decoding failed
    Json(serde_json::Error),
    /// Tabular (CSV) encoding or decoding failed
    Csv(csv::Error),
    /// Writing an output artifact failed
    Export(String),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Io(_) => ErrorKind::Io,
            SessionError::Parse(_)
            | SessionError::MissingColumn(_)
            | SessionError::LineLimitExceeded(_) => ErrorKind::Parse,
            SessionError::NoFixRecords => ErrorKind::Degenerate,
            SessionError::Json(_) | SessionError::Csv(_) | SessionError::Export(_) => {
                ErrorKind::Write
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(err) => write!(f, "I/O error: {}", err),
            SessionError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SessionError::MissingColumn(name) => {
                write!(f, "Missing column in fix header: {}", name)
            }
            SessionError::NoFixRecords => write!(f, "No fix records found"),
            SessionError::LineLimitExceeded(limit) => {
                write!(f, "Line limit exceeded ({} lines)", limit)
            }
            SessionError::Json(err) => write!(f, "JSON error: {}", err),
            SessionError::Csv(err) => write!(f, "CSV error: {}", err),
            SessionError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(err) => Some(err),
            SessionError::Json(err) => Some(err),
            SessionError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Io(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Json(err)
    }
}

impl From<csv::Error> for SessionError {
    fn from(err: csv::Error) -> Self {
        SessionError::Csv(err)
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
