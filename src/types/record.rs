use std::sync::Arc;

/// Tag of one input line, taken from its first comma-separated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `# Fix` column header line
    FixHeader,
    /// `Fix` position sample
    FixData,
    /// `Raw` satellite measurement
    RawObservation,
    /// Anything else (other headers, comments, status lines)
    Other,
}

/// One line of raw input, split into untyped comma-separated fields
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine<'a> {
    pub kind: RecordKind,
    pub fields: Vec<&'a str>,
}

impl<'a> LogLine<'a> {
    /// Fields after the tag and the provider/second column
    pub fn payload(&self) -> &[&'a str] {
        self.fields.get(2..).unwrap_or(&[])
    }
}

/// Field names of a `# Fix` header line, shared by every record parsed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixHeader {
    names: Arc<[String]>,
}

impl FixHeader {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names: names.into(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a field, matched case-insensitively against any of the candidate names
    pub fn position_of(&self, candidates: &[String]) -> Option<usize> {
        candidates.iter().find_map(|candidate| {
            self.names
                .iter()
                .position(|name| name.eq_ignore_ascii_case(candidate))
        })
    }
}

/// One parsed position fix: numeric values keyed by the header it was parsed under
#[derive(Debug, Clone, PartialEq)]
pub struct FixRecord {
    header: FixHeader,
    values: Vec<f64>,
}

impl FixRecord {
    /// Returns `None` when the value count does not match the header width.
    pub fn new(header: FixHeader, values: Vec<f64>) -> Option<Self> {
        if header.len() != values.len() {
            return None;
        }
        Some(Self { header, values })
    }

    pub fn header(&self) -> &FixHeader {
        &self.header
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value by exact field name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.header
            .names()
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}
