//! GNSS Session Statistics Library
//!
//! A Rust library for summarizing GNSS logger text files. Each file is one
//! measurement session holding `# Fix` / `Fix` position lines and `Raw`
//! satellite measurement lines. The library reduces every file to one
//! [`SessionRecord`] (start time, duration, median position, measurement
//! counts per GNSS system) and writes the collected records for charting.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line interface binary
//!
//! # Quick Start
//!
//! Summarize a directory of logs and write `<name>.json` and `<name>.csv`:
//! ```rust,no_run
//! use gnss_session_stats::{build_session_store, export_sessions, ExportOptions, StoreOptions};
//! use std::path::Path;
//!
//! let store = build_session_store(Path::new("data/testDataSet"), &StoreOptions::default()).unwrap();
//! println!("{} sessions, {} files skipped", store.sessions.len(), store.skipped.len());
//!
//! let options = ExportOptions::new("data", "testDataSet");
//! let report = export_sessions(store.into_sessions(), &options).unwrap();
//! if let Some(path) = report.json_path {
//!     println!("Exported to: {}", path.display());
//! }
//! ```
//!
//! Summarize a single file:
//! ```rust,no_run
//! use gnss_session_stats::{parse_session_file, summarize_session, FixColumns, ParseOptions};
//! use std::path::Path;
//!
//! let parsed = parse_session_file(Path::new("gnss_log_2022_03_26_17_17_44.txt"), &ParseOptions::default()).unwrap();
//! let record = summarize_session(&parsed, &FixColumns::default()).unwrap();
//! println!("{} measurements over {}", record.total_measurements, record.duration_mm_ss);
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`classify_line`] - Classify a line by its leading tag
//! - [`parse_session_file`] - Parse one logger file
//! - [`parse_session_reader`] / [`parse_session_str`] - Parse from a reader or memory
//!
//! ## Statistics
//! - [`aggregate_constellations`] - Count and share of measurements per GNSS system
//! - [`summarize_session`] - Reduce a parsed file to a [`SessionRecord`]
//! - [`build_session_store`] - Process every file below a directory
//!
//! ## Export Functions
//! - [`export_sessions`] - Write the JSON and CSV artifacts
//! - [`export_to_json`] / [`export_to_csv`] - Write one artifact
//! - [`read_sessions_json`] / [`read_coordinates_csv`] - Read artifacts back

pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod stats;
pub mod store;
pub mod summary;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use stats::*;
#[allow(ambiguous_glob_reexports)]
pub use store::*;
#[allow(ambiguous_glob_reexports)]
pub use summary::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;
