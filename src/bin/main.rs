//! CLI binary for GNSS session statistics
//!
//! Summarizes every logger file below an input directory and writes the
//! interchange JSON and the coordinates CSV.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use gnss_session_stats::{
    build_session_store, export_sessions, log_file_name_regex, ExportOptions, ParseOptions,
    SessionOrder, StoreOptions,
};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

fn build_command() -> Command {
    Command::new("GNSS Session Stats")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(concat!(
            env!("CARGO_PKG_VERSION"),
            " (",
            env!("VERGEN_GIT_SHA"),
            ")"
        ))
        .about("Summarize GNSS logger sessions (fixes and raw measurements) into JSON and CSV.")
        .arg(
            Arg::new("input-dir")
                .help("Directory holding the logger text files (searched recursively)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: parent of the input directory)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .help("Base name of the output files (default: input directory name)")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("order")
                .long("order")
                .help("Order of sessions in the output")
                .value_parser(["discovery", "chronological"])
                .default_value("discovery"),
        )
        .arg(
            Arg::new("strict-names")
                .long("strict-names")
                .help("Only process files named <prefix>_YYYY_MM_DD_HH_MM_SS.<ext>")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-lines")
                .long("max-lines")
                .help("Skip files with more lines than this")
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("no-json")
                .long("no-json")
                .help("Do not write the JSON file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-csv")
                .long("no-csv")
                .help("Do not write the coordinates CSV file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only report errors")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();
}

/// Output name and directory defaults derived from the input directory
fn default_outputs(input_dir: &Path) -> Result<(PathBuf, String)> {
    let canonical = input_dir
        .canonicalize()
        .with_context(|| format!("Input directory not accessible: {}", input_dir.display()))?;
    let name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("sessions")
        .to_string();
    let parent = canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| canonical.clone());
    Ok((parent, name))
}

fn run() -> Result<()> {
    let matches = build_command().get_matches();

    init_logging(matches.get_flag("debug"), matches.get_flag("quiet"));

    let input_dir = matches
        .get_one::<String>("input-dir")
        .map(PathBuf::from)
        .context("Missing input directory")?;

    let (default_dir, default_name) = default_outputs(&input_dir)?;
    let output_dir = matches
        .get_one::<String>("output-dir")
        .map(PathBuf::from)
        .unwrap_or(default_dir);
    let project_name = matches
        .get_one::<String>("name")
        .cloned()
        .unwrap_or(default_name);

    let order = match matches.get_one::<String>("order").map(String::as_str) {
        Some("chronological") => SessionOrder::Chronological,
        _ => SessionOrder::Discovery,
    };

    let name_filter = if matches.get_flag("strict-names") {
        Some(log_file_name_regex()?)
    } else {
        None
    };

    let store_options = StoreOptions {
        parse: ParseOptions {
            max_lines: matches.get_one::<usize>("max-lines").copied(),
        },
        order,
        name_filter,
        ..StoreOptions::default()
    };

    let export_options = ExportOptions {
        json: !matches.get_flag("no-json"),
        csv: !matches.get_flag("no-csv"),
        output_dir,
        project_name,
    };

    info!("Processing: {}", input_dir.display());
    let store = build_session_store(&input_dir, &store_options)
        .with_context(|| format!("Failed to process {}", input_dir.display()))?;

    if !store.skipped.is_empty() {
        warn!(
            "{} of {} file(s) skipped; run with --debug for line details",
            store.skipped.len(),
            store.files_seen
        );
    }
    if store.files_seen > 0 && store.sessions.is_empty() {
        warn!(
            "No sessions could be summarized out of {} file(s) found",
            store.files_seen
        );
    }

    let report = export_sessions(store.into_sessions(), &export_options)
        .context("Failed to write output files")?;
    info!("Wrote {} session(s)", report.session_count);

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
