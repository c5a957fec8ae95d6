//! Integration tests for building the session store from a directory
//!
//! Tests the whole pipeline per file:
//! - Scenario of one session with fixes and raw measurements
//! - Files without raw measurements still produce a record
//! - Per-file skip for degenerate or unreadable input
//! - Deterministic ordering (discovery and chronological)
//! - Name filtering and recursion into subdirectories

use gnss_session_stats::{
    build_session_store, export_to_json, format_start_time, log_file_name_regex,
    read_sessions_json, Constellation, ErrorKind, ParseOptions, SessionOrder, StoreOptions,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "# Fix,Provider,timeMillisUtc,Latitude,Longitude";

fn raw_line(code: &str) -> String {
    let mut fields = vec!["Raw".to_string()];
    fields.extend((1..28).map(|i| format!("{i}")));
    fields.push(code.to_string());
    fields.extend(["0.0".to_string(), "".to_string()]);
    fields.join(",")
}

fn fix_line(time_ms: u64, lat: f64, lon: f64) -> String {
    format!("Fix,gps,{time_ms},{lat},{lon}")
}

fn write_log(dir: &Path, name: &str, lines: &[String]) {
    let mut content = String::from("# Version: v3.0.5.6 Platform: 12 Manufacturer: Google\n");
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(dir.join(name), content).expect("Failed to write log file");
}

fn session_lines(start_ms: u64, codes: &[&str]) -> Vec<String> {
    let mut lines = vec![
        HEADER.to_string(),
        fix_line(start_ms, 46.05, 14.50),
        fix_line(start_ms + 600_000, 46.07, 14.52),
    ];
    lines.extend(codes.iter().map(|code| raw_line(code)));
    lines
}

#[test]
fn test_single_session_scenario() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_log(
        temp_dir.path(),
        "gnss_log_2022_03_26_17_17_44.txt",
        &session_lines(1_648_315_064_688, &["1", "1", "3"]),
    );

    let store = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    assert_eq!(store.files_seen, 1);
    assert!(store.skipped.is_empty());
    assert_eq!(store.sessions.len(), 1);

    let record = &store.sessions.as_slice()[0];
    assert_eq!(format_start_time(&record.start), "2022-03-26 17:17:44.688000");
    assert_eq!(record.total_measurements, 3);
    assert_eq!(record.duration_mm_ss, "10:00");
    assert!((record.duration_minutes - 10.0).abs() < 1e-9);
    assert_eq!(record.median_latitude, 46.06);
    assert_eq!(record.median_longitude, 14.51);

    let stats = &record.constellations;
    assert_eq!(stats.count(Constellation::Gps), Some(2));
    assert_eq!(stats.count(Constellation::Glonass), Some(1));
    assert_eq!(stats.percentage(Constellation::Gps), Some(0.67));
    assert_eq!(stats.percentage(Constellation::Glonass), Some(0.33));
    for system in [
        Constellation::Unknown,
        Constellation::Sbas,
        Constellation::Qzss,
        Constellation::Beidou,
        Constellation::Galileo,
        Constellation::Irnss,
    ] {
        assert_eq!(stats.count(system), None, "{system} count should be absent");
        assert_eq!(stats.percentage(system), None, "{system} share should be absent");
    }
}

#[test]
fn test_empty_directory_gives_empty_sequence() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    assert!(store.sessions.is_empty());
    assert_eq!(store.files_seen, 0);
}

#[test]
fn test_missing_input_directory_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("does_not_exist");
    let err = build_session_store(&missing, &StoreOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_file_without_raw_lines_still_produces_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_log(
        temp_dir.path(),
        "gnss_log_2022_04_01_10_00_00.txt",
        &session_lines(1_648_807_200_000, &[]),
    );

    let store = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    assert_eq!(store.sessions.len(), 1);
    let record = &store.sessions.as_slice()[0];
    assert_eq!(record.total_measurements, 0);
    assert!(record
        .constellations
        .iter()
        .all(|s| s.count.is_none() && s.percentage.is_none()));
}

#[test]
fn test_degenerate_file_is_skipped_and_run_continues() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_log(
        temp_dir.path(),
        "a_log_2022_01_01_00_00_00.txt",
        &[raw_line("1"), raw_line("5")],
    );
    write_log(
        temp_dir.path(),
        "b_log_2022_01_02_00_00_00.txt",
        &session_lines(1_641_081_600_000, &["5"]),
    );

    let store = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    assert_eq!(store.files_seen, 2);
    assert_eq!(store.sessions.len(), 1);
    assert_eq!(store.skipped.len(), 1);
    assert!(store.skipped[0]
        .path
        .to_string_lossy()
        .ends_with("a_log_2022_01_01_00_00_00.txt"));
    assert_eq!(store.skipped[0].error.kind(), ErrorKind::Degenerate);
}

#[test]
fn test_malformed_lines_do_not_abort_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut lines = session_lines(1_648_315_064_688, &["6", "6"]);
    lines.push("Fix,gps,1648315100000,not-a-number,14.5".to_string());
    lines.push("Raw,1,2,3".to_string());
    lines.push(raw_line("12"));
    write_log(temp_dir.path(), "gnss_log_2022_03_26_17_17_44.txt", &lines);

    let store = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    assert_eq!(store.sessions.len(), 1);
    let record = &store.sessions.as_slice()[0];
    assert_eq!(record.total_measurements, 2);
    assert_eq!(record.constellations.percentage(Constellation::Galileo), Some(1.0));
}

#[test]
fn test_non_finite_fix_values_keep_output_readable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("logs");
    fs::create_dir_all(&input_dir).unwrap();

    let mut lines = session_lines(1_648_315_064_688, &["1"]);
    lines.push("Fix,gps,inf,46.06,14.51".to_string());
    lines.push("Fix,gps,1648315100000,NaN,14.51".to_string());
    write_log(&input_dir, "gnss_log_2022_03_26_17_17_44.txt", &lines);

    let store = build_session_store(&input_dir, &StoreOptions::default()).unwrap();
    assert!(store.skipped.is_empty());
    assert_eq!(store.sessions.len(), 1);
    let record = &store.sessions.as_slice()[0];
    assert_eq!(record.duration_mm_ss, "10:00");
    assert!((record.duration_minutes - 10.0).abs() < 1e-9);
    assert_eq!(record.median_latitude, 46.06);

    let json_path = temp_dir.path().join("sessions.json");
    export_to_json(&store.sessions, &json_path).unwrap();
    let content = fs::read_to_string(&json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value[0]["Duration [M.f]"].is_f64());
    assert!(value[0]["Latitude (median) [deg]"].is_f64());
    let back = read_sessions_json(&json_path).unwrap();
    assert_eq!(back, store.sessions);
}

#[test]
fn test_line_limit_skips_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_log(
        temp_dir.path(),
        "gnss_log_2022_03_26_17_17_44.txt",
        &session_lines(1_648_315_064_688, &["1", "1", "1", "1"]),
    );

    let options = StoreOptions {
        parse: ParseOptions { max_lines: Some(3) },
        ..StoreOptions::default()
    };
    let store = build_session_store(temp_dir.path(), &options).unwrap();
    assert!(store.sessions.is_empty());
    assert_eq!(store.skipped.len(), 1);
    assert_eq!(store.skipped[0].error.kind(), ErrorKind::Parse);
}

#[test]
fn test_discovery_order_is_sorted_and_recursive() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let nested = temp_dir.path().join("b_week");
    fs::create_dir_all(&nested).unwrap();

    // Later session in an earlier-sorting file name
    write_log(
        temp_dir.path(),
        "a_log_2022_05_01_00_00_00.txt",
        &session_lines(1_651_363_200_000, &["1"]),
    );
    write_log(
        &nested,
        "log_2022_01_01_00_00_00.txt",
        &session_lines(1_640_995_200_000, &["3"]),
    );
    write_log(
        temp_dir.path(),
        "c_log_2022_03_01_00_00_00.txt",
        &session_lines(1_646_092_800_000, &["5"]),
    );

    let store = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    let starts: Vec<String> = store
        .sessions
        .iter()
        .map(|r| format_start_time(&r.start)[..10].to_string())
        .collect();
    assert_eq!(starts, vec!["2022-05-01", "2022-01-01", "2022-03-01"]);

    let options = StoreOptions {
        order: SessionOrder::Chronological,
        ..StoreOptions::default()
    };
    let store = build_session_store(temp_dir.path(), &options).unwrap();
    let starts: Vec<String> = store
        .sessions
        .iter()
        .map(|r| format_start_time(&r.start)[..10].to_string())
        .collect();
    assert_eq!(starts, vec!["2022-01-01", "2022-03-01", "2022-05-01"]);
}

#[test]
fn test_name_filter_restricts_discovery() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_log(
        temp_dir.path(),
        "gnss_log_2022_03_26_17_17_44.txt",
        &session_lines(1_648_315_064_688, &["1"]),
    );
    fs::write(temp_dir.path().join("README.md"), "notes\n").unwrap();

    let unfiltered = build_session_store(temp_dir.path(), &StoreOptions::default()).unwrap();
    assert_eq!(unfiltered.files_seen, 2);
    assert_eq!(unfiltered.skipped.len(), 1);

    let options = StoreOptions {
        name_filter: Some(log_file_name_regex().unwrap()),
        ..StoreOptions::default()
    };
    let filtered = build_session_store(temp_dir.path(), &options).unwrap();
    assert_eq!(filtered.files_seen, 1);
    assert!(filtered.skipped.is_empty());
    assert_eq!(filtered.sessions.len(), 1);
}
