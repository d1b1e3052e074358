//! Runtime log control as driven by the watch prompt's `:log` and
//! `:logfile` commands.
//!
//! Kept in its own test binary: the subscriber is process-global.

use std::fs;
use std::path::PathBuf;

use payroll_app::logging;
use payroll_app::utils::{WatchLine, parse_watch_line};
use tracing::debug;

fn log_path() -> PathBuf {
    std::env::temp_dir().join(format!("payroll-app-log-reload-{}.log", std::process::id()))
}

fn filter_from(line: &str) -> String {
    match parse_watch_line(line).unwrap() {
        Some(WatchLine::LogLevel(filter)) => filter,
        other => panic!("expected a log command, got {other:?}"),
    }
}

#[test]
fn level_and_file_switch_after_startup() {
    assert!(logging::set_log_level("debug").is_err());

    logging::init_logging("warn");
    logging::set_log_level(&filter_from(":log warn")).unwrap();

    let path = log_path();
    let _ = fs::remove_file(&path);
    logging::enable_file_logging(&path).unwrap();

    debug!("filtered out at warn");
    logging::set_log_level(&filter_from(":log debug")).unwrap();
    debug!("recorded at debug");

    assert!(logging::set_log_level("payroll_app=loud").is_err());

    logging::disable_file_logging();
    debug!("written after the file was closed");

    let contents = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert!(contents.contains("recorded at debug"));
    assert!(!contents.contains("filtered out at warn"));
    assert!(!contents.contains("written after the file was closed"));
}
