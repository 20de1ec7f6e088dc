//! Unit tests for the Engine logger registry
//!
//! IMPORTANT: LOGGER is a global OnceLock shared across all tests.
//! All tests here are marked with #[serial] and reset the logger when done.
//! Other modules may log concurrently, so assertions look for specific
//! messages instead of counting entries.

use crate::vis3d::Engine;
use crate::vis3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
#[derive(Clone)]
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn find(&self, message: &str) -> Option<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.message == message)
            .cloned()
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGER REGISTRY TESTS
// ============================================================================

#[test]
#[serial]
fn test_custom_logger_receives_entries() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());
    Engine::set_min_severity(LogSeverity::Trace);

    crate::engine_info!("vis3d::test", "info {}", 1);

    let entry = logger.find("info 1").expect("entry should be captured");
    assert_eq!(entry.severity, LogSeverity::Info);
    assert_eq!(entry.source, "vis3d::test");
    assert!(entry.file.is_none());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_error_macro_records_location() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    crate::engine_error!("vis3d::test", "located error");

    let entry = logger.find("located error").expect("entry should be captured");
    assert_eq!(entry.severity, LogSeverity::Error);
    assert!(entry.file.unwrap().ends_with("engine_tests.rs"));
    assert!(entry.line.is_some());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());
    Engine::set_min_severity(LogSeverity::Warn);

    crate::engine_debug!("vis3d::test", "filtered debug");
    crate::engine_warn!("vis3d::test", "kept warning");

    assert!(logger.find("filtered debug").is_none());
    assert!(logger.find("kept warning").is_some());
    assert_eq!(Engine::min_severity(), LogSeverity::Warn);

    Engine::reset_logger();
    assert_eq!(Engine::min_severity(), Engine::default_min_severity());
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_backend_error() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    let error = crate::engine_err!("vis3d::test", "driver error 0x{:X}", 0x0505);

    assert_eq!(error, crate::vis3d::Error::BackendError("driver error 0x505".to_string()));
    assert!(logger.find("driver error 0x505").is_some());

    Engine::reset_logger();
}
