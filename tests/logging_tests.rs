use rtrack::logging::{self, LOG_FILE_NAME, LoggingError};
use std::fs;
use tempfile::tempdir;

// The subscriber is process-global, so everything runs in one test
#[test]
fn log_file_is_created_and_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("rtrack").join(LOG_FILE_NAME);

    logging::init(&path, "info").unwrap();
    assert!(path.exists());

    tracing::warn!(entries = 0, "store file unreadable, starting empty");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("store file unreadable, starting empty"));
    assert!(contents.contains("entries=0"));
    assert!(!contents.contains('\u{1b}'), "log file should not contain ANSI escapes");

    let again = logging::init(&dir.path().join("second.log"), "info");
    assert!(matches!(again, Err(LoggingError::InitError(_))));
}
