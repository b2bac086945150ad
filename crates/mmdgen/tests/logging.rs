//! Tests for logging initialization

use std::str::FromStr;

use mmdgen::core::logging::{init_logging, LogFormat};

#[test]
fn test_log_format_variants() {
    for name in LogFormat::variants() {
        assert!(LogFormat::from_str(name).is_ok(), "{name}");
    }
    assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("xml"));
    assert!(result.is_err());
}

#[test]
fn test_init_logging_only_once() {
    // The first call may win or lose against other tests in this binary;
    // a second call must always report the existing subscriber.
    let _ = init_logging(Some("debug"), Some("compact"));
    assert!(init_logging(Some("debug"), Some("json")).is_err());
}
