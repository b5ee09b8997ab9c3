/*!
 * Tests for error types and conversions
 */

use stjcheck::errors::{AppError, ConfigError, DocumentError, ValidationError};
use stjcheck::Issue;

#[test]
fn test_documentError_json_shouldDisplayPosition() {
    let error = DocumentError::Json {
        line: 3,
        column: 7,
        message: "expected value".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("line 3"));
    assert!(display.contains("column 7"));
    assert!(display.contains("expected value"));
}

#[test]
fn test_documentError_fromSerdeJson_shouldCaptureLineAndColumn() {
    let json_error = serde_json::from_str::<serde_json::Value>("{\"a\": }").unwrap_err();
    let error = DocumentError::from(json_error);
    assert!(matches!(error, DocumentError::Json { line: 1, .. }));
}

#[test]
fn test_validationError_shouldCountOnlyErrors() {
    let error = ValidationError::new(vec![
        Issue::error("Invalid speaker_id reference: ghost").at("transcript.segments[0].speaker_id"),
        Issue::warning("Segment text does not match"),
        Issue::error("Duplicate speaker ID: a"),
    ]);
    let display = format!("{}", error);
    assert!(display.starts_with("Validation failed with 2 error(s)"));
    assert!(display.contains("transcript.segments[0].speaker_id: Invalid speaker_id reference: ghost"));
}

#[test]
fn test_configError_invalidValue_shouldNameField() {
    let error = ConfigError::InvalidValue {
        field: "repair.small_overlap_threshold".to_string(),
        reason: "must be a non-negative number".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("repair.small_overlap_threshold"));
    assert!(display.contains("must be a non-negative number"));
}

#[test]
fn test_appError_conversions_shouldWrapSourceErrors() {
    let app_error: AppError = ConfigError::Parse("bad".to_string()).into();
    assert!(matches!(app_error, AppError::Config(_)));
    assert!(app_error.to_string().starts_with("Configuration error"));

    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));

    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(ref message) if message == "something odd"));

    let app_error: AppError = DocumentError::Encode("nan".to_string()).into();
    assert!(app_error.to_string().contains("Failed to encode document"));
}
