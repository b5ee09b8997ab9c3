/*!
 * Integration tests for the document validation workflow
 */

use anyhow::Result;

use stjcheck::{Document, Issue, Severity, ValidationConfig, ValidationService, validate_document};
use crate::common;

fn validate_json(json: &str) -> Result<Vec<Issue>> {
    Ok(validate_document(&Document::from_json_str(json)?))
}

fn errors(issues: &[Issue]) -> Vec<&Issue> {
    issues.iter().filter(|issue| issue.is_error()).collect()
}

#[test]
fn test_validate_withMinimalDocument_shouldReportNothing() -> Result<()> {
    let issues = validate_json(&common::stj_with_segments(
        r#"[{"text": "Hello", "start": 0.0, "end": 1.0}]"#,
    ))?;
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    Ok(())
}

#[test]
fn test_validate_withFullDocument_shouldReportNothing() -> Result<()> {
    let issues = validate_json(common::VALID_STJ)?;
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    Ok(())
}

#[test]
fn test_validate_withOverlappingSegments_shouldReportOneOverlapOnSecond() -> Result<()> {
    let issues = validate_json(&common::stj_with_segments(
        r#"[{"text": "a", "start": 0.0, "end": 2.0}, {"text": "b", "start": 1.0, "end": 3.0}]"#,
    ))?;

    assert_eq!(issues.len(), 1, "issues: {:?}", issues);
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].location.as_deref(), Some("transcript.segments[1]"));
    assert!(issues[0].message.starts_with("Segments must not overlap"));
    Ok(())
}

#[test]
fn test_validate_withUnflaggedZeroDuration_shouldReportOneError() -> Result<()> {
    let issues = validate_json(&common::stj_with_segments(
        r#"[{"text": "beep", "start": 5.0, "end": 5.0, "is_zero_duration": false}]"#,
    ))?;

    assert_eq!(issues.len(), 1, "issues: {:?}", issues);
    assert_eq!(issues[0].message, "Zero duration item must have is_zero_duration set to true");
    Ok(())
}

#[test]
fn test_validate_withMixedLanguageCodes_shouldReportInconsistencyAcrossLocations() -> Result<()> {
    let issues = validate_json(
        r#"{"stj": {"version": "0.6.0",
            "metadata": {"languages": ["en", "eng"]},
            "transcript": {"segments": [{"text": "Hi"}]}}}"#,
    )?;

    let inconsistent: Vec<_> = issues
        .iter()
        .filter(|issue| issue.message.starts_with("Inconsistent language codes"))
        .collect();
    assert_eq!(inconsistent.len(), 1, "issues: {:?}", issues);
    assert_eq!(inconsistent[0].severity, Severity::Error);
    assert!(inconsistent[0].message.contains("English: en, eng"));
    assert_eq!(
        inconsistent[0].location.as_deref(),
        Some("metadata.languages[0], metadata.languages[1]")
    );
    Ok(())
}

#[test]
fn test_validate_withUndeclaredSpeaker_shouldReportInvalidReference() -> Result<()> {
    let issues = validate_json(
        r#"{"stj": {"version": "0.6.0", "transcript": {
            "speakers": [],
            "segments": [{"text": "Boo", "speaker_id": "ghost"}]}}}"#,
    )?;

    assert_eq!(issues.len(), 1, "issues: {:?}", issues);
    assert_eq!(issues[0].message, "Invalid speaker_id reference: ghost");
    assert_eq!(issues[0].location.as_deref(), Some("transcript.segments[0].speaker_id"));
    Ok(())
}

#[test]
fn test_validate_withCircularExtensions_shouldReportCycle() -> Result<()> {
    let issues = validate_json(
        r#"{"stj": {"version": "0.6.0", "transcript": {"segments": [{
            "text": "Hi",
            "extensions": {"custom": {"extensions": {"custom": {}}}}
        }]}}}"#,
    )?;

    assert_eq!(issues.len(), 1, "issues: {:?}", issues);
    assert_eq!(issues[0].message, "Circular reference detected in extensions: custom -> custom");
    Ok(())
}

#[test]
fn test_validate_twice_shouldReturnIdenticalIssues() -> Result<()> {
    let document = Document::from_json_str(
        r#"{"stj": {"version": "0.6.0",
            "metadata": {"languages": ["EN", "fra"], "confidence_threshold": 2.0},
            "transcript": {"segments": [
                {"text": "a", "start": 3.0, "end": 4.0, "speaker_id": "x"},
                {"text": "b", "start": 1.0, "end": 1.0},
                {"text": "c", "start": 1e2, "end": 101.0}
            ]}}}"#,
    )?;
    let service = ValidationService::new();

    let first = service.validate(&document);
    let second = service.validate(&document);

    assert!(!first.is_empty());
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_validate_withBadVersion_shouldStopAfterStructuralPhase() -> Result<()> {
    let issues = validate_json(
        r#"{"stj": {"version": "1.0.0", "transcript": {"segments": [{"text": "a", "speaker_id": "ghost"}]}}}"#,
    )?;

    assert_eq!(issues.len(), 1, "issues: {:?}", issues);
    assert_eq!(issues[0].location.as_deref(), Some("stj.version"));
    assert!(issues[0].message.starts_with("Incompatible version: 1.0.0"));
    Ok(())
}

#[test]
fn test_validate_withUnwrappedDocument_shouldReportMissingRoot() -> Result<()> {
    let issues = validate_json(r#"{"version": "0.6.0", "transcript": {}}"#)?;

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "STJ data must contain a 'stj' root object");
    Ok(())
}

#[test]
fn test_validateReport_withOnlyWarnings_shouldPassUnlessStrict() -> Result<()> {
    let document = Document::from_json_str(
        r#"{"stj": {"version": "0.6.0", "transcript": {"segments": [{
            "text": "Hello world", "start": 0.0, "end": 2.0,
            "words": [{"text": "Goodbye", "start": 0.0, "end": 1.0}, {"text": "world", "start": 1.0, "end": 2.0}]
        }]}}}"#,
    )?;

    let report = ValidationService::new().validate_report(&document);

    assert_eq!(report.error_count, 0, "issues: {:?}", report.issues);
    assert_eq!(report.warning_count, 1);
    assert!(report.is_valid());
    assert!(!report.is_clean());
    assert!(report.passes(false));
    assert!(!report.passes(true));
    Ok(())
}

#[test]
fn test_validate_withDisabledPhases_shouldSkipTheirChecks() -> Result<()> {
    let document = Document::from_json_str(
        r#"{"stj": {"version": "0.6.0",
            "metadata": {"languages": ["xx"]},
            "transcript": {"segments": [{"text": "Hi", "extensions": {"stj": {}}}]}}}"#,
    )?;
    assert_eq!(validate_document(&document).len(), 2);

    let config = ValidationConfig {
        language_validation: false,
        extension_validation: false,
        ..ValidationConfig::default()
    };
    let service = ValidationService::with_config(config);

    assert!(service.validate(&document).is_empty());
    assert!(!service.phase_names().contains(&"language"));
    Ok(())
}

#[test]
fn test_loadAndValidate_fromDisk_shouldMatchInMemoryResult() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "talk.stj.json", common::VALID_STJ)?;

    let document = Document::load_from_file(&path)?;
    let report = ValidationService::new().validate_report(&document);

    assert!(report.is_clean(), "issues: {:?}", report.issues);
    assert_eq!(errors(&report.issues).len(), 0);
    Ok(())
}
