/*!
 * Integration tests for the load, repair, save workflow
 */

use anyhow::Result;

use stjcheck::app_config::Config;
use stjcheck::file_utils::FileManager;
use stjcheck::repair::{CODE_OVERLAP, OverlapRepairer};
use stjcheck::{Document, ValidationService, repair_overlaps};
use crate::common;

#[test]
fn test_repair_workflow_withOverlapsOnDisk_shouldWriteValidDocument() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "input/talk.stj.json",
        &common::stj_with_segments(
            r#"[
                {"text": "First part", "start": 0.0, "end": 4.0},
                {"text": "second part", "start": 3.5, "end": 6.0},
                {"text": "Third", "start": 6.0, "end": 9.0}
            ]"#,
        ),
    )?;
    let output = temp_dir.path().join("output/talk.stj.json");
    let config = Config::default();

    // 1. Discover and load
    let inputs = FileManager::collect_inputs(temp_dir.path().join("input"))?;
    assert_eq!(inputs, vec![input]);
    let document = Document::load_from_file(&inputs[0])?;
    assert!(!ValidationService::new().validate_report(&document).is_valid());

    // 2. Repair and write
    FileManager::ensure_writable(&output, false)?;
    let outcome = repair_overlaps(&document, &config.repair);
    assert_eq!(outcome.repairs, 1);
    outcome.document.save_to_file(&output)?;

    // 3. Reload and check
    let reloaded = Document::load_from_file(&output)?;
    let report = ValidationService::with_config(config.validation).validate_report(&reloaded);
    assert!(report.is_clean(), "issues: {:?}", report.issues);

    let texts: Vec<_> = reloaded
        .transcript()
        .map(|t| t.segments().filter_map(|(_, s)| s.text().map(str::to_string)).collect())
        .unwrap_or_default();
    assert_eq!(texts, vec!["First part second part".to_string(), "Third".to_string()]);

    // 4. A second run must not silently overwrite
    assert!(FileManager::ensure_writable(&output, false).is_err());
    Ok(())
}

#[test]
fn test_repairChecked_withNonOverlapErrors_shouldRefuseAndWriteNothing() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "talk.stj.json",
        &common::stj_with_segments(
            r#"[
                {"text": "First", "start": 0.0, "end": 4.0, "bogus": 1, "confidence": "high"},
                "not-a-segment",
                {"text": "Second", "start": 3.5, "end": 6.0}
            ]"#,
        ),
    )?;
    let output = temp_dir.path().join("repaired.stj.json");
    let config = Config::default();
    let service = ValidationService::with_config(config.validation.clone());

    let document = Document::load_from_file(&input)?;
    let result = OverlapRepairer::with_config(config.repair).repair_checked(&document, &service);

    let error = match result {
        Ok(outcome) => panic!("repair should be refused, got {} repairs", outcome.repairs),
        Err(error) => error,
    };
    let locations: Vec<_> = error.issues.iter().filter_map(|i| i.location.as_deref()).collect();
    assert!(locations.contains(&"transcript.segments[0]"), "issues: {:?}", error.issues);
    assert!(locations.contains(&"transcript.segments[0].confidence"), "issues: {:?}", error.issues);
    assert!(locations.contains(&"transcript.segments[1]"), "issues: {:?}", error.issues);
    assert!(error.issues.iter().all(|i| i.is_error()));
    assert!(error.issues.iter().all(|i| i.error_code.as_deref() != Some(CODE_OVERLAP)));
    assert!(error.to_string().starts_with("Validation failed with"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_repairChecked_withOnlyOverlaps_shouldRepair() -> Result<()> {
    let document = Document::from_json_str(&common::stj_with_segments(
        r#"[{"text": "a", "start": 0.0, "end": 4.0}, {"text": "b", "start": 3.9, "end": 6.0}]"#,
    ))?;
    let service = ValidationService::new();
    assert!(!service.validate_report(&document).is_valid());

    let outcome = OverlapRepairer::new().repair_checked(&document, &service)?;

    assert_eq!(outcome.repairs, 1);
    assert!(service.validate_report(&outcome.document).is_valid());
    Ok(())
}

#[test]
fn test_validate_directory_withMixedFiles_shouldReportPerFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a_good.json", common::VALID_STJ)?;
    common::create_test_file(temp_dir.path(), "b_bad.json", r#"{"stj": {"version": "0.5.0"}}"#)?;
    common::create_test_file(temp_dir.path(), "c_broken.json", "{ nope")?;

    let service = ValidationService::new();
    let results: Vec<Option<bool>> = FileManager::collect_inputs(temp_dir.path())?
        .iter()
        .map(|path| {
            Document::load_from_file(path)
                .ok()
                .map(|document| service.validate_report(&document).is_valid())
        })
        .collect();

    assert_eq!(results, vec![Some(true), Some(false), None]);
    Ok(())
}
