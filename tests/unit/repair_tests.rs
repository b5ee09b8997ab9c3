/*!
 * Tests for document-level overlap repair
 */

use anyhow::Result;

use stjcheck::repair::{RepairConfig, RepairStrategy, repair_overlaps, resolve_overlap};
use stjcheck::document::Segment;
use stjcheck::{Document, Severity, ValidationService};

fn document_with_segments(segments: &str) -> Result<Document> {
    Ok(Document::from_json_str(&format!(
        r#"{{"stj": {{"version": "0.6.0", "transcript": {{
            "speakers": [{{"id": "s1"}}, {{"id": "s2"}}],
            "segments": {}
        }}}}}}"#,
        segments
    ))?)
}

fn segment_times(document: &Document) -> Vec<(f64, f64)> {
    document
        .transcript()
        .map(|t| t.segments().filter_map(|(_, s)| s.timing()).collect())
        .unwrap_or_default()
}

fn codes(issues: &[stjcheck::Issue]) -> Vec<&str> {
    issues.iter().filter_map(|i| i.error_code.as_deref()).collect()
}

#[test]
fn test_repairOverlaps_withAdjustAndSplit_shouldProduceValidDocument() -> Result<()> {
    let document = document_with_segments(
        r#"[
            {"text": "Hello there", "start": 0.0, "end": 5.0, "speaker_id": "s1"},
            {"text": "Hi", "start": 4.8, "end": 8.0, "speaker_id": "s2"},
            {"text": "Go on", "start": 7.0, "end": 12.0, "speaker_id": "s1"}
        ]"#,
    )?;
    assert!(!ValidationService::new().validate_report(&document).is_valid());

    let outcome = repair_overlaps(&document, &RepairConfig::default());

    assert_eq!(outcome.repairs, 2);
    assert_eq!(
        segment_times(&outcome.document),
        vec![(0.0, 4.8), (4.8, 7.0), (7.0, 8.0), (8.0, 12.0)]
    );
    assert_eq!(
        codes(&outcome.issues),
        vec!["SEGMENT_OVERLAP", "SEGMENT_ADJUSTED", "SEGMENT_OVERLAP", "SEGMENT_SPLIT"]
    );
    assert_eq!(outcome.issues[0].severity, Severity::Warning);
    assert_eq!(outcome.issues[1].severity, Severity::Info);
    assert_eq!(outcome.issues[0].location.as_deref(), Some("transcript.segments[1]"));

    let report = ValidationService::new().validate_report(&outcome.document);
    assert!(report.is_valid(), "repaired document should validate: {:?}", report.issues);
    Ok(())
}

#[test]
fn test_repairOverlaps_shouldNotMutateInput() -> Result<()> {
    let document = document_with_segments(
        r#"[
            {"text": "One", "start": 0.0, "end": 3.0, "speaker_id": "s1"},
            {"text": "Two", "start": 2.0, "end": 4.0, "speaker_id": "s1"}
        ]"#,
    )?;
    let before = document.clone();

    let outcome = repair_overlaps(&document, &RepairConfig::default());

    assert_eq!(document, before);
    assert_eq!(segment_times(&outcome.document), vec![(0.0, 4.0)]);
    let (_, merged) = outcome.document.transcript().and_then(|t| t.segments().next()).expect("merged segment");
    assert_eq!(merged.text(), Some("One Two"));
    Ok(())
}

#[test]
fn test_repairOverlaps_withOutOfOrderSegments_shouldLeaveThemAlone() -> Result<()> {
    let document = document_with_segments(
        r#"[
            {"text": "Late", "start": 5.0, "end": 8.0},
            {"text": "Early", "start": 1.0, "end": 6.0}
        ]"#,
    )?;

    let outcome = repair_overlaps(&document, &RepairConfig::default());

    assert_eq!(outcome.repairs, 0);
    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.document, document);
    Ok(())
}

#[test]
fn test_repairOverlaps_withAllStrategiesDisabled_shouldOnlyReport() -> Result<()> {
    let document = document_with_segments(
        r#"[
            {"text": "One", "start": 0.0, "end": 3.0, "speaker_id": "s1"},
            {"text": "Two", "start": 2.0, "end": 4.0, "speaker_id": "s2"}
        ]"#,
    )?;
    let config = RepairConfig {
        merge_compatible: false,
        adjust_small_overlaps: false,
        split_overlaps: false,
        ..RepairConfig::default()
    };

    let outcome = repair_overlaps(&document, &config);

    assert_eq!(outcome.repairs, 0);
    assert_eq!(codes(&outcome.issues), vec!["SEGMENT_OVERLAP"]);
    assert_eq!(segment_times(&outcome.document), vec![(0.0, 3.0), (2.0, 4.0)]);
    Ok(())
}

#[test]
fn test_resolveOverlap_withCustomThreshold_shouldChooseAdjust() {
    let first = Segment::new("a").with_times(0.0, 3.0).with_speaker("s1");
    let second = Segment::new("b").with_times(2.0, 4.0).with_speaker("s2");
    let config = RepairConfig {
        small_overlap_threshold: 1.5,
        ..RepairConfig::default()
    };

    let repair = resolve_overlap(&first, &second, &config).expect("segments overlap");
    assert_eq!(repair.strategy, RepairStrategy::Adjust);
    assert_eq!(repair.segments[0].timing(), Some((0.0, 2.0)));
    assert_eq!(repair.segments[1], second);
}
