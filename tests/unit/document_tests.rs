/*!
 * Tests for document loading and saving
 */

use anyhow::Result;

use stjcheck::document::{Field, FieldSlot, RootShape, Segment, Transcript, ValueKind, WordTimingMode};
use stjcheck::errors::DocumentError;
use stjcheck::Document;
use crate::common;

#[test]
fn test_fromJsonStr_withValidDocument_shouldDecodeEveryLevel() -> Result<()> {
    let document = Document::from_json_str(common::VALID_STJ)?;

    assert_eq!(document.shape, RootShape::Wrapped);
    assert_eq!(document.version(), Some("0.6.0"));

    let metadata = document.metadata().expect("metadata should decode");
    let source = metadata.source().expect("source should decode");
    assert_eq!(source.uri.value().map(String::as_str), Some("https://example.com/talk.mp4"));

    let transcript = document.transcript().expect("transcript should decode");
    let segments: Vec<_> = transcript.segments().collect();
    assert_eq!(segments.len(), 2);

    let (_, first) = segments[0];
    assert_eq!(first.timing(), Some((0.0, 5.0)));
    assert_eq!(first.speaker_id(), Some("Speaker1"));
    assert_eq!(first.words().count(), 4);
    assert_eq!(
        first.word_timing_mode.value().and_then(|mode| mode.parse::<WordTimingMode>().ok()),
        Some(WordTimingMode::Complete)
    );

    assert_eq!(transcript.speakers().count(), 1);
    assert_eq!(transcript.styles().count(), 1);
    Ok(())
}

#[test]
fn test_fromJsonStr_withSyntaxError_shouldReportPosition() {
    let err = Document::from_json_str("{\n  \"stj\": ").unwrap_err();
    match err {
        DocumentError::Json { line, .. } => assert_eq!(line, 2),
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn test_fromJsonStr_withNonObjectRoot_shouldRecordShape() -> Result<()> {
    assert_eq!(Document::from_json_str("[1, 2]")?.shape, RootShape::NotAnObject(ValueKind::Array));
    assert_eq!(Document::from_json_str(r#"{"other": 1}"#)?.shape, RootShape::MissingRootKey);
    assert_eq!(
        Document::from_json_str(r#"{"stj": "0.6.0"}"#)?.shape,
        RootShape::InvalidRoot(ValueKind::String)
    );
    Ok(())
}

#[test]
fn test_fromJsonStr_withWrongTypes_shouldKeepMalformedFields() -> Result<()> {
    let document = Document::from_json_str(&common::stj_with_segments(
        r#"[{"text": 42, "start": "zero", "end": 1.0}, "not a segment"]"#,
    ))?;

    let transcript = document.transcript().expect("transcript should decode");
    let segments = transcript.segments.as_ref().and_then(Field::valid).expect("segments list");
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].malformed(), Some(ValueKind::String));

    let first = segments[0].valid().expect("first segment is an object");
    assert_eq!(first.text.as_ref().and_then(Field::malformed), Some(ValueKind::Number));
    assert_eq!(first.start.as_ref().and_then(Field::malformed), Some(ValueKind::String));
    assert!(first.timing().is_none());

    // Only well-formed records are iterated
    assert_eq!(transcript.segments().count(), 1);
    Ok(())
}

#[test]
fn test_fromJsonStr_withUnknownKeys_shouldCollectSortedExtras() -> Result<()> {
    let document = Document::from_json_str(&common::stj_with_segments(
        r#"[{"text": "Hi", "zeta": 1, "alpha": 2}]"#,
    ))?;

    let transcript = document.transcript().expect("transcript should decode");
    let (_, segment) = transcript.segments().next().expect("one segment");
    assert_eq!(segment.extra_fields, vec!["alpha".to_string(), "zeta".to_string()]);
    Ok(())
}

#[test]
fn test_saveToFile_thenLoad_shouldPreserveTimeLiterals() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out.stj.json");

    let source = Document::from_json_str(&common::stj_with_segments(
        r#"[{"text": "Hi", "start": 1.500, "end": 2.0}]"#,
    ))?;
    source.save_to_file(&path)?;

    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("1.500"));

    let reloaded = Document::load_from_file(&path)?;
    assert_eq!(reloaded, source);
    Ok(())
}

#[test]
fn test_loadFromFile_withMissingFile_shouldReturnIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let err = Document::load_from_file(temp_dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, DocumentError::Io(_)));
    Ok(())
}

#[test]
fn test_toValue_withBuiltDocument_shouldWrapInRootKey() {
    let document = Document::new(
        "0.6.0",
        Transcript::new(vec![Segment::new("Hello").with_times(0.0, 1.0).with_speaker("S1")]),
    );

    let value = document.to_value();
    assert_eq!(value["stj"]["version"], "0.6.0");
    assert_eq!(value["stj"]["transcript"]["segments"][0]["speaker_id"], "S1");
    assert_eq!(value["stj"]["transcript"]["segments"][0]["end"].as_f64(), Some(1.0));
}
