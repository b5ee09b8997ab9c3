/*!
 * Common test utilities for the stjcheck test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

/// Routes library logging to the test harness, once per process
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small, fully valid STJ document
pub const VALID_STJ: &str = r##"{
  "stj": {
    "version": "0.6.0",
    "metadata": {
      "transcriber": {"name": "YAWT", "version": "0.4.0"},
      "created_at": "2024-10-24T15:30:00Z",
      "source": {"uri": "https://example.com/talk.mp4", "duration": 20.0, "languages": ["en"]},
      "languages": ["en"]
    },
    "transcript": {
      "speakers": [{"id": "Speaker1", "name": "Dr. Smith"}],
      "styles": [{"id": "emphasis", "text": {"bold": true, "color": "#FF0000"}}],
      "segments": [
        {
          "start": 0.0,
          "end": 5.0,
          "text": "Welcome to the talk.",
          "speaker_id": "Speaker1",
          "confidence": 0.95,
          "language": "en",
          "word_timing_mode": "complete",
          "words": [
            {"start": 0.0, "end": 1.0, "text": "Welcome"},
            {"start": 1.0, "end": 1.5, "text": "to"},
            {"start": 1.5, "end": 2.0, "text": "the"},
            {"start": 2.0, "end": 3.0, "text": "talk."}
          ]
        },
        {
          "start": 5.0,
          "end": 10.0,
          "text": "Let's begin.",
          "speaker_id": "Speaker1",
          "style_id": "emphasis"
        }
      ]
    }
  }
}"##;

/// Wrap a segments array in an otherwise minimal document
pub fn stj_with_segments(segments: &str) -> String {
    format!(
        r#"{{"stj": {{"version": "0.6.0", "transcript": {{"segments": {}}}}}}}"#,
        segments
    )
}
