/*!
 * Word timing mode validation.
 *
 * Each segment resolves to one timing state. An explicit
 * `word_timing_mode` wins; otherwise the state is inferred from the words:
 *
 * - every word timed: `Complete`
 * - no word timed, or no words: `None`
 * - some words timed: `Undetermined`, which is an error because partial
 *   timing must be declared
 *
 * The constraints of the resolved state are then checked. Zero-duration
 * segments must carry neither words nor a mode.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, Field, FieldSlot, Segment, Word, WordTimingMode};

use super::issue::Issue;
use super::service::ValidationPhase;

static PUNCTUATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("Invalid punctuation regex"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Resolved word timing state of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingState {
    Complete,
    Partial,
    None,
    /// Mixed timing without an explicit mode
    Undetermined,
}

impl From<WordTimingMode> for TimingState {
    fn from(mode: WordTimingMode) -> Self {
        match mode {
            WordTimingMode::Complete => TimingState::Complete,
            WordTimingMode::Partial => TimingState::Partial,
            WordTimingMode::None => TimingState::None,
        }
    }
}

/// Resolve the timing state from an explicit mode and the words present
pub fn resolve_timing_state(explicit: Option<WordTimingMode>, words: &[Field<Word>]) -> TimingState {
    if let Some(mode) = explicit {
        return mode.into();
    }

    let words: Vec<&Word> = words.iter().filter_map(Field::valid).collect();
    let timed = words.iter().filter(|word| word.has_timing()).count();
    if timed == 0 {
        TimingState::None
    } else if timed == words.len() {
        TimingState::Complete
    } else {
        TimingState::Undetermined
    }
}

/// Lowercase, strip punctuation and collapse whitespace
pub fn normalize_text(text: &str) -> String {
    let stripped = PUNCTUATION_REGEX.replace_all(text, "");
    WHITESPACE_REGEX
        .replace_all(stripped.trim(), " ")
        .to_lowercase()
}

/// Checks word timing modes and the words they govern
pub struct WordTimingValidator {
    check_text_consistency: bool,
}

impl WordTimingValidator {
    pub fn new() -> Self {
        Self::with_text_consistency(true)
    }

    /// Enable or disable the segment-text versus words comparison
    pub fn with_text_consistency(check_text_consistency: bool) -> Self {
        Self { check_text_consistency }
    }

    fn validate_segment(&self, segment: &Segment, location: &str, issues: &mut Vec<Issue>) {
        let issue = |message: String| Issue::error(message).at(location).spec_ref("#word-timing-mode");

        if segment.is_zero_duration() {
            if segment.words.is_present() {
                issues.push(
                    Issue::error("Zero-duration segment must not have a 'words' array.")
                        .at(location)
                        .spec_ref("#zero-duration"),
                );
            }
            if segment.word_timing_mode.is_present() {
                issues.push(
                    Issue::error("Zero-duration segment must not have 'word_timing_mode'.")
                        .at(location)
                        .spec_ref("#zero-duration"),
                );
            }
            return;
        }

        let explicit = match &segment.word_timing_mode {
            None => None,
            // Reported by the field validator
            Some(Field::Malformed(_)) => return,
            Some(Field::Valid(raw)) => match raw.parse::<WordTimingMode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    issues.push(
                        Issue::error(format!(
                            "Invalid word_timing_mode '{}'. Must be one of 'complete', 'partial', or 'none'.",
                            raw
                        ))
                        .at(format!("{}.word_timing_mode", location))
                        .spec_ref("#word-timing-mode"),
                    );
                    return;
                }
            },
        };

        let words = segment.word_list().unwrap_or_default();
        match resolve_timing_state(explicit, words) {
            TimingState::Undetermined => {
                issues.push(issue(
                    "Incomplete word timing data requires explicit 'word_timing_mode: partial'".to_string(),
                ));
            }
            TimingState::None => {
                if !words.is_empty() {
                    let message = if explicit.is_some() {
                        "Segment with word_timing_mode 'none' must not include a words array"
                    } else {
                        "Segment with untimed words must not include a words array unless word_timing_mode is set"
                    };
                    issues.push(issue(message.to_string()));
                }
            }
            TimingState::Complete => {
                if words.is_empty() {
                    issues.push(issue(
                        "Segment with word_timing_mode 'complete' must include a non-empty words array".to_string(),
                    ));
                    return;
                }
                for (idx, word) in segment.words() {
                    if !word.has_timing() {
                        issues.push(
                            Issue::error("All words must have timing data when word_timing_mode is 'complete'")
                                .at(format!("{}.words[{}]", location, idx))
                                .spec_ref("#word-timing-mode"),
                        );
                    }
                }
                if self.check_text_consistency {
                    self.check_text(segment, location, issues);
                }
            }
            TimingState::Partial => {
                if words.is_empty() {
                    issues.push(issue(
                        "Segment with word_timing_mode 'partial' must include a non-empty words array".to_string(),
                    ));
                    return;
                }
                if !segment.words().any(|(_, word)| word.has_timing()) {
                    issues.push(issue(
                        "Segment with word_timing_mode 'partial' requires at least one word with timing data"
                            .to_string(),
                    ));
                }
            }
        }
    }

    fn check_text(&self, segment: &Segment, location: &str, issues: &mut Vec<Issue>) {
        let Some(text) = segment.text() else { return };
        let words_text = segment
            .words()
            .filter_map(|(_, word)| word.text())
            .collect::<Vec<_>>()
            .join(" ");

        if normalize_text(text) != normalize_text(&words_text) {
            issues.push(
                Issue::warning(format!(
                    "Segment text does not match concatenated word texts (ignoring whitespace and punctuation). Segment: '{}', Words: '{}'",
                    text, words_text
                ))
                .at(location)
                .spec_ref("#words"),
            );
        }
    }
}

impl Default for WordTimingValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationPhase for WordTimingValidator {
    fn name(&self) -> &'static str {
        "word_timing"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        if let Some(transcript) = document.transcript() {
            for (idx, segment) in transcript.segments() {
                let location = format!("transcript.segments[{}]", idx);
                self.validate_segment(segment, &location, &mut issues);
            }
        }
        issues
    }
}
