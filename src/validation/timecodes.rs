/*!
 * Temporal validation for segments and words.
 *
 * This module validates that time values are:
 * - Finite, non-negative and within the representable range
 * - Written with at most three decimal places and no exponent
 * - Consistent with the `is_zero_duration` flag
 * - Ordered and non-overlapping between segments
 * - Inside their segment's bounds and non-overlapping between words
 *
 * A time value that fails the format checks suppresses the remaining checks
 * for the segment or word that carries it.
 */

use log::trace;

use crate::document::{Document, FieldSlot, Segment, TimeValue, Word};

use super::issue::Issue;
use super::service::ValidationPhase;

/// Largest allowed time value in seconds
pub const MAX_TIME_VALUE: f64 = 999_999.999;

/// Maximum number of decimal places in a time literal
pub const MAX_DECIMAL_PLACES: usize = 3;

/// Error code carried by segment overlap issues
pub const CODE_SEGMENT_OVERLAP: &str = "SEGMENT_OVERLAP";

/// Types of temporal issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// NaN or infinite
    NotFinite { literal: String },
    /// Below zero
    Negative { literal: String },
    /// Above `MAX_TIME_VALUE`, before or after rounding
    TooLarge { literal: String },
    /// More than `MAX_DECIMAL_PLACES` fractional digits
    TooPrecise,
    /// Literal uses an exponent
    ScientificNotation { literal: String },
    /// Only one of `start` and `end` is present
    IncompleteRange { in_word: bool },
    /// `is_zero_duration` present without times
    FlagWithoutTimes { in_word: bool },
    /// `start == end` but the flag is not set
    ZeroDurationNotFlagged,
    /// Flag set but `start != end`
    NonZeroDurationFlagged,
    /// `start > end`
    StartAfterEnd { start: String, end: String },
    /// Segment sorts before its predecessor
    OutOfOrder,
    /// Segment starts before its predecessor ends
    SegmentOverlap { start: String, previous_end: String },
    /// Word starts before its segment
    WordBeforeSegment { word_start: String, segment_start: String },
    /// Word ends after its segment
    WordAfterSegment { word_end: String, segment_end: String },
    /// Word starts before the previous word ends
    WordOverlap,
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::NotFinite { literal } => {
                write!(f, "Time value must be a finite number, got {}", literal)
            }
            TimecodeIssue::Negative { literal } => {
                write!(f, "Time value must be non-negative, got {}", literal)
            }
            TimecodeIssue::TooLarge { literal } => {
                write!(
                    f,
                    "Time value exceeds maximum allowed ({}), got {}",
                    MAX_TIME_VALUE, literal
                )
            }
            TimecodeIssue::TooPrecise => {
                write!(
                    f,
                    "Time value has too many decimal places; maximum allowed is {} decimal places",
                    MAX_DECIMAL_PLACES
                )
            }
            TimecodeIssue::ScientificNotation { literal } => {
                write!(f, "Scientific notation is not allowed for time values, got {}", literal)
            }
            TimecodeIssue::IncompleteRange { in_word: false } => {
                write!(f, "If 'start' or 'end' is present, both must be present.")
            }
            TimecodeIssue::IncompleteRange { in_word: true } => {
                write!(f, "If 'start' or 'end' is present in a word, both must be present.")
            }
            TimecodeIssue::FlagWithoutTimes { in_word: false } => {
                write!(f, "'is_zero_duration' must not be present when 'start' and 'end' are absent.")
            }
            TimecodeIssue::FlagWithoutTimes { in_word: true } => {
                write!(
                    f,
                    "'is_zero_duration' must not be present when 'start' and 'end' are absent in a word."
                )
            }
            TimecodeIssue::ZeroDurationNotFlagged => {
                write!(f, "Zero duration item must have is_zero_duration set to true")
            }
            TimecodeIssue::NonZeroDurationFlagged => {
                write!(f, "Non-zero duration item cannot have is_zero_duration set to true")
            }
            TimecodeIssue::StartAfterEnd { start, end } => {
                write!(f, "Start time ({}) cannot be greater than end time ({})", start, end)
            }
            TimecodeIssue::OutOfOrder => {
                write!(f, "Segments must be ordered by start time, with ties ordered by end time.")
            }
            TimecodeIssue::SegmentOverlap { start, previous_end } => {
                write!(
                    f,
                    "Segments must not overlap. Segment starts at {} before previous segment ends at {}.",
                    start, previous_end
                )
            }
            TimecodeIssue::WordBeforeSegment { word_start, segment_start } => {
                write!(
                    f,
                    "Word start time ({}) cannot be before segment start time ({})",
                    word_start, segment_start
                )
            }
            TimecodeIssue::WordAfterSegment { word_end, segment_end } => {
                write!(
                    f,
                    "Word end time ({}) cannot be after segment end time ({})",
                    word_end, segment_end
                )
            }
            TimecodeIssue::WordOverlap => write!(f, "Words within segment must not overlap in time"),
        }
    }
}

impl TimecodeIssue {
    fn spec_anchor(&self) -> &'static str {
        match self {
            TimecodeIssue::NotFinite { .. }
            | TimecodeIssue::Negative { .. }
            | TimecodeIssue::TooLarge { .. }
            | TimecodeIssue::TooPrecise
            | TimecodeIssue::ScientificNotation { .. } => "#time-format",
            TimecodeIssue::IncompleteRange { .. } | TimecodeIssue::StartAfterEnd { .. } => {
                "#segments"
            }
            TimecodeIssue::FlagWithoutTimes { .. }
            | TimecodeIssue::ZeroDurationNotFlagged
            | TimecodeIssue::NonZeroDurationFlagged => "#zero-duration",
            TimecodeIssue::OutOfOrder | TimecodeIssue::SegmentOverlap { .. } => "#segment-ordering",
            TimecodeIssue::WordBeforeSegment { .. }
            | TimecodeIssue::WordAfterSegment { .. }
            | TimecodeIssue::WordOverlap => "#words",
        }
    }

    /// Convert to a located issue
    pub fn into_issue(self, location: impl Into<String>) -> Issue {
        let anchor = self.spec_anchor();
        let issue = Issue::error(self.to_string()).at(location).spec_ref(anchor);
        match self {
            TimecodeIssue::SegmentOverlap { .. } => issue.code(CODE_SEGMENT_OVERLAP),
            _ => issue,
        }
    }
}

/// Validate the textual and numeric form of a single time value
pub fn validate_time_format(time: &TimeValue) -> Vec<TimecodeIssue> {
    let value = time.value();
    let literal = time.literal().to_string();

    if !value.is_finite() {
        return vec![TimecodeIssue::NotFinite { literal }];
    }
    if value < 0.0 {
        return vec![TimecodeIssue::Negative { literal }];
    }
    if value > MAX_TIME_VALUE || round_millis(value) > MAX_TIME_VALUE {
        return vec![TimecodeIssue::TooLarge { literal }];
    }

    let mut issues = Vec::new();
    if decimal_places(&literal) > MAX_DECIMAL_PLACES {
        issues.push(TimecodeIssue::TooPrecise);
    }
    if literal.contains(['e', 'E']) {
        issues.push(TimecodeIssue::ScientificNotation { literal });
    }
    issues
}

/// Check a start/end pair against the `is_zero_duration` flag
pub fn validate_zero_duration(start: f64, end: f64, is_zero_duration: bool) -> Vec<TimecodeIssue> {
    let mut issues = Vec::new();
    if start == end {
        if !is_zero_duration {
            issues.push(TimecodeIssue::ZeroDurationNotFlagged);
        }
        return issues;
    }

    if is_zero_duration {
        issues.push(TimecodeIssue::NonZeroDurationFlagged);
    }
    if start > end {
        issues.push(TimecodeIssue::StartAfterEnd {
            start: format_seconds(start),
            end: format_seconds(end),
        });
    }
    issues
}

/// Number of fractional digits a numeric literal expresses
pub fn decimal_places(literal: &str) -> usize {
    let (mantissa, exponent) = match literal.find(['e', 'E']) {
        Some(pos) => (&literal[..pos], parse_exponent(&literal[pos + 1..])),
        None => (literal, 0),
    };
    let fraction_digits = mantissa
        .split_once('.')
        .map(|(_, fraction)| fraction.len() as i64)
        .unwrap_or(0);
    usize::try_from(fraction_digits.saturating_sub(exponent).max(0)).unwrap_or(usize::MAX)
}

/// Exponent digits saturated to the `i64` range
fn parse_exponent(text: &str) -> i64 {
    text.parse::<i64>().unwrap_or_else(|_| {
        let digits = text.trim_start_matches(['+', '-']);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            0
        } else if text.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

fn round_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn format_seconds(value: f64) -> String {
    value.to_string()
}

/// Configuration for the temporal validator
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Check word bounds and word overlap inside each segment
    pub check_words: bool,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self { check_words: true }
    }
}

/// Temporal validator for segments and words
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::with_config(TimecodeValidatorConfig::default())
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Times of an item if both are present, well-formed and pass format checks
    fn checked_range(
        start: Option<&TimeValue>,
        end: Option<&TimeValue>,
        location: &str,
        issues: &mut Vec<Issue>,
    ) -> Option<(f64, f64)> {
        let (start, end) = (start?, end?);
        let mut ok = true;
        for (time, field) in [(start, "start"), (end, "end")] {
            let format_issues = validate_time_format(time);
            ok &= format_issues.is_empty();
            for issue in format_issues {
                issues.push(issue.into_issue(format!("{}.{}", location, field)));
            }
        }
        ok.then(|| (start.value(), end.value()))
    }

    fn validate_segment(
        &self,
        segment: &Segment,
        location: &str,
        previous: &mut Option<(f64, f64)>,
        issues: &mut Vec<Issue>,
    ) {
        if segment.start.is_present() != segment.end.is_present() {
            issues.push(TimecodeIssue::IncompleteRange { in_word: false }.into_issue(location));
        }
        if !segment.start.is_present()
            && !segment.end.is_present()
            && segment.is_zero_duration.is_present()
        {
            issues.push(
                TimecodeIssue::FlagWithoutTimes { in_word: false }
                    .into_issue(format!("{}.is_zero_duration", location)),
            );
        }

        let range = Self::checked_range(segment.start.value(), segment.end.value(), location, issues);
        if let Some((start, end)) = range {
            for issue in validate_zero_duration(start, end, segment.is_zero_duration()) {
                issues.push(issue.into_issue(location));
            }

            if let Some((previous_start, previous_end)) = *previous {
                if start < previous_start || (start == previous_start && end < previous_end) {
                    issues.push(TimecodeIssue::OutOfOrder.into_issue(location));
                } else if start < previous_end && !(start == previous_end && previous_end == end) {
                    issues.push(
                        TimecodeIssue::SegmentOverlap {
                            start: format_seconds(start),
                            previous_end: format_seconds(previous_end),
                        }
                        .into_issue(location),
                    );
                }
            }
            *previous = Some((start, end));
        }

        if self.config.check_words {
            self.validate_words(segment, location, range, issues);
        }
    }

    fn validate_words(
        &self,
        segment: &Segment,
        location: &str,
        segment_range: Option<(f64, f64)>,
        issues: &mut Vec<Issue>,
    ) {
        let mut previous_end: Option<f64> = None;
        for (idx, word) in segment.words() {
            let word_location = format!("{}.words[{}]", location, idx);
            let Some((start, end)) = Self::validate_word(word, &word_location, issues) else {
                continue;
            };

            if let Some((segment_start, segment_end)) = segment_range {
                if start < segment_start {
                    issues.push(
                        TimecodeIssue::WordBeforeSegment {
                            word_start: format_seconds(start),
                            segment_start: format_seconds(segment_start),
                        }
                        .into_issue(&word_location),
                    );
                }
                if end > segment_end {
                    issues.push(
                        TimecodeIssue::WordAfterSegment {
                            word_end: format_seconds(end),
                            segment_end: format_seconds(segment_end),
                        }
                        .into_issue(&word_location),
                    );
                }
            }

            if previous_end.is_some_and(|prev| start < prev) {
                issues.push(TimecodeIssue::WordOverlap.into_issue(&word_location));
            }
            previous_end = Some(end);
        }
    }

    fn validate_word(word: &Word, location: &str, issues: &mut Vec<Issue>) -> Option<(f64, f64)> {
        if word.start.is_present() != word.end.is_present() {
            issues.push(TimecodeIssue::IncompleteRange { in_word: true }.into_issue(location));
        }
        if !word.start.is_present() && !word.end.is_present() && word.is_zero_duration.is_present() {
            issues.push(
                TimecodeIssue::FlagWithoutTimes { in_word: true }
                    .into_issue(format!("{}.is_zero_duration", location)),
            );
        }

        let (start, end) = Self::checked_range(word.start.value(), word.end.value(), location, issues)?;
        for issue in validate_zero_duration(start, end, word.is_zero_duration()) {
            issues.push(issue.into_issue(location));
        }
        Some((start, end))
    }
}

impl Default for TimecodeValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationPhase for TimecodeValidator {
    fn name(&self) -> &'static str {
        "timecodes"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(transcript) = document.transcript() else {
            return issues;
        };

        let mut previous = None;
        for (idx, segment) in transcript.segments() {
            let location = format!("transcript.segments[{}]", idx);
            self.validate_segment(segment, &location, &mut previous, &mut issues);
        }

        trace!("Timecode validation found {} issues", issues.len());
        issues
    }
}
