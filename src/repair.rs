/*!
 * Overlap repair for segments.
 *
 * Repair is opt-in and separate from validation: it never mutates its
 * input, returning new segments plus issues that describe each action.
 *
 * For each pair of consecutive timed segments that overlap:
 * - Merge when speaker, style and language all match
 * - Adjust the first segment's end when the overlap is small
 * - Split into before, overlap and after segments otherwise
 *
 * Zero-duration segments and out-of-order pairs are left alone.
 *
 * Writing a document keeps only well-formed values, so `repair_checked`
 * refuses documents with errors other than segment overlaps.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::document::{Document, Field, FieldSlot, Segment, TimeValue, Word, WordTimingMode};
use crate::errors::ValidationError;
use crate::validation::timecodes::CODE_SEGMENT_OVERLAP;
use crate::validation::{Issue, ValidationService};

/// Overlaps shorter than this many seconds are adjusted rather than split
pub const DEFAULT_SMALL_OVERLAP_THRESHOLD: f64 = 0.5;

pub const CODE_OVERLAP: &str = CODE_SEGMENT_OVERLAP;
pub const CODE_MERGED: &str = "SEGMENT_MERGED";
pub const CODE_ADJUSTED: &str = "SEGMENT_ADJUSTED";
pub const CODE_SPLIT: &str = "SEGMENT_SPLIT";

/// Types of repairs that can be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairStrategy {
    /// Combine both segments into one
    Merge,
    /// Move the first segment's end back to the second's start
    Adjust,
    /// Carve the overlap out into its own segment
    Split,
    /// Overlap reported but left in place
    NoRepair,
}

/// Configuration for overlap repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Merge overlapping segments with matching speaker, style and language
    #[serde(default = "default_true")]
    pub merge_compatible: bool,

    /// Trim small overlaps
    #[serde(default = "default_true")]
    pub adjust_small_overlaps: bool,

    /// Split remaining overlaps
    #[serde(default = "default_true")]
    pub split_overlaps: bool,

    /// Overlap in seconds below which adjusting is preferred
    #[serde(default = "default_small_overlap_threshold")]
    pub small_overlap_threshold: f64,
}

fn default_true() -> bool {
    true
}

fn default_small_overlap_threshold() -> f64 {
    DEFAULT_SMALL_OVERLAP_THRESHOLD
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            merge_compatible: true,
            adjust_small_overlaps: true,
            split_overlaps: true,
            small_overlap_threshold: DEFAULT_SMALL_OVERLAP_THRESHOLD,
        }
    }
}

/// Result of resolving one overlapping pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRepair {
    /// The strategy used
    pub strategy: RepairStrategy,

    /// Segments replacing the pair, in order
    pub segments: Vec<Segment>,

    /// What was found and what was done
    pub issues: Vec<Issue>,
}

/// Result of repairing a whole document.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// The repaired copy
    pub document: Document,

    /// Issues for every overlap found and action taken
    pub issues: Vec<Issue>,

    /// Number of overlaps actually repaired
    pub repairs: usize,
}

/// Resolve the overlap between two consecutive segments, if there is one
pub fn resolve_overlap(first: &Segment, second: &Segment, config: &RepairConfig) -> Option<OverlapRepair> {
    OverlapRepairer::with_config(config.clone()).resolve(first, second)
}

/// Repair every overlap in a document
pub fn repair_overlaps(document: &Document, config: &RepairConfig) -> RepairOutcome {
    OverlapRepairer::with_config(config.clone()).repair_document(document)
}

/// Error-severity issues that overlap repair does not fix
pub fn unrepairable_errors(issues: &[Issue]) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| issue.is_error() && issue.error_code.as_deref() != Some(CODE_OVERLAP))
        .cloned()
        .collect()
}

/// Overlap repair engine.
pub struct OverlapRepairer {
    config: RepairConfig,
}

impl OverlapRepairer {
    /// Create a new repairer with default configuration
    pub fn new() -> Self {
        Self::with_config(RepairConfig::default())
    }

    /// Create a new repairer with custom configuration
    pub fn with_config(config: RepairConfig) -> Self {
        Self { config }
    }

    /// Resolve the overlap between two consecutive segments, if there is one
    pub fn resolve(&self, first: &Segment, second: &Segment) -> Option<OverlapRepair> {
        let (start1, end1) = first.timing()?;
        let (start2, end2) = second.timing()?;
        if first.is_zero_duration() || second.is_zero_duration() || start2 < start1 || start2 >= end1 {
            return None;
        }

        let overlap = Issue::warning(format!(
            "Segments overlap: {}-{} and {}-{}",
            start1, end1, start2, end2
        ))
        .code(CODE_OVERLAP)
        .spec_ref("#segment-ordering")
        .suggest("Review overlapping segments");

        if self.config.merge_compatible && can_merge(first, second) {
            let merged = merge_segments(first, second);
            return Some(OverlapRepair {
                strategy: RepairStrategy::Merge,
                segments: vec![merged],
                issues: vec![
                    overlap,
                    Issue::info("Merged overlapping segments with matching speaker, style and language")
                        .code(CODE_MERGED)
                        .suggest("Review merged segment for accuracy"),
                ],
            });
        }

        let amount = end1 - start2;
        if self.config.adjust_small_overlaps && amount < self.config.small_overlap_threshold {
            let adjusted = refit(first, start1, start2);
            return Some(OverlapRepair {
                strategy: RepairStrategy::Adjust,
                segments: vec![adjusted, second.clone()],
                issues: vec![
                    overlap,
                    Issue::info(format!(
                        "Adjusted end time of previous segment from {} to {} to remove a {:.3}s overlap",
                        end1, start2, amount
                    ))
                    .code(CODE_ADJUSTED),
                ],
            });
        }

        if self.config.split_overlaps {
            let overlap_end = end1.min(end2);
            let before = refit(first, start1, start2);
            let after = refit(second, overlap_end, end2);
            let middle = overlap_segment(first, second, start2, overlap_end);
            return Some(OverlapRepair {
                strategy: RepairStrategy::Split,
                segments: vec![before, middle, after],
                issues: vec![
                    overlap,
                    Issue::info(format!(
                        "Split overlapping segments into {}-{}, {}-{} and {}-{}",
                        start1, start2, start2, overlap_end, overlap_end, end2
                    ))
                    .code(CODE_SPLIT)
                    .suggest("Review split segments for accuracy"),
                ],
            });
        }

        Some(OverlapRepair {
            strategy: RepairStrategy::NoRepair,
            segments: vec![first.clone(), second.clone()],
            issues: vec![overlap],
        })
    }

    /// Validate `document` with `service`, then repair it when segment
    /// overlaps are its only errors.
    ///
    /// # Errors
    ///
    /// Returns the blocking issues when any other error is present.
    pub fn repair_checked(
        &self,
        document: &Document,
        service: &ValidationService,
    ) -> Result<RepairOutcome, ValidationError> {
        let blocking = unrepairable_errors(&service.validate(document));
        if !blocking.is_empty() {
            warn!("Refusing to repair a document with {} unrepairable errors", blocking.len());
            return Err(ValidationError::new(blocking));
        }
        Ok(self.repair_document(document))
    }

    /// Repair every overlap between consecutive timed segments
    pub fn repair_document(&self, document: &Document) -> RepairOutcome {
        let mut repaired = document.clone();
        let mut issues = Vec::new();
        let mut repairs = 0;

        if let Some(Field::Valid(transcript)) = repaired.transcript.as_mut() {
            if let Some(Field::Valid(segments)) = transcript.segments.as_mut() {
                let original = std::mem::take(segments);
                *segments = self.repair_segments(original, &mut issues, &mut repairs);
            }
        }

        if repairs > 0 {
            info!("Repaired {} overlapping segment pairs", repairs);
        } else {
            debug!("No overlaps repaired");
        }

        RepairOutcome {
            document: repaired,
            issues,
            repairs,
        }
    }

    fn repair_segments(
        &self,
        items: Vec<Field<Segment>>,
        issues: &mut Vec<Issue>,
        repairs: &mut usize,
    ) -> Vec<Field<Segment>> {
        let mut result: Vec<Field<Segment>> = Vec::with_capacity(items.len());
        let mut last_timed: Option<usize> = None;

        for (idx, item) in items.into_iter().enumerate() {
            let segment = match item {
                Field::Valid(segment) if segment.timing().is_some() => segment,
                other => {
                    result.push(other);
                    continue;
                }
            };

            let repair = match last_timed.and_then(|prev| result.get(prev)) {
                Some(Field::Valid(previous)) => self.resolve(previous, &segment),
                _ => None,
            };

            match (repair, last_timed) {
                (Some(repair), Some(prev)) => {
                    let location = format!("transcript.segments[{}]", idx);
                    issues.extend(repair.issues.into_iter().map(|issue| issue.at(location.as_str())));
                    if repair.strategy != RepairStrategy::NoRepair {
                        *repairs += 1;
                    }

                    let mut replacement = repair.segments.into_iter();
                    if let Some(head) = replacement.next() {
                        result[prev] = Field::Valid(head);
                    }
                    result.extend(replacement.map(Field::Valid));
                }
                _ => result.push(Field::Valid(segment)),
            }
            last_timed = Some(result.len() - 1);
        }

        result
    }
}

impl Default for OverlapRepairer {
    fn default() -> Self {
        Self::new()
    }
}

/// Same speaker, style and language (absent counts as a value)
pub fn can_merge(first: &Segment, second: &Segment) -> bool {
    first.speaker_id() == second.speaker_id()
        && first.style_id() == second.style_id()
        && first.language() == second.language()
}

fn join_text(first: &Segment, second: &Segment) -> String {
    [first.text(), second.text()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn min_confidence(first: &Segment, second: &Segment) -> Option<f64> {
    match (first.confidence(), second.confidence()) {
        (Some(a), Some(b)) => Some(a.min(b)),
        _ => None,
    }
}

fn merge_segments(first: &Segment, second: &Segment) -> Segment {
    let (start1, end1) = first.timing().unwrap_or_default();
    let (start2, end2) = second.timing().unwrap_or_default();

    let mut merged = first.clone();
    merged.text = Some(Field::Valid(join_text(first, second)));
    merged.start = Some(Field::Valid(TimeValue::new(start1.min(start2))));
    merged.end = Some(Field::Valid(TimeValue::new(end1.max(end2))));
    merged.is_zero_duration = None;
    merged.confidence = min_confidence(first, second).map(Field::Valid);

    let words = merge_words(first, second);
    if words.is_empty() {
        merged.words = None;
        merged.word_timing_mode = None;
    } else {
        merged.words = Some(Field::Valid(words.into_iter().map(Field::Valid).collect()));
        merged.word_timing_mode = Some(Field::Valid(WordTimingMode::Partial.to_string()));
    }
    merged
}

/// Words of both segments ordered by start; untimed words keep their place
/// after the timed word that preceded them
fn merge_words(first: &Segment, second: &Segment) -> Vec<Word> {
    let mut keyed: Vec<(f64, Word)> = Vec::new();
    for segment in [first, second] {
        let mut key = segment.timing().map(|(start, _)| start).unwrap_or_default();
        for (_, word) in segment.words() {
            if let Some((start, _)) = word.timing() {
                key = start;
            }
            keyed.push((key, word.clone()));
        }
    }
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, word)| word).collect()
}

/// Copy of `segment` moved to `[start, end]`, with words outside it dropped
fn refit(segment: &Segment, start: f64, end: f64) -> Segment {
    let mut fitted = segment.clone();
    fitted.start = Some(Field::Valid(TimeValue::new(start)));
    fitted.end = Some(Field::Valid(TimeValue::new(end)));

    if start == end {
        fitted.is_zero_duration = Some(Field::Valid(true));
        fitted.words = None;
        fitted.word_timing_mode = None;
        return fitted;
    }
    if fitted.is_zero_duration.is_present() {
        fitted.is_zero_duration = Some(Field::Valid(false));
    }

    if let Some(words) = fitted.words.take() {
        let kept: Vec<Field<Word>> = match words {
            Field::Valid(items) => items
                .into_iter()
                .filter(|item| match item.valid().and_then(Word::timing) {
                    Some((word_start, word_end)) => word_start >= start && word_end <= end,
                    None => true,
                })
                .collect(),
            malformed => {
                fitted.words = Some(malformed);
                return fitted;
            }
        };
        if kept.is_empty() {
            fitted.word_timing_mode = None;
        } else {
            fitted.words = Some(Field::Valid(kept));
        }
    }
    fitted
}

fn overlap_segment(first: &Segment, second: &Segment, start: f64, end: f64) -> Segment {
    let mut segment = Segment::new(&join_text(first, second)).with_times(start, end);
    if start == end {
        segment = segment.with_zero_duration(true);
    }
    segment.speaker_id = first.speaker_id.clone();
    segment.confidence = min_confidence(first, second).map(Field::Valid);
    segment
}
