use crate::document::Document;

use super::issue::Issue;
use super::service::ValidationPhase;

/// Whether a confidence score lies in `[0, 1]`
pub fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Checks segment and word confidence scores
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfidenceValidator;

impl ConfidenceValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for ConfidenceValidator {
    fn name(&self) -> &'static str {
        "confidence"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(transcript) = document.transcript() else {
            return issues;
        };

        for (idx, segment) in transcript.segments() {
            let location = format!("transcript.segments[{}]", idx);
            if let Some(confidence) = segment.confidence().filter(|c| !in_unit_range(*c)) {
                issues.push(
                    Issue::error(format!("Segment confidence {} out of range [0.0, 1.0]", confidence))
                        .at(format!("{}.confidence", location))
                        .spec_ref("#confidence"),
                );
            }

            for (word_idx, word) in segment.words() {
                if let Some(confidence) = word.confidence.as_ref().and_then(|c| c.valid()).copied() {
                    if !in_unit_range(confidence) {
                        issues.push(
                            Issue::error(format!("Word confidence {} out of range [0.0, 1.0]", confidence))
                                .at(format!("{}.words[{}].confidence", location, word_idx))
                                .spec_ref("#confidence"),
                        );
                    }
                }
            }
        }

        issues
    }
}
