/*!
 * Speaker and style identifiers.
 *
 * Declared ids must be well-formed and unique; ids referenced from segments
 * must be declared.
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;

use super::issue::Issue;
use super::service::ValidationPhase;

static ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid id regex"));

/// Whether an id is 1 to 64 letters, digits, underscores or hyphens
pub fn is_valid_id(id: &str) -> bool {
    ID_REGEX.is_match(id)
}

fn format_issue(kind: &str, id: &str, location: String, anchor: &str) -> Issue {
    Issue::error(format!(
        "Invalid '{}' format '{}'. Must be 1 to 64 characters long, containing only letters, digits, underscores, or hyphens.",
        kind, id
    ))
    .at(location)
    .spec_ref(anchor)
}

/// Declares and resolves speaker and style ids
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceValidator;

impl ReferenceValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for ReferenceValidator {
    fn name(&self) -> &'static str {
        "references"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(transcript) = document.transcript() else {
            return issues;
        };

        let mut speaker_ids = HashSet::new();
        for (idx, speaker) in transcript.speakers() {
            let Some(id) = speaker.id() else { continue };
            let location = format!("transcript.speakers[{}].id", idx);
            if !is_valid_id(id) {
                issues.push(format_issue("speaker_id", id, location.clone(), "#speakers"));
            }
            if !speaker_ids.insert(id) {
                issues.push(
                    Issue::error(format!("Duplicate speaker ID: {}", id))
                        .at(location)
                        .spec_ref("#speakers"),
                );
            }
        }

        let mut style_ids = HashSet::new();
        for (idx, style) in transcript.styles() {
            let Some(id) = style.id() else { continue };
            let location = format!("transcript.styles[{}].id", idx);
            if !is_valid_id(id) {
                issues.push(format_issue("style_id", id, location.clone(), "#styles"));
            }
            if !style_ids.insert(id) {
                issues.push(
                    Issue::error(format!("Duplicate style ID: {}", id))
                        .at(location)
                        .spec_ref("#styles"),
                );
            }
        }

        for (idx, segment) in transcript.segments() {
            if let Some(speaker_id) = segment.speaker_id() {
                let location = format!("transcript.segments[{}].speaker_id", idx);
                if !is_valid_id(speaker_id) {
                    issues.push(format_issue("speaker_id", speaker_id, location.clone(), "#speakers"));
                }
                if !speaker_ids.contains(speaker_id) {
                    issues.push(
                        Issue::error(format!("Invalid speaker_id reference: {}", speaker_id))
                            .at(location)
                            .spec_ref("#speakers"),
                    );
                }
            }

            if let Some(style_id) = segment.style_id() {
                let location = format!("transcript.segments[{}].style_id", idx);
                if !is_valid_id(style_id) {
                    issues.push(format_issue("style_id", style_id, location.clone(), "#styles"));
                }
                if !style_ids.contains(style_id) {
                    issues.push(
                        Issue::error(format!("Invalid style_id reference: {}", style_id))
                            .at(location)
                            .spec_ref("#styles"),
                    );
                }
            }
        }

        issues
    }
}
