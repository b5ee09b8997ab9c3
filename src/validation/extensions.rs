/*!
 * Extension namespace validation.
 *
 * Extensions are maps from namespace to object. A namespace object may
 * itself hold an `extensions` map, so the check is recursive; reusing a
 * namespace that is already on the current path is reported as a cycle
 * and not descended into.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, Extensions, Field, FieldSlot};

use super::issue::Issue;
use super::service::ValidationPhase;

/// Namespaces reserved for the format itself and sibling subtitle formats
pub const RESERVED_NAMESPACES: &[&str] = &["stj", "webvtt", "ttml", "ssa", "srt", "dfxp", "smptett"];

static NAMESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9\-]+$").expect("Invalid namespace regex"));

/// Validate an extensions map found at `location`
///
/// `ancestors` is the chain of namespaces that led here, outermost first.
pub fn validate_extensions(extensions: &Extensions, location: &str, ancestors: &[&str]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (namespace, value) in extensions {
        let namespace_location = format!("{}.{}", location, namespace);
        let issue = |message: String| Issue::error(message).at(namespace_location.as_str()).spec_ref("#extensions");

        if ancestors.contains(&namespace.as_str()) {
            let mut path = ancestors.to_vec();
            path.push(namespace);
            issues.push(issue(format!(
                "Circular reference detected in extensions: {}",
                path.join(" -> ")
            )));
            continue;
        }

        if namespace.is_empty() {
            issues.push(issue("Invalid extension namespace ''. Namespaces must be non-empty strings.".to_string()));
        } else if !NAMESPACE_REGEX.is_match(namespace) {
            issues.push(issue(format!(
                "Invalid extension namespace '{}'. Namespaces must contain only lowercase letters, digits, or hyphens.",
                namespace
            )));
        }

        if RESERVED_NAMESPACES.contains(&namespace.as_str()) {
            issues.push(issue(format!("Reserved namespace '{}' cannot be used", namespace)));
        }

        let Some(object) = value.as_object() else {
            issues.push(issue(format!("Extension value for namespace '{}' must be an object", namespace)));
            continue;
        };

        if let Some(nested) = object.get("extensions") {
            let nested_location = format!("{}.extensions", namespace_location);
            match nested.as_object() {
                Some(nested) => {
                    let mut path = ancestors.to_vec();
                    path.push(namespace);
                    issues.extend(validate_extensions(nested, &nested_location, &path));
                }
                None => issues.push(
                    Issue::error(format!("Nested extensions in namespace '{}' must be an object", namespace))
                        .at(nested_location)
                        .spec_ref("#extensions"),
                ),
            }
        }
    }

    issues
}

/// Checks every extensions map in the document
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionValidator;

impl ExtensionValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for ExtensionValidator {
    fn name(&self) -> &'static str {
        "extensions"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut check = |slot: &Option<Field<Extensions>>, location: String| {
            if let Some(extensions) = slot.value() {
                issues.extend(validate_extensions(extensions, &location, &[]));
            }
        };

        if let Some(metadata) = document.metadata() {
            check(&metadata.extensions, "metadata.extensions".to_string());
            if let Some(source) = metadata.source() {
                check(&source.extensions, "metadata.source.extensions".to_string());
            }
        }

        if let Some(transcript) = document.transcript() {
            for (idx, speaker) in transcript.speakers() {
                check(&speaker.extensions, format!("transcript.speakers[{}].extensions", idx));
            }
            for (idx, style) in transcript.styles() {
                check(&style.extensions, format!("transcript.styles[{}].extensions", idx));
            }
            for (idx, segment) in transcript.segments() {
                check(&segment.extensions, format!("transcript.segments[{}].extensions", idx));
                for (word_idx, word) in segment.words() {
                    check(
                        &word.extensions,
                        format!("transcript.segments[{}].words[{}].extensions", idx, word_idx),
                    );
                }
            }
        }

        issues
    }
}
