/*!
 * Metadata value validation: timestamps, ranges and the source URI.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::document::{Document, FieldSlot, Timestamp};

use super::issue::Issue;
use super::service::ValidationPhase;

/// Schemes accepted without comment
pub const RECOMMENDED_SCHEMES: &[&str] = &["http", "https", "file"];

static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("Invalid scheme regex"));

static INVALID_URI_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\-.~:/?#\[\]@!$&'()*+,;=%]").expect("Invalid URI character regex")
});

/// Validate a source URI, resolving relative references against `base_uri`
pub fn validate_uri(uri: &str, location: &str, base_uri: Option<&str>) -> Vec<Issue> {
    let mut issues = validate_uri_structure(uri, location, base_uri);
    if INVALID_URI_CHARS.is_match(uri) {
        issues.push(
            Issue::error(format!("URI '{}' contains characters not allowed in URIs.", uri))
                .at(location)
                .spec_ref("#source"),
        );
    }
    issues
}

/// Scheme, resolution and scheme-specific checks
fn validate_uri_structure(uri: &str, location: &str, base_uri: Option<&str>) -> Vec<Issue> {
    let mut issues = Vec::new();
    let issue = |issue: Issue| issue.at(location).spec_ref("#source");

    let resolved = if SCHEME_REGEX.is_match(uri) {
        uri.to_string()
    } else if let Some(base) = base_uri {
        issues.push(issue(Issue::warning(format!(
            "Relative URI '{}' resolved against base URI '{}'",
            uri, base
        ))));
        match Url::parse(base).and_then(|base| base.join(uri)) {
            Ok(joined) => joined.to_string(),
            Err(e) => {
                issues.push(issue(Issue::error(format!("Failed to resolve relative URI '{}': {}", uri, e))));
                return issues;
            }
        }
    } else {
        issues.push(issue(Issue::error(format!("URI '{}' must include a scheme.", uri))));
        return issues;
    };

    let Some(scheme) = SCHEME_REGEX
        .captures(&resolved)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
    else {
        return issues;
    };
    let rest = &resolved[scheme.len() + 1..];

    match scheme.as_str() {
        "http" | "https" => {
            let has_host = Url::parse(&resolved)
                .ok()
                .and_then(|url| url.host_str().map(|host| !host.is_empty()))
                .unwrap_or(false);
            if !has_host {
                issues.push(issue(Issue::error(format!(
                    "{} URI '{}' must include a network location.",
                    scheme.to_uppercase(),
                    uri
                ))));
            }
        }
        "file" => {
            let path = match rest.strip_prefix("//") {
                Some(after_authority) => after_authority.find('/').map(|i| &after_authority[i..]).unwrap_or(""),
                None => rest,
            };
            if path.is_empty() {
                issues.push(issue(Issue::error(format!("File URI '{}' must include a path.", uri))));
            }
        }
        other => {
            issues.push(issue(Issue::info(format!(
                "URI scheme '{}' is not one of the recommended schemes ({}).",
                other,
                RECOMMENDED_SCHEMES.join(", ")
            ))));
        }
    }

    issues
}

/// Checks metadata values
pub struct MetadataValidator {
    base_uri: Option<String>,
}

impl MetadataValidator {
    pub fn new() -> Self {
        Self { base_uri: None }
    }

    /// Resolve relative source URIs against `base_uri`
    pub fn with_base_uri(base_uri: Option<String>) -> Self {
        Self { base_uri }
    }
}

impl Default for MetadataValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationPhase for MetadataValidator {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(metadata) = document.metadata() else {
            return issues;
        };

        match metadata.created_at.value() {
            Some(Timestamp::Naive(_)) => issues.push(
                Issue::error("'created_at' must include a UTC offset (e.g. 'Z' or '+02:00').")
                    .at("metadata.created_at")
                    .spec_ref("#metadata"),
            ),
            Some(Timestamp::Unparsable(raw)) => issues.push(
                Issue::error(format!(
                    "Invalid 'created_at' format '{}'. Must be a valid ISO 8601 timestamp.",
                    raw
                ))
                .at("metadata.created_at")
                .spec_ref("#metadata"),
            ),
            _ => {}
        }

        if let Some(threshold) = metadata.confidence_threshold.value() {
            if !(0.0..=1.0).contains(threshold) {
                issues.push(
                    Issue::error(format!(
                        "'confidence_threshold' {} out of range [0.0, 1.0]",
                        threshold
                    ))
                    .at("metadata.confidence_threshold")
                    .spec_ref("#metadata"),
                );
            }
        }

        if let Some(source) = metadata.source() {
            if let Some(uri) = source.uri.value().filter(|uri| !uri.trim().is_empty()) {
                issues.extend(validate_uri(uri, "metadata.source.uri", self.base_uri.as_deref()));
            }
            if let Some(duration) = source.duration.value() {
                if !duration.is_finite() || *duration < 0.0 {
                    issues.push(
                        Issue::error(format!("'source.duration' must be a non-negative number, got {}", duration))
                            .at("metadata.source.duration")
                            .spec_ref("#source"),
                    );
                }
            }
        }

        issues
    }
}
