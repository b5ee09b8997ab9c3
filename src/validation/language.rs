/*!
 * Language code validation.
 *
 * Each code used in the document (metadata languages, source languages and
 * segment languages) must be a known ISO 639-1 code, or an ISO 639-3 code
 * for a language that has no 639-1 code. Across the document, a language
 * must always be written with the same code.
 */

use std::collections::BTreeMap;

use isolang::Language;

use crate::document::{Document, Field, FieldSlot};
use crate::language_utils::{language_identity, part1_equivalent, validate_language_code};

use super::issue::Issue;
use super::service::ValidationPhase;

/// Validate a single language code
pub fn validate_code(code: &str, location: &str) -> Vec<Issue> {
    let trimmed = code.trim();
    let issue = |message: String| Issue::error(message).at(location).spec_ref("#language-codes");

    if trimmed.is_empty() {
        return vec![issue("Language code must be a non-empty string.".to_string())];
    }

    match trimmed.chars().count() {
        2 if validate_language_code(trimmed).is_err() => {
            vec![issue(format!("Invalid ISO 639-1 language code '{}'.", trimmed))]
        }
        3 if validate_language_code(trimmed).is_err() => {
            vec![issue(format!("Invalid ISO 639-3 language code '{}'.", trimmed))]
        }
        3 => match part1_equivalent(trimmed) {
            Some(part1) => vec![issue(format!(
                "Must use ISO 639-1 code '{}' instead of ISO 639-3 code '{}'.",
                part1, trimmed
            ))],
            None => Vec::new(),
        },
        2 => Vec::new(),
        _ => vec![issue(format!(
            "Invalid language code '{}'. Language codes must be 2-letter (ISO 639-1) or 3-letter (ISO 639-3) codes.",
            trimmed
        ))],
    }
}

/// Every language code in the document with its location, in traversal order
pub fn collect_language_codes(document: &Document) -> Vec<(String, String)> {
    fn push_list(
        codes: &mut Vec<(String, String)>,
        slot: &Option<Field<Vec<Field<String>>>>,
        location: &str,
    ) {
        let Some(items) = slot.value() else { return };
        for (idx, item) in items.iter().enumerate() {
            if let Some(code) = item.valid() {
                codes.push((code.clone(), format!("{}[{}]", location, idx)));
            }
        }
    }

    let mut codes = Vec::new();
    if let Some(metadata) = document.metadata() {
        push_list(&mut codes, &metadata.languages, "metadata.languages");
        if let Some(source) = metadata.source() {
            push_list(&mut codes, &source.languages, "metadata.source.languages");
        }
    }
    if let Some(transcript) = document.transcript() {
        for (idx, segment) in transcript.segments() {
            if let Some(language) = segment.language() {
                codes.push((language.to_string(), format!("transcript.segments[{}].language", idx)));
            }
        }
    }
    codes
}

/// Report languages written with more than one distinct code
pub fn validate_consistency(codes: &[(String, String)]) -> Vec<Issue> {
    struct Usage<'a> {
        codes: Vec<&'a str>,
        locations: Vec<&'a str>,
    }

    let mut by_language: BTreeMap<&'static str, (Language, Usage<'_>)> = BTreeMap::new();
    for (code, location) in codes {
        let trimmed = code.trim();
        let Some(language) = language_identity(trimmed) else {
            continue;
        };
        let (_, usage) = by_language.entry(language.to_639_3()).or_insert_with(|| {
            (
                language,
                Usage {
                    codes: Vec::new(),
                    locations: Vec::new(),
                },
            )
        });
        if !usage.codes.contains(&trimmed) {
            usage.codes.push(trimmed);
        }
        usage.locations.push(location);
    }

    by_language
        .into_values()
        .filter(|(_, usage)| usage.codes.len() > 1)
        .map(|(language, mut usage)| {
            usage.codes.sort_unstable();
            Issue::error(format!(
                "Inconsistent language codes used for {}: {}. Must use consistent codes throughout the file.",
                language.to_name(),
                usage.codes.join(", ")
            ))
            .at(usage.locations.join(", "))
            .spec_ref("#language-codes")
        })
        .collect()
}

/// Checks every language code and their consistency
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageValidator;

impl LanguageValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for LanguageValidator {
    fn name(&self) -> &'static str {
        "language"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let codes = collect_language_codes(document);

        // Blank codes are already reported as blank strings by the field validator
        let mut issues: Vec<Issue> = codes
            .iter()
            .filter(|(code, _)| !code.trim().is_empty())
            .flat_map(|(code, location)| validate_code(code, location))
            .collect();

        issues.extend(validate_consistency(&codes));
        issues
    }
}
