/*!
 * Root shape and version validation.
 *
 * These are the structural checks: if either reports anything, the rest of
 * the pipeline is skipped because later phases have nothing meaningful to
 * look at.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, Field, RootShape};

use super::issue::Issue;
use super::service::ValidationPhase;

/// Supported major version
pub const SUPPORTED_MAJOR: u64 = 0;

/// Supported minor version
pub const SUPPORTED_MINOR: u64 = 6;

static SEMVER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("Invalid semver regex"));

/// Checks that the input is `{"stj": {...}}` with no unknown root keys
#[derive(Debug, Default, Clone, Copy)]
pub struct RootValidator;

impl RootValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for RootValidator {
    fn name(&self) -> &'static str {
        "root"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        match document.shape {
            RootShape::NotAnObject(kind) => {
                return vec![
                    Issue::error(format!("STJ data must be a JSON object, got {}", kind))
                        .spec_ref("#stj-root-structure"),
                ];
            }
            RootShape::MissingRootKey => {
                return vec![
                    Issue::error("STJ data must contain a 'stj' root object")
                        .spec_ref("#stj-root-structure"),
                ];
            }
            RootShape::InvalidRoot(kind) => {
                return vec![
                    Issue::error(format!("'stj' root must be an object, got {}", kind))
                        .at("stj")
                        .spec_ref("#stj-root-structure"),
                ];
            }
            RootShape::Wrapped => {}
        }

        if document.extra_fields.is_empty() {
            return Vec::new();
        }
        vec![
            Issue::error(format!(
                "Unexpected fields in stj: {}",
                document.extra_fields.join(", ")
            ))
            .at("stj")
            .spec_ref("#stj-root-structure"),
        ]
    }
}

/// Checks `stj.version` is a supported `MAJOR.MINOR.PATCH`
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionValidator;

impl VersionValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for VersionValidator {
    fn name(&self) -> &'static str {
        "version"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        validate_version(document.version.as_ref())
    }
}

/// Validate a version field
pub fn validate_version(version: Option<&Field<String>>) -> Vec<Issue> {
    let version = match version.and_then(Field::valid) {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            return vec![
                Issue::error("Missing or invalid 'stj.version'. It must be a non-empty string.")
                    .at("stj.version")
                    .spec_ref("#versioning"),
            ];
        }
    };

    if !SEMVER_REGEX.is_match(version) {
        return vec![
            Issue::error(format!(
                "Invalid 'stj.version' format: '{}'. Must follow semantic versioning 'MAJOR.MINOR.PATCH' (e.g., '0.6.0').",
                version
            ))
            .at("stj.version")
            .spec_ref("#versioning"),
        ];
    }

    let parts: Vec<Option<u64>> = version.split('.').map(|p| p.parse::<u64>().ok()).collect();
    let (Some(major), Some(minor)) = (parts[0], parts[1]) else {
        return vec![
            Issue::error(format!("Version components must be integers: {}.", version))
                .at("stj.version")
                .spec_ref("#versioning"),
        ];
    };

    if major != SUPPORTED_MAJOR || minor != SUPPORTED_MINOR {
        return vec![
            Issue::error(format!(
                "Incompatible version: {}. Supported major.minor version is '{}.{}.x'.",
                version, SUPPORTED_MAJOR, SUPPORTED_MINOR
            ))
            .at("stj.version")
            .spec_ref("#versioning"),
        ];
    }

    Vec::new()
}
