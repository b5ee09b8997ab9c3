/*!
 * Validation service that orchestrates all validators.
 *
 * The root and version phases run first; if either reports anything the
 * run stops there. Every other phase always runs, and their issues are
 * concatenated in phase order.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::Document;

use super::confidence::ConfidenceValidator;
use super::extensions::ExtensionValidator;
use super::fields::FieldValidator;
use super::issue::{Issue, Severity};
use super::language::LanguageValidator;
use super::metadata::MetadataValidator;
use super::references::ReferenceValidator;
use super::structure::{RootValidator, VersionValidator};
use super::styles::StyleValidator;
use super::timecodes::{TimecodeValidator, TimecodeValidatorConfig};
use super::word_timing::WordTimingValidator;

/// A single validation phase
pub trait ValidationPhase: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Inspect the document and report what is wrong with it
    fn validate(&self, document: &Document) -> Vec<Issue>;
}

/// Configuration for the validation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Whether to validate metadata values and the source URI
    #[serde(default = "default_true")]
    pub metadata_validation: bool,

    /// Whether to validate style definitions
    #[serde(default = "default_true")]
    pub style_validation: bool,

    /// Whether to validate language codes
    #[serde(default = "default_true")]
    pub language_validation: bool,

    /// Whether to validate word timing modes
    #[serde(default = "default_true")]
    pub word_timing_validation: bool,

    /// Whether to validate extension namespaces
    #[serde(default = "default_true")]
    pub extension_validation: bool,

    /// Whether to check word bounds and word overlap inside segments
    #[serde(default = "default_true")]
    pub word_timecode_validation: bool,

    /// Whether to warn when segment text and word texts disagree
    #[serde(default = "default_true")]
    pub text_consistency_check: bool,

    /// Base URI for resolving relative source URIs
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Treat warnings as failures
    #[serde(default)]
    pub strict: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            metadata_validation: true,
            style_validation: true,
            language_validation: true,
            word_timing_validation: true,
            extension_validation: true,
            word_timecode_validation: true,
            text_consistency_check: true,
            base_uri: None,
            strict: false,
        }
    }
}

/// Complete validation report for a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Every issue, in phase order
    pub issues: Vec<Issue>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl ValidationReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        let count = |severity| issues.iter().filter(|i| i.severity == severity).count();
        let (error_count, warning_count, info_count) =
            (count(Severity::Error), count(Severity::Warning), count(Severity::Info));
        Self {
            issues,
            error_count,
            warning_count,
            info_count,
        }
    }

    /// No error-severity issues
    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }

    /// No issues of any severity
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Valid, and in strict mode also free of warnings
    pub fn passes(&self, strict: bool) -> bool {
        self.is_valid() && (!strict || self.warning_count == 0)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "Validation: {} errors, {} warnings, {} info",
            self.error_count, self.warning_count, self.info_count
        )
    }
}

/// Validation service for STJ documents
pub struct ValidationService {
    config: ValidationConfig,
    structural: Vec<Box<dyn ValidationPhase>>,
    phases: Vec<Box<dyn ValidationPhase>>,
}

impl ValidationService {
    /// Create a new validation service with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a new validation service with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        let structural: Vec<Box<dyn ValidationPhase>> =
            vec![Box::new(RootValidator::new()), Box::new(VersionValidator::new())];

        let timecode_config = TimecodeValidatorConfig {
            check_words: config.word_timecode_validation,
        };

        let mut phases: Vec<Box<dyn ValidationPhase>> = vec![
            Box::new(FieldValidator::new()),
            Box::new(TimecodeValidator::with_config(timecode_config)),
            Box::new(ReferenceValidator::new()),
        ];
        if config.style_validation {
            phases.push(Box::new(StyleValidator::new()));
        }
        if config.metadata_validation {
            phases.push(Box::new(MetadataValidator::with_base_uri(config.base_uri.clone())));
        }
        phases.push(Box::new(ConfidenceValidator::new()));
        if config.language_validation {
            phases.push(Box::new(LanguageValidator::new()));
        }
        if config.word_timing_validation {
            phases.push(Box::new(WordTimingValidator::with_text_consistency(
                config.text_consistency_check,
            )));
        }
        if config.extension_validation {
            phases.push(Box::new(ExtensionValidator::new()));
        }

        Self {
            config,
            structural,
            phases,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Names of the phases in the order they run
    pub fn phase_names(&self) -> Vec<&'static str> {
        self.structural
            .iter()
            .chain(self.phases.iter())
            .map(|phase| phase.name())
            .collect()
    }

    /// Run every phase and return all issues
    pub fn validate(&self, document: &Document) -> Vec<Issue> {
        for phase in &self.structural {
            let issues = phase.validate(document);
            if !issues.is_empty() {
                debug!(
                    "Structural phase '{}' failed with {} issues, skipping remaining phases",
                    phase.name(),
                    issues.len()
                );
                return issues;
            }
        }

        let mut issues = Vec::new();
        for phase in &self.phases {
            let found = phase.validate(document);
            debug!("Phase '{}' found {} issues", phase.name(), found.len());
            issues.extend(found);
        }
        issues
    }

    /// Run every phase and summarize the result
    pub fn validate_report(&self, document: &Document) -> ValidationReport {
        let report = ValidationReport::new(self.validate(document));
        debug!("{}", report.summary());
        report
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a document with the default configuration
pub fn validate_document(document: &Document) -> Vec<Issue> {
    ValidationService::new().validate(document)
}
