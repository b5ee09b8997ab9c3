/*!
 * Validation issues.
 *
 * An `Issue` is a value, not an error: validators return lists of them and
 * the caller decides what to do. Locations are dotted paths with array
 * indices, e.g. `transcript.segments[2].words[0].start`.
 */

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// The document violates the format
    Error,
    /// The document is valid but likely not what was intended
    Warning,
    /// Informational note
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable description
    pub message: String,
    /// Dotted path to the offending field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub severity: Severity,
    /// Anchor into the STJ format documentation, e.g. `#segment-ordering`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_ref: Option<String>,
    /// Machine-readable code, set by overlap repair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            severity,
            spec_ref: None,
            error_code: None,
            suggestion: None,
        }
    }

    /// Create an error issue
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    /// Create a warning issue
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message)
    }

    /// Create an informational issue
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Info, message)
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn spec_ref(mut self, anchor: &str) -> Self {
        self.spec_ref = Some(anchor.to_string());
        self
    }

    pub fn code(mut self, code: &str) -> Self {
        self.error_code = Some(code.to_string());
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Dictionary form with every key present, absent values as `null`
    pub fn to_dict(&self) -> Value {
        serde_json::json!({
            "message": self.message,
            "location": self.location,
            "severity": self.severity,
            "spec_ref": self.spec_ref,
            "error_code": self.error_code,
            "suggestion": self.suggestion,
        })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
