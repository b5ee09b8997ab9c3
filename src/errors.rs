/*!
 * Error types for stjcheck.
 *
 * Validation findings are never errors: they are collected as `Issue`s.
 * The types here cover what stops a run from producing findings at all
 * (unreadable files, malformed JSON, bad configuration), plus a wrapper for
 * callers that want to turn a failed validation into an error value.
 */

use thiserror::Error;

use crate::validation::Issue;

/// Errors that can occur when loading or writing a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Error reading or writing the underlying file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not syntactically valid JSON
    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    Json {
        /// 1-based line of the syntax error
        line: usize,
        /// 1-based column of the syntax error
        column: usize,
        /// Parser message
        message: String,
    },

    /// Error serializing a document back to JSON
    #[error("Failed to encode document: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            return Self::Io(std::io::Error::other(error.to_string()));
        }
        Self::Json {
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        }
    }
}

/// A validation run that found at least one error-severity issue
#[derive(Error, Debug)]
#[error("Validation failed with {} error(s):\n{}", error_count(.issues), format_issues(.issues))]
pub struct ValidationError {
    /// Every issue found, not only the errors
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

fn error_count(issues: &[Issue]) -> usize {
    issues.iter().filter(|issue| issue.is_error()).count()
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors in user-supplied configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is outside its allowed range
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending setting
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading a document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Validation found errors
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Error in configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
