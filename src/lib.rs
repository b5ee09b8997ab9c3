/*!
 * # stjcheck - Standard Transcription JSON validator
 *
 * A Rust library for checking STJ transcript documents against the format.
 *
 * ## Features
 *
 * - Load STJ documents, keeping malformed fields for precise diagnostics
 * - Validate in phases, collecting every issue instead of stopping at the first:
 *   - Root structure and version
 *   - Field presence and JSON types
 *   - Time formats, zero-duration rules, ordering and overlap
 *   - Speaker and style identifiers and references
 *   - ISO 639-1 / ISO 639-3 language codes and their consistency
 *   - Word timing modes
 *   - Extension namespaces
 *   - Metadata, styles and confidence ranges
 * - Opt-in repair of overlapping segments
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `document`: Document model, JSON decoding and encoding
 * - `validation`: Validation phases and the service that runs them
 * - `repair`: Overlap repair
 * - `language_utils`: ISO language code utilities
 * - `file_utils`: Input discovery and output guards
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## Example
 *
 * ```
 * use stjcheck::{Document, ValidationService};
 *
 * let document = Document::from_json_str(
 *     r#"{"stj": {"version": "0.6.0", "transcript": {"segments": [{"text": "Hi", "start": 0.0, "end": 1.0}]}}}"#,
 * ).unwrap();
 * let report = ValidationService::new().validate_report(&document);
 * assert!(report.is_valid());
 * ```
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod repair;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use document::Document;
pub use errors::{AppError, ConfigError, DocumentError, ValidationError};
pub use language_utils::{get_language_name, language_codes_match, preferred_code};
pub use repair::{RepairConfig, repair_overlaps, resolve_overlap, unrepairable_errors};
pub use validation::{Issue, Severity, ValidationConfig, ValidationReport, ValidationService, validate_document};
