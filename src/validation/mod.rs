/*!
 * Validation of STJ documents.
 *
 * Each phase inspects the whole document and returns a list of issues;
 * nothing is thrown. The service runs them in a fixed order.
 *
 * # Architecture
 *
 * - `issue`: Issue and severity types
 * - `structure`: Root shape and version (structural, stop the run)
 * - `fields`: Required fields, JSON types, blank strings, unknown keys
 * - `timecodes`: Time formats, zero duration, ordering, overlap, word bounds
 * - `references`: Speaker and style ids and their references
 * - `styles`: Style text and display properties
 * - `metadata`: Timestamps, thresholds, source URI
 * - `confidence`: Segment and word confidence ranges
 * - `language`: Language codes and their consistency
 * - `word_timing`: Word timing modes
 * - `extensions`: Extension namespaces
 * - `service`: Orchestrates all validators
 */

pub mod confidence;
pub mod extensions;
pub mod fields;
pub mod issue;
pub mod language;
pub mod metadata;
pub mod references;
pub mod service;
pub mod structure;
pub mod styles;
pub mod timecodes;
pub mod word_timing;

// Re-export main types
pub use issue::{Issue, Severity};
pub use service::{
    ValidationConfig, ValidationPhase, ValidationReport, ValidationService, validate_document,
};
