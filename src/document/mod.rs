/*!
 * STJ document handling.
 *
 * - `model`: the in-memory document, with malformed fields kept as markers
 * - `decode`: JSON value to document, never failing on shape problems
 * - `encode`: document back to JSON
 *
 * Only syntactically invalid JSON or unreadable files produce an error here;
 * everything else is left for the validators.
 */

pub mod decode;
pub mod encode;
pub mod model;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::errors::DocumentError;

pub use model::{
    Document, Extensions, Field, FieldSlot, Metadata, RootShape, Segment, Source, Speaker, Style,
    TimeValue, Timestamp, Transcriber, Transcript, ValueKind, Word, WordTimingMode,
};

impl Document {
    /// Parse a document from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(decode::from_value(&value))
    }

    /// Parse a document from any reader producing JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_reader(reader)?;
        Ok(decode::from_value(&value))
    }

    /// Load a document from a file on disk
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        debug!("Loading document from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Encode the document as JSON
    pub fn to_value(&self) -> Value {
        encode::to_value(self)
    }

    /// Encode the document as pretty-printed JSON text
    pub fn to_json_string_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.to_value())
            .map_err(|e| DocumentError::Encode(e.to_string()))
    }

    /// Write the document as pretty-printed JSON to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_value())
            .map_err(|e| DocumentError::Encode(e.to_string()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!("Wrote document to {}", path.display());
        Ok(())
    }
}
