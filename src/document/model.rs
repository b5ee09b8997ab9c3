/*!
 * Document model for STJ transcripts.
 *
 * Every field is held as `Option<Field<T>>`: `None` when the key is absent
 * (or JSON `null`), `Field::Valid` when it decoded to the expected shape and
 * `Field::Malformed` when it did not. Keeping malformed values lets the
 * validators report a located diagnostic instead of the decoder failing.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Key wrapping the document body
pub const ROOT_KEY: &str = "stj";

/// Known keys per record type, used to detect unexpected fields
pub const ROOT_FIELDS: &[&str] = &["version", "metadata", "transcript"];
pub const METADATA_FIELDS: &[&str] = &[
    "transcriber",
    "created_at",
    "source",
    "languages",
    "confidence_threshold",
    "extensions",
];
pub const TRANSCRIBER_FIELDS: &[&str] = &["name", "version"];
pub const SOURCE_FIELDS: &[&str] = &["uri", "duration", "languages", "extensions"];
pub const TRANSCRIPT_FIELDS: &[&str] = &["segments", "speakers", "styles"];
pub const SEGMENT_FIELDS: &[&str] = &[
    "text",
    "start",
    "end",
    "is_zero_duration",
    "speaker_id",
    "style_id",
    "confidence",
    "language",
    "word_timing_mode",
    "words",
    "extensions",
];
pub const WORD_FIELDS: &[&str] = &[
    "text",
    "start",
    "end",
    "is_zero_duration",
    "confidence",
    "extensions",
];
pub const SPEAKER_FIELDS: &[&str] = &["id", "name", "extensions"];
pub const STYLE_FIELDS: &[&str] = &["id", "text", "display", "extensions"];

/// Namespace map attached to most records
pub type Extensions = Map<String, Value>;

/// JSON type actually found where another was expected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded field: either the expected shape or a marker of what was found
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Valid(T),
    Malformed(ValueKind),
}

impl<T> Field<T> {
    /// The value, if it decoded to the expected shape
    pub fn valid(&self) -> Option<&T> {
        match self {
            Field::Valid(value) => Some(value),
            Field::Malformed(_) => None,
        }
    }

    /// The JSON type found, if the field is malformed
    pub fn malformed(&self) -> Option<ValueKind> {
        match self {
            Field::Valid(_) => None,
            Field::Malformed(kind) => Some(*kind),
        }
    }

    pub fn into_valid(self) -> Option<T> {
        match self {
            Field::Valid(value) => Some(value),
            Field::Malformed(_) => None,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Valid(value)
    }
}

/// Accessors for optional field slots
pub trait FieldSlot<T> {
    /// The value when present and well-formed
    fn value(&self) -> Option<&T>;

    /// Whether the key was present at all (well-formed or not)
    fn is_present(&self) -> bool;
}

impl<T> FieldSlot<T> for Option<Field<T>> {
    fn value(&self) -> Option<&T> {
        self.as_ref().and_then(Field::valid)
    }

    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// Shorthand for a present, well-formed field
pub fn valid<T>(value: T) -> Option<Field<T>> {
    Some(Field::Valid(value))
}

/// A time value in seconds, keeping the literal text it was written as
#[derive(Debug, Clone, PartialEq)]
pub struct TimeValue {
    value: f64,
    literal: String,
}

impl TimeValue {
    /// Create a time value from seconds; the literal is the shortest decimal form
    pub fn new(value: f64) -> Self {
        Self {
            value,
            literal: value.to_string(),
        }
    }

    /// Parse a numeric literal as written in the source document
    pub fn from_literal(literal: &str) -> Option<Self> {
        let trimmed = literal.trim();
        let value = trimmed.parse::<f64>().ok()?;
        Some(Self {
            value,
            literal: trimmed.to_string(),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl From<f64> for TimeValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)
    }
}

/// Creation timestamp as found in metadata
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    /// ISO 8601 timestamp carrying a UTC offset
    WithOffset(DateTime<FixedOffset>),
    /// Parseable timestamp without an offset
    Naive(NaiveDateTime),
    /// Text that is not an ISO 8601 timestamp
    Unparsable(String),
}

impl Timestamp {
    /// Parse an ISO 8601 string, preserving failures
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::WithOffset(dt);
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%:z") {
            return Self::WithOffset(dt);
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Self::Naive(naive);
            }
        }
        if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Self::Naive(midnight);
        }
        Self::Unparsable(raw.to_string())
    }

    /// Render back to ISO 8601, using `Z` for UTC
    pub fn to_iso_string(&self) -> String {
        match self {
            Self::WithOffset(dt) => {
                if dt.offset().local_minus_utc() == 0 {
                    dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.fZ").to_string()
                } else {
                    dt.to_rfc3339()
                }
            }
            Self::Naive(naive) => naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Self::Unparsable(raw) => raw.clone(),
        }
    }
}

/// Word timing completeness declared on a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordTimingMode {
    Complete,
    Partial,
    None,
}

impl WordTimingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::None => "none",
        }
    }
}

impl fmt::Display for WordTimingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WordTimingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(Self::Complete),
            "partial" => Ok(Self::Partial),
            "none" => Ok(Self::None),
            _ => Err(anyhow!("Invalid word timing mode: {}", s)),
        }
    }
}

/// Shape of the top-level input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootShape {
    /// `{"stj": {...}}`
    #[default]
    Wrapped,
    /// The input is not a JSON object
    NotAnObject(ValueKind),
    /// The input object has no `stj` key
    MissingRootKey,
    /// The `stj` value is not an object
    InvalidRoot(ValueKind),
}

/// The whole parsed transcript document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub shape: RootShape,
    pub version: Option<Field<String>>,
    pub metadata: Option<Field<Metadata>>,
    pub transcript: Option<Field<Transcript>>,
    /// Unknown keys under `stj`, sorted
    pub extra_fields: Vec<String>,
}

impl Document {
    pub fn new(version: &str, transcript: Transcript) -> Self {
        Self {
            shape: RootShape::Wrapped,
            version: valid(version.to_string()),
            metadata: None,
            transcript: valid(transcript),
            extra_fields: Vec::new(),
        }
    }

    /// Document whose top-level input could not be unwrapped
    pub fn with_shape(shape: RootShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = valid(metadata);
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.value().map(String::as_str)
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.value()
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.value()
    }
}

/// Information about the transcription system
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcriber {
    pub name: Option<Field<String>>,
    pub version: Option<Field<String>>,
    pub extra_fields: Vec<String>,
}

impl Transcriber {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: valid(name.to_string()),
            version: valid(version.to_string()),
            extra_fields: Vec::new(),
        }
    }
}

/// Source media description
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Source {
    pub uri: Option<Field<String>>,
    pub duration: Option<Field<f64>>,
    pub languages: Option<Field<Vec<Field<String>>>>,
    pub extensions: Option<Field<Extensions>>,
    pub extra_fields: Vec<String>,
}

impl Source {
    pub fn with_uri(mut self, uri: &str) -> Self {
        self.uri = valid(uri.to_string());
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = valid(duration);
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = valid(string_list(languages));
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = valid(extensions);
        self
    }
}

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub transcriber: Option<Field<Transcriber>>,
    pub created_at: Option<Field<Timestamp>>,
    pub source: Option<Field<Source>>,
    pub languages: Option<Field<Vec<Field<String>>>>,
    pub confidence_threshold: Option<Field<f64>>,
    pub extensions: Option<Field<Extensions>>,
    pub extra_fields: Vec<String>,
}

impl Metadata {
    pub fn with_transcriber(mut self, transcriber: Transcriber) -> Self {
        self.transcriber = valid(transcriber);
        self
    }

    pub fn with_created_at(mut self, raw: &str) -> Self {
        self.created_at = valid(Timestamp::parse(raw));
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = valid(source);
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = valid(string_list(languages));
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = valid(threshold);
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = valid(extensions);
        self
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.value()
    }
}

/// Transcript body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub segments: Option<Field<Vec<Field<Segment>>>>,
    pub speakers: Option<Field<Vec<Field<Speaker>>>>,
    pub styles: Option<Field<Vec<Field<Style>>>>,
    pub extra_fields: Vec<String>,
}

impl Transcript {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments: valid(segments.into_iter().map(Field::Valid).collect()),
            ..Default::default()
        }
    }

    pub fn with_speakers(mut self, speakers: Vec<Speaker>) -> Self {
        self.speakers = valid(speakers.into_iter().map(Field::Valid).collect());
        self
    }

    pub fn with_styles(mut self, styles: Vec<Style>) -> Self {
        self.styles = valid(styles.into_iter().map(Field::Valid).collect());
        self
    }

    /// Well-formed segments with their array index
    pub fn segments(&self) -> impl Iterator<Item = (usize, &Segment)> {
        valid_items(&self.segments)
    }

    /// Well-formed speakers with their array index
    pub fn speakers(&self) -> impl Iterator<Item = (usize, &Speaker)> {
        valid_items(&self.speakers)
    }

    /// Well-formed styles with their array index
    pub fn styles(&self) -> impl Iterator<Item = (usize, &Style)> {
        valid_items(&self.styles)
    }
}

/// A time-bounded span of transcript text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    pub text: Option<Field<String>>,
    pub start: Option<Field<TimeValue>>,
    pub end: Option<Field<TimeValue>>,
    pub is_zero_duration: Option<Field<bool>>,
    pub speaker_id: Option<Field<String>>,
    pub style_id: Option<Field<String>>,
    pub confidence: Option<Field<f64>>,
    pub language: Option<Field<String>>,
    pub word_timing_mode: Option<Field<String>>,
    pub words: Option<Field<Vec<Field<Word>>>>,
    pub extensions: Option<Field<Extensions>>,
    pub extra_fields: Vec<String>,
}

impl Segment {
    pub fn new(text: &str) -> Self {
        Self {
            text: valid(text.to_string()),
            ..Default::default()
        }
    }

    pub fn with_times(mut self, start: f64, end: f64) -> Self {
        self.start = valid(TimeValue::new(start));
        self.end = valid(TimeValue::new(end));
        self
    }

    pub fn with_zero_duration(mut self, flag: bool) -> Self {
        self.is_zero_duration = valid(flag);
        self
    }

    pub fn with_speaker(mut self, speaker_id: &str) -> Self {
        self.speaker_id = valid(speaker_id.to_string());
        self
    }

    pub fn with_style(mut self, style_id: &str) -> Self {
        self.style_id = valid(style_id.to_string());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = valid(confidence);
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = valid(language.to_string());
        self
    }

    pub fn with_word_timing_mode(mut self, mode: &str) -> Self {
        self.word_timing_mode = valid(mode.to_string());
        self
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = valid(words.into_iter().map(Field::Valid).collect());
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = valid(extensions);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.value().map(String::as_str)
    }

    /// Start and end when both are present and numeric
    pub fn timing(&self) -> Option<(f64, f64)> {
        Some((self.start.value()?.value(), self.end.value()?.value()))
    }

    pub fn is_zero_duration(&self) -> bool {
        self.is_zero_duration.value().copied().unwrap_or(false)
    }

    pub fn speaker_id(&self) -> Option<&str> {
        self.speaker_id.value().map(String::as_str)
    }

    pub fn style_id(&self) -> Option<&str> {
        self.style_id.value().map(String::as_str)
    }

    pub fn language(&self) -> Option<&str> {
        self.language.value().map(String::as_str)
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence.value().copied()
    }

    /// Well-formed words with their array index
    pub fn words(&self) -> impl Iterator<Item = (usize, &Word)> {
        valid_items(&self.words)
    }

    /// The words array when present and well-formed
    pub fn word_list(&self) -> Option<&[Field<Word>]> {
        self.words.value().map(Vec::as_slice)
    }
}

/// A single timed or untimed word
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Word {
    pub text: Option<Field<String>>,
    pub start: Option<Field<TimeValue>>,
    pub end: Option<Field<TimeValue>>,
    pub is_zero_duration: Option<Field<bool>>,
    pub confidence: Option<Field<f64>>,
    pub extensions: Option<Field<Extensions>>,
    pub extra_fields: Vec<String>,
}

impl Word {
    pub fn new(text: &str) -> Self {
        Self {
            text: valid(text.to_string()),
            ..Default::default()
        }
    }

    pub fn timed(text: &str, start: f64, end: f64) -> Self {
        Self::new(text).with_times(start, end)
    }

    pub fn with_times(mut self, start: f64, end: f64) -> Self {
        self.start = valid(TimeValue::new(start));
        self.end = valid(TimeValue::new(end));
        self
    }

    pub fn with_zero_duration(mut self, flag: bool) -> Self {
        self.is_zero_duration = valid(flag);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = valid(confidence);
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = valid(extensions);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.value().map(String::as_str)
    }

    pub fn timing(&self) -> Option<(f64, f64)> {
        Some((self.start.value()?.value(), self.end.value()?.value()))
    }

    /// Both `start` and `end` keys are present
    pub fn has_timing(&self) -> bool {
        self.start.is_present() && self.end.is_present()
    }

    pub fn is_zero_duration(&self) -> bool {
        self.is_zero_duration.value().copied().unwrap_or(false)
    }
}

/// A declared speaker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Speaker {
    pub id: Option<Field<String>>,
    pub name: Option<Field<String>>,
    pub extensions: Option<Field<Extensions>>,
    pub extra_fields: Vec<String>,
}

impl Speaker {
    pub fn new(id: &str) -> Self {
        Self {
            id: valid(id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = valid(name.to_string());
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = valid(extensions);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }
}

/// A declared presentation style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub id: Option<Field<String>>,
    pub text: Option<Field<Map<String, Value>>>,
    pub display: Option<Field<Map<String, Value>>>,
    pub extensions: Option<Field<Extensions>>,
    pub extra_fields: Vec<String>,
}

impl Style {
    pub fn new(id: &str) -> Self {
        Self {
            id: valid(id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: Map<String, Value>) -> Self {
        self.text = valid(text);
        self
    }

    pub fn with_display(mut self, display: Map<String, Value>) -> Self {
        self.display = valid(display);
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = valid(extensions);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }
}

fn string_list(items: &[&str]) -> Vec<Field<String>> {
    items.iter().map(|item| Field::Valid(item.to_string())).collect()
}

fn valid_items<T>(slot: &Option<Field<Vec<Field<T>>>>) -> impl Iterator<Item = (usize, &T)> {
    slot.value()
        .into_iter()
        .flat_map(|items| items.iter().enumerate())
        .filter_map(|(idx, item)| item.valid().map(|value| (idx, value)))
}
