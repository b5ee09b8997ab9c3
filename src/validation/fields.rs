/*!
 * Field presence and type validation.
 *
 * Walks every record of the document and reports:
 * - required fields that are missing
 * - fields whose JSON type is wrong
 * - strings that are present but blank
 * - keys the format does not define
 *
 * Value constraints (ranges, formats, references) belong to the other phases.
 */

use crate::document::{
    Document, Field, Metadata, Segment, Source, Speaker, Style, Transcriber, Transcript, Word,
};

use super::issue::Issue;
use super::service::ValidationPhase;

/// Reports missing, mistyped, blank and unknown fields
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for FieldValidator {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut checker = FieldChecker::default();

        match &document.metadata {
            None => {}
            Some(Field::Malformed(kind)) => checker.push(
                Issue::error(format!("metadata must be an object, got {}", kind)).at("metadata"),
            ),
            Some(Field::Valid(metadata)) => checker.metadata(metadata),
        }

        match &document.transcript {
            None => checker.push(
                Issue::error("Missing required field: 'transcript'")
                    .at("transcript")
                    .spec_ref("#transcript"),
            ),
            Some(Field::Malformed(kind)) => checker.push(
                Issue::error(format!("transcript must be an object, got {}", kind))
                    .at("transcript")
                    .spec_ref("#transcript"),
            ),
            Some(Field::Valid(transcript)) => checker.transcript(transcript),
        }

        checker.issues
    }
}

#[derive(Default)]
struct FieldChecker {
    issues: Vec<Issue>,
}

impl FieldChecker {
    fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn metadata(&mut self, metadata: &Metadata) {
        self.unexpected(&metadata.extra_fields, "metadata");

        if let Some(transcriber) = self.optional(&metadata.transcriber, "metadata.transcriber", "object") {
            self.transcriber(transcriber);
        }
        self.optional(&metadata.created_at, "metadata.created_at", "string (ISO 8601 timestamp)");
        if let Some(source) = self.optional(&metadata.source, "metadata.source", "object") {
            self.source(source);
        }
        self.string_list(&metadata.languages, "metadata.languages");
        self.optional(&metadata.confidence_threshold, "metadata.confidence_threshold", "number");
        self.optional(&metadata.extensions, "metadata.extensions", "object");
    }

    fn transcriber(&mut self, transcriber: &Transcriber) {
        self.unexpected(&transcriber.extra_fields, "metadata.transcriber");
        self.optional_string(&transcriber.name, "metadata.transcriber.name");
        self.optional_string(&transcriber.version, "metadata.transcriber.version");
    }

    fn source(&mut self, source: &Source) {
        self.unexpected(&source.extra_fields, "metadata.source");
        self.optional_string(&source.uri, "metadata.source.uri");
        self.optional(&source.duration, "metadata.source.duration", "number");
        self.string_list(&source.languages, "metadata.source.languages");
        self.optional(&source.extensions, "metadata.source.extensions", "object");
    }

    fn transcript(&mut self, transcript: &Transcript) {
        self.unexpected(&transcript.extra_fields, "transcript");

        match &transcript.segments {
            None => self.push(
                Issue::error("Missing required field: 'transcript.segments'")
                    .at("transcript.segments")
                    .spec_ref("#transcript"),
            ),
            Some(Field::Malformed(kind)) => self.push(
                Issue::error(format!("transcript.segments must be an array, got {}", kind))
                    .at("transcript.segments")
                    .spec_ref("#transcript"),
            ),
            Some(Field::Valid(segments)) if segments.is_empty() => self.push(
                Issue::error("transcript.segments cannot be empty")
                    .at("transcript.segments")
                    .spec_ref("#transcript"),
            ),
            Some(Field::Valid(segments)) => {
                for (idx, item) in segments.iter().enumerate() {
                    let location = format!("transcript.segments[{}]", idx);
                    if let Some(segment) = self.record(item, &location) {
                        self.segment(segment, &location);
                    }
                }
            }
        }

        if let Some(speakers) = self.list(&transcript.speakers, "transcript.speakers", true) {
            for (idx, item) in speakers.iter().enumerate() {
                let location = format!("transcript.speakers[{}]", idx);
                if let Some(speaker) = self.record(item, &location) {
                    self.speaker(speaker, &location);
                }
            }
        }

        if let Some(styles) = self.list(&transcript.styles, "transcript.styles", true) {
            for (idx, item) in styles.iter().enumerate() {
                let location = format!("transcript.styles[{}]", idx);
                if let Some(style) = self.record(item, &location) {
                    self.style(style, &location);
                }
            }
        }
    }

    fn segment(&mut self, segment: &Segment, location: &str) {
        self.unexpected(&segment.extra_fields, location);
        self.required_string(&segment.text, &format!("{}.text", location));
        self.optional(&segment.start, &format!("{}.start", location), "number");
        self.optional(&segment.end, &format!("{}.end", location), "number");
        self.optional(&segment.is_zero_duration, &format!("{}.is_zero_duration", location), "boolean");
        self.optional_string(&segment.speaker_id, &format!("{}.speaker_id", location));
        self.optional_string(&segment.style_id, &format!("{}.style_id", location));
        self.optional(&segment.confidence, &format!("{}.confidence", location), "number");
        self.optional_string(&segment.language, &format!("{}.language", location));
        self.optional(&segment.word_timing_mode, &format!("{}.word_timing_mode", location), "string");
        self.optional(&segment.extensions, &format!("{}.extensions", location), "object");

        let words_location = format!("{}.words", location);
        if let Some(words) = self.list(&segment.words, &words_location, false) {
            for (idx, item) in words.iter().enumerate() {
                let word_location = format!("{}[{}]", words_location, idx);
                if let Some(word) = self.record(item, &word_location) {
                    self.word(word, &word_location);
                }
            }
        }
    }

    fn word(&mut self, word: &Word, location: &str) {
        self.unexpected(&word.extra_fields, location);
        self.required_string(&word.text, &format!("{}.text", location));
        self.optional(&word.start, &format!("{}.start", location), "number");
        self.optional(&word.end, &format!("{}.end", location), "number");
        self.optional(&word.is_zero_duration, &format!("{}.is_zero_duration", location), "boolean");
        self.optional(&word.confidence, &format!("{}.confidence", location), "number");
        self.optional(&word.extensions, &format!("{}.extensions", location), "object");
    }

    fn speaker(&mut self, speaker: &Speaker, location: &str) {
        self.unexpected(&speaker.extra_fields, location);
        self.required_string(&speaker.id, &format!("{}.id", location));
        self.optional_string(&speaker.name, &format!("{}.name", location));
        self.optional(&speaker.extensions, &format!("{}.extensions", location), "object");
    }

    fn style(&mut self, style: &Style, location: &str) {
        self.unexpected(&style.extra_fields, location);
        self.required_string(&style.id, &format!("{}.id", location));
        self.optional(&style.text, &format!("{}.text", location), "object");
        self.optional(&style.display, &format!("{}.display", location), "object");
        self.optional(&style.extensions, &format!("{}.extensions", location), "object");
    }

    /// An element of an object array
    fn record<'a, T>(&mut self, item: &'a Field<T>, location: &str) -> Option<&'a T> {
        match item {
            Field::Valid(record) => Some(record),
            Field::Malformed(kind) => {
                self.push(Issue::error(format!("{} must be an object, got {}", location, kind)).at(location));
                None
            }
        }
    }

    fn optional<'a, T>(&mut self, slot: &'a Option<Field<T>>, location: &str, expected: &str) -> Option<&'a T> {
        match slot {
            None => None,
            Some(Field::Valid(value)) => Some(value),
            Some(Field::Malformed(kind)) => {
                self.push(
                    Issue::error(format!(
                        "Field {} must be of type {} if present, got {}",
                        location, expected, kind
                    ))
                    .at(location),
                );
                None
            }
        }
    }

    fn optional_string(&mut self, slot: &Option<Field<String>>, location: &str) {
        if let Some(value) = self.optional(slot, location, "string") {
            self.non_blank(value, location);
        }
    }

    fn required_string(&mut self, slot: &Option<Field<String>>, location: &str) {
        match slot {
            None => self.push(Issue::error(format!("Missing required field: '{}'", location)).at(location)),
            Some(Field::Malformed(kind)) => self.push(
                Issue::error(format!("Field {} must be of type string, got {}", location, kind)).at(location),
            ),
            Some(Field::Valid(value)) => self.non_blank(value, location),
        }
    }

    fn non_blank(&mut self, value: &str, location: &str) {
        if value.trim().is_empty() {
            self.push(Issue::error(format!("Field {} must be a non-empty string", location)).at(location));
        }
    }

    fn list<'a, T>(
        &mut self,
        slot: &'a Option<Field<Vec<Field<T>>>>,
        location: &str,
        allow_empty: bool,
    ) -> Option<&'a Vec<Field<T>>> {
        match slot {
            None => None,
            Some(Field::Malformed(kind)) => {
                self.push(Issue::error(format!("Field {} must be an array, got {}", location, kind)).at(location));
                None
            }
            Some(Field::Valid(items)) => {
                if items.is_empty() && !allow_empty {
                    self.push(Issue::error(format!("Field {} must not be empty", location)).at(location));
                }
                Some(items)
            }
        }
    }

    fn string_list(&mut self, slot: &Option<Field<Vec<Field<String>>>>, location: &str) {
        let Some(items) = self.list(slot, location, true) else {
            return;
        };
        for (idx, item) in items.iter().enumerate() {
            let item_location = format!("{}[{}]", location, idx);
            match item {
                Field::Valid(value) => self.non_blank(value, &item_location),
                Field::Malformed(kind) => self.push(
                    Issue::error(format!("Field {} must be of type string, got {}", item_location, kind))
                        .at(item_location),
                ),
            }
        }
    }

    fn unexpected(&mut self, extra_fields: &[String], location: &str) {
        if !extra_fields.is_empty() {
            self.push(
                Issue::error(format!("Unexpected fields in {}: {}", location, extra_fields.join(", ")))
                    .at(location),
            );
        }
    }
}
