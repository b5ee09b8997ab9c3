/*!
 * Decoding raw JSON into the document model.
 *
 * Decoding never fails: anything that does not have the expected shape is
 * kept as `Field::Malformed` so the field validator can report it.
 */

use serde_json::{Map, Value};

use super::model::{
    Document, Extensions, Field, METADATA_FIELDS, Metadata, ROOT_FIELDS, ROOT_KEY, RootShape,
    SEGMENT_FIELDS, SOURCE_FIELDS, SPEAKER_FIELDS, STYLE_FIELDS, Segment, Source, Speaker, Style,
    TRANSCRIBER_FIELDS, TRANSCRIPT_FIELDS, TimeValue, Timestamp, Transcriber, Transcript,
    ValueKind, WORD_FIELDS, Word,
};

type Object = Map<String, Value>;

/// Decode a parsed JSON value into a document
pub fn from_value(value: &Value) -> Document {
    let Some(outer) = value.as_object() else {
        return Document::with_shape(RootShape::NotAnObject(ValueKind::of(value)));
    };
    let Some(root) = outer.get(ROOT_KEY) else {
        return Document::with_shape(RootShape::MissingRootKey);
    };
    let Some(root) = root.as_object() else {
        return Document::with_shape(RootShape::InvalidRoot(ValueKind::of(root)));
    };

    Document {
        shape: RootShape::Wrapped,
        version: field(root, "version", as_string),
        metadata: field(root, "metadata", |v| v.as_object().map(decode_metadata)),
        transcript: field(root, "transcript", |v| v.as_object().map(decode_transcript)),
        extra_fields: extra_keys(root, ROOT_FIELDS),
    }
}

fn decode_metadata(map: &Object) -> Metadata {
    Metadata {
        transcriber: field(map, "transcriber", |v| {
            v.as_object().map(|t| Transcriber {
                name: field(t, "name", as_string),
                version: field(t, "version", as_string),
                extra_fields: extra_keys(t, TRANSCRIBER_FIELDS),
            })
        }),
        created_at: field(map, "created_at", |v| v.as_str().map(Timestamp::parse)),
        source: field(map, "source", |v| v.as_object().map(decode_source)),
        languages: field(map, "languages", |v| list(v, as_string)),
        confidence_threshold: field(map, "confidence_threshold", as_number),
        extensions: field(map, "extensions", as_extensions),
        extra_fields: extra_keys(map, METADATA_FIELDS),
    }
}

fn decode_source(map: &Object) -> Source {
    Source {
        uri: field(map, "uri", as_string),
        duration: field(map, "duration", as_number),
        languages: field(map, "languages", |v| list(v, as_string)),
        extensions: field(map, "extensions", as_extensions),
        extra_fields: extra_keys(map, SOURCE_FIELDS),
    }
}

fn decode_transcript(map: &Object) -> Transcript {
    Transcript {
        segments: field(map, "segments", |v| {
            list(v, |item| item.as_object().map(decode_segment))
        }),
        speakers: field(map, "speakers", |v| {
            list(v, |item| item.as_object().map(decode_speaker))
        }),
        styles: field(map, "styles", |v| list(v, |item| item.as_object().map(decode_style))),
        extra_fields: extra_keys(map, TRANSCRIPT_FIELDS),
    }
}

fn decode_segment(map: &Object) -> Segment {
    Segment {
        text: field(map, "text", as_string),
        start: field(map, "start", as_time),
        end: field(map, "end", as_time),
        is_zero_duration: field(map, "is_zero_duration", Value::as_bool),
        speaker_id: field(map, "speaker_id", as_string),
        style_id: field(map, "style_id", as_string),
        confidence: field(map, "confidence", as_number),
        language: field(map, "language", as_string),
        word_timing_mode: field(map, "word_timing_mode", as_string),
        words: field(map, "words", |v| list(v, |item| item.as_object().map(decode_word))),
        extensions: field(map, "extensions", as_extensions),
        extra_fields: extra_keys(map, SEGMENT_FIELDS),
    }
}

fn decode_word(map: &Object) -> Word {
    Word {
        text: field(map, "text", as_string),
        start: field(map, "start", as_time),
        end: field(map, "end", as_time),
        is_zero_duration: field(map, "is_zero_duration", Value::as_bool),
        confidence: field(map, "confidence", as_number),
        extensions: field(map, "extensions", as_extensions),
        extra_fields: extra_keys(map, WORD_FIELDS),
    }
}

fn decode_speaker(map: &Object) -> Speaker {
    Speaker {
        id: field(map, "id", as_string),
        name: field(map, "name", as_string),
        extensions: field(map, "extensions", as_extensions),
        extra_fields: extra_keys(map, SPEAKER_FIELDS),
    }
}

fn decode_style(map: &Object) -> Style {
    Style {
        id: field(map, "id", as_string),
        text: field(map, "text", |v| v.as_object().cloned()),
        display: field(map, "display", |v| v.as_object().cloned()),
        extensions: field(map, "extensions", as_extensions),
        extra_fields: extra_keys(map, STYLE_FIELDS),
    }
}

/// Look up `key`; absent and `null` both map to `None`
fn field<T>(map: &Object, key: &str, decode: impl Fn(&Value) -> Option<T>) -> Option<Field<T>> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(match decode(value) {
            Some(decoded) => Field::Valid(decoded),
            None => Field::Malformed(ValueKind::of(value)),
        }),
    }
}

fn list<T>(value: &Value, decode: impl Fn(&Value) -> Option<T>) -> Option<Vec<Field<T>>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|item| match decode(item) {
                Some(decoded) => Field::Valid(decoded),
                None => Field::Malformed(ValueKind::of(item)),
            })
            .collect()
    })
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

fn as_time(value: &Value) -> Option<TimeValue> {
    match value {
        Value::Number(number) => TimeValue::from_literal(&number.to_string()),
        _ => None,
    }
}

fn as_extensions(value: &Value) -> Option<Extensions> {
    value.as_object().cloned()
}

fn extra_keys(map: &Object, known: &[&str]) -> Vec<String> {
    let mut extra: Vec<String> = map
        .keys()
        .filter(|key| !known.contains(&key.as_str()))
        .cloned()
        .collect();
    extra.sort();
    extra
}
