/*!
 * Encoding the document model back to JSON.
 *
 * Only well-formed fields are written; malformed fields and unknown keys
 * are dropped.
 */

use serde_json::{Map, Number, Value};

use super::model::{
    Document, Extensions, Field, FieldSlot, Metadata, ROOT_KEY, Segment, Source, Speaker, Style,
    TimeValue, Transcript, Word,
};

/// Encode a document as `{"stj": {...}}`
pub fn to_value(document: &Document) -> Value {
    let mut root = Map::new();
    put(&mut root, "version", document.version.value().map(|v| Value::from(v.as_str())));
    put(&mut root, "metadata", document.metadata.value().map(encode_metadata));
    put(&mut root, "transcript", document.transcript.value().map(encode_transcript));

    let mut outer = Map::new();
    outer.insert(ROOT_KEY.to_string(), Value::Object(root));
    Value::Object(outer)
}

fn encode_metadata(metadata: &Metadata) -> Value {
    let mut map = Map::new();
    if let Some(transcriber) = metadata.transcriber.value() {
        let mut t = Map::new();
        put_string(&mut t, "name", &transcriber.name);
        put_string(&mut t, "version", &transcriber.version);
        map.insert("transcriber".to_string(), Value::Object(t));
    }
    put(
        &mut map,
        "created_at",
        metadata.created_at.value().map(|ts| Value::from(ts.to_iso_string())),
    );
    put(&mut map, "source", metadata.source.value().map(encode_source));
    put(&mut map, "languages", encode_strings(&metadata.languages));
    put_number(&mut map, "confidence_threshold", &metadata.confidence_threshold);
    put_extensions(&mut map, &metadata.extensions);
    Value::Object(map)
}

fn encode_source(source: &Source) -> Value {
    let mut map = Map::new();
    put_string(&mut map, "uri", &source.uri);
    put_number(&mut map, "duration", &source.duration);
    put(&mut map, "languages", encode_strings(&source.languages));
    put_extensions(&mut map, &source.extensions);
    Value::Object(map)
}

fn encode_transcript(transcript: &Transcript) -> Value {
    let mut map = Map::new();
    put(&mut map, "speakers", encode_list(&transcript.speakers, encode_speaker));
    put(&mut map, "styles", encode_list(&transcript.styles, encode_style));
    put(&mut map, "segments", encode_list(&transcript.segments, encode_segment));
    Value::Object(map)
}

fn encode_segment(segment: &Segment) -> Value {
    let mut map = Map::new();
    put_string(&mut map, "text", &segment.text);
    put_time(&mut map, "start", &segment.start);
    put_time(&mut map, "end", &segment.end);
    put(&mut map, "is_zero_duration", segment.is_zero_duration.value().map(|b| Value::Bool(*b)));
    put_string(&mut map, "speaker_id", &segment.speaker_id);
    put_string(&mut map, "style_id", &segment.style_id);
    put_number(&mut map, "confidence", &segment.confidence);
    put_string(&mut map, "language", &segment.language);
    put_string(&mut map, "word_timing_mode", &segment.word_timing_mode);
    put(&mut map, "words", encode_list(&segment.words, encode_word));
    put_extensions(&mut map, &segment.extensions);
    Value::Object(map)
}

fn encode_word(word: &Word) -> Value {
    let mut map = Map::new();
    put_string(&mut map, "text", &word.text);
    put_time(&mut map, "start", &word.start);
    put_time(&mut map, "end", &word.end);
    put(&mut map, "is_zero_duration", word.is_zero_duration.value().map(|b| Value::Bool(*b)));
    put_number(&mut map, "confidence", &word.confidence);
    put_extensions(&mut map, &word.extensions);
    Value::Object(map)
}

fn encode_speaker(speaker: &Speaker) -> Value {
    let mut map = Map::new();
    put_string(&mut map, "id", &speaker.id);
    put_string(&mut map, "name", &speaker.name);
    put_extensions(&mut map, &speaker.extensions);
    Value::Object(map)
}

fn encode_style(style: &Style) -> Value {
    let mut map = Map::new();
    put_string(&mut map, "id", &style.id);
    put(&mut map, "text", style.text.value().map(|t| Value::Object(t.clone())));
    put(&mut map, "display", style.display.value().map(|d| Value::Object(d.clone())));
    put_extensions(&mut map, &style.extensions);
    Value::Object(map)
}

fn encode_list<T>(slot: &Option<Field<Vec<Field<T>>>>, encode: fn(&T) -> Value) -> Option<Value> {
    slot.value().map(|items| {
        Value::Array(items.iter().filter_map(Field::valid).map(encode).collect())
    })
}

fn encode_strings(slot: &Option<Field<Vec<Field<String>>>>) -> Option<Value> {
    slot.value().map(|items| {
        Value::Array(
            items
                .iter()
                .filter_map(Field::valid)
                .map(|s| Value::from(s.as_str()))
                .collect(),
        )
    })
}

fn put(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

fn put_string(map: &mut Map<String, Value>, key: &str, slot: &Option<Field<String>>) {
    put(map, key, slot.value().map(|s| Value::from(s.as_str())));
}

fn put_number(map: &mut Map<String, Value>, key: &str, slot: &Option<Field<f64>>) {
    put(map, key, slot.value().and_then(|n| Number::from_f64(*n)).map(Value::Number));
}

fn put_time(map: &mut Map<String, Value>, key: &str, slot: &Option<Field<TimeValue>>) {
    put(map, key, slot.value().and_then(time_number).map(Value::Number));
}

fn put_extensions(map: &mut Map<String, Value>, slot: &Option<Field<Extensions>>) {
    put(map, "extensions", slot.value().map(|e| Value::Object(e.clone())));
}

/// Write the literal as given when it is valid JSON number text
fn time_number(time: &TimeValue) -> Option<Number> {
    time.literal()
        .parse::<Number>()
        .ok()
        .or_else(|| Number::from_f64(time.value()))
}
