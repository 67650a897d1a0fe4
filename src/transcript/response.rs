//! Normalization of transcript API responses.
//!
//! The transcript API answers in several undocumented layouts depending on
//! the request mode. A response is first classified into a [`ResponseShape`]
//! and then flattened into segments with a single `match`.

use super::TranscriptSegment;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Recognised layouts of a transcript API response.
#[derive(Debug, PartialEq)]
pub enum ResponseShape<'a> {
    /// `{"<video_id>": {"transcript": [...]}}`
    KeyedById(&'a [Value]),
    /// First entry of an object whose value carries a transcript, keyed by anything.
    KeyedScan { key: &'a str, segments: &'a [Value] },
    /// Array of items, each carrying a transcript directly or inside `tracks`.
    Items(Vec<ItemTranscript<'a>>),
    /// Nothing recognisable.
    Unknown,
}

/// Where one array item's transcript was found.
#[derive(Debug, PartialEq)]
pub enum ItemTranscript<'a> {
    /// `{"tracks": [{"transcript": [...]}, ...]}`, first track with a transcript.
    ArrayWithTracks(&'a [Value]),
    /// `{"transcript": [...]}`
    ArrayOfItems(&'a [Value]),
}

impl<'a> ItemTranscript<'a> {
    fn segments(&self) -> &'a [Value] {
        match self {
            ItemTranscript::ArrayWithTracks(segments) | ItemTranscript::ArrayOfItems(segments) => {
                segments
            }
        }
    }
}

impl<'a> ResponseShape<'a> {
    /// Classify a raw response. Earlier layouts win over later ones.
    pub fn classify(raw: &'a Value, video_id: &str) -> Self {
        match raw {
            Value::Object(map) => Self::classify_object(map, video_id),
            Value::Array(items) => {
                let found: Vec<ItemTranscript<'a>> =
                    items.iter().filter_map(classify_item).collect();
                if found.is_empty() {
                    ResponseShape::Unknown
                } else {
                    ResponseShape::Items(found)
                }
            }
            _ => ResponseShape::Unknown,
        }
    }

    fn classify_object(map: &'a Map<String, Value>, video_id: &str) -> Self {
        if let Some(segments) = map.get(video_id).and_then(transcript_array) {
            return ResponseShape::KeyedById(segments);
        }

        map.iter()
            .find_map(|(key, value)| {
                transcript_array(value).map(|segments| ResponseShape::KeyedScan {
                    key: key.as_str(),
                    segments,
                })
            })
            .unwrap_or(ResponseShape::Unknown)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::KeyedById(_) => "keyed-by-id",
            ResponseShape::KeyedScan { .. } => "keyed-scan",
            ResponseShape::Items(_) => "items",
            ResponseShape::Unknown => "unknown",
        }
    }

    /// Raw candidate segments in response order.
    pub fn raw_segments(&self) -> Vec<&'a Value> {
        match self {
            ResponseShape::KeyedById(segments) => segments.iter().collect(),
            ResponseShape::KeyedScan { segments, .. } => segments.iter().collect(),
            ResponseShape::Items(items) => items
                .iter()
                .flat_map(|item| item.segments().iter())
                .collect(),
            ResponseShape::Unknown => Vec::new(),
        }
    }
}

fn transcript_array(value: &Value) -> Option<&[Value]> {
    value
        .as_object()?
        .get("transcript")?
        .as_array()
        .map(Vec::as_slice)
}

fn classify_item(item: &Value) -> Option<ItemTranscript<'_>> {
    let obj = item.as_object()?;

    match obj.get("tracks").and_then(Value::as_array) {
        Some(tracks) if !tracks.is_empty() => tracks
            .iter()
            .find_map(transcript_array)
            .map(ItemTranscript::ArrayWithTracks),
        _ => transcript_array(item).map(ItemTranscript::ArrayOfItems),
    }
}

/// Outcome of normalizing a response.
#[derive(Debug)]
pub enum Normalized {
    /// Candidate segments were found; malformed ones have been dropped.
    Segments {
        segments: Vec<TranscriptSegment>,
        dropped: usize,
    },
    /// No layout matched or the matched transcript was an empty list.
    Empty,
}

/// Flatten a raw response into transcript segments.
pub fn normalize(raw: &Value, video_id: &str) -> Normalized {
    let shape = ResponseShape::classify(raw, video_id);

    if shape == ResponseShape::Unknown {
        warn!(
            video_id,
            kind = json_kind(raw),
            "Unrecognised transcript response layout"
        );
        return Normalized::Empty;
    }

    let candidates = shape.raw_segments();
    debug!(
        video_id,
        shape = shape.name(),
        candidates = candidates.len(),
        "Classified transcript response"
    );

    if candidates.is_empty() {
        return Normalized::Empty;
    }

    let total = candidates.len();
    let segments: Vec<TranscriptSegment> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let parsed = parse_segment(candidate);
            if parsed.is_none() {
                debug!(segment = %candidate, "Ignoring malformed transcript segment");
            }
            parsed
        })
        .collect();

    Normalized::Segments {
        dropped: total - segments.len(),
        segments,
    }
}

fn parse_segment(value: &Value) -> Option<TranscriptSegment> {
    let obj = value.as_object()?;
    let text = obj.get("text")?.as_str()?.to_string();

    Some(TranscriptSegment {
        text,
        start: obj.get("start").and_then(number_like),
        duration: obj
            .get("duration")
            .or_else(|| obj.get("dur"))
            .and_then(number_like),
    })
}

/// Accept both `1.5` and `"1.5"`.
fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(normalized: Normalized) -> Vec<String> {
        match normalized {
            Normalized::Segments { segments, .. } => {
                segments.into_iter().map(|s| s.text).collect()
            }
            Normalized::Empty => panic!("expected segments"),
        }
    }

    #[test]
    fn test_keyed_by_id() {
        let raw = json!({
            "dQw4w9WgXcQ": {"transcript": [{"text": "Hello"}, {"text": "world"}]}
        });
        assert_eq!(
            ResponseShape::classify(&raw, "dQw4w9WgXcQ").name(),
            "keyed-by-id"
        );
        assert_eq!(texts(normalize(&raw, "dQw4w9WgXcQ")), vec!["Hello", "world"]);
    }

    #[test]
    fn test_keyed_by_id_preferred_over_earlier_keys() {
        let raw = json!({
            "other": {"transcript": [{"text": "wrong"}]},
            "dQw4w9WgXcQ": {"transcript": [{"text": "right"}]}
        });
        assert_eq!(texts(normalize(&raw, "dQw4w9WgXcQ")), vec!["right"]);
    }

    #[test]
    fn test_keyed_scan_takes_first_entry_with_transcript() {
        let raw = json!({
            "meta": {"status": "ok"},
            "aaaaaaaaaaa": {"transcript": [{"text": "first"}, {"text": "second"}]},
            "bbbbbbbbbbb": {"transcript": [{"text": "third"}]}
        });
        match ResponseShape::classify(&raw, "dQw4w9WgXcQ") {
            ResponseShape::KeyedScan { key, .. } => assert_eq!(key, "aaaaaaaaaaa"),
            other => panic!("unexpected shape {:?}", other),
        }
        assert_eq!(
            texts(normalize(&raw, "dQw4w9WgXcQ")),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_id_key_without_transcript_falls_back_to_scan() {
        let raw = json!({
            "dQw4w9WgXcQ": {"error": "not ready"},
            "zzzzzzzzzzz": {"transcript": [{"text": "fallback"}]}
        });
        assert_eq!(texts(normalize(&raw, "dQw4w9WgXcQ")), vec!["fallback"]);
    }

    #[test]
    fn test_array_with_tracks() {
        let raw = json!([{
            "id": "dQw4w9WgXcQ",
            "tracks": [
                {"language": "de"},
                {"language": "en", "transcript": [
                    {"text": "one", "start": "0.0", "dur": "1.5"},
                    {"text": "two", "start": 1.5, "duration": 2}
                ]},
                {"language": "sk", "transcript": [{"text": "ignored"}]}
            ]
        }]);

        let shape = ResponseShape::classify(&raw, "dQw4w9WgXcQ");
        assert!(matches!(
            &shape,
            ResponseShape::Items(items) if matches!(items[0], ItemTranscript::ArrayWithTracks(_))
        ));

        match normalize(&raw, "dQw4w9WgXcQ") {
            Normalized::Segments { segments, dropped } => {
                assert_eq!(dropped, 0);
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[0].text, "one");
                assert_eq!(segments[0].start, Some(0.0));
                assert_eq!(segments[0].duration, Some(1.5));
                assert_eq!(segments[1].duration, Some(2.0));
            }
            Normalized::Empty => panic!("expected segments"),
        }
    }

    #[test]
    fn test_array_of_items_concatenated_in_order() {
        let raw = json!([
            {"transcript": [{"text": "a"}, {"text": "b"}]},
            "noise",
            {"transcript": [{"text": "c"}]}
        ]);
        assert_eq!(texts(normalize(&raw, "dQw4w9WgXcQ")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tracks_take_precedence_over_item_transcript() {
        let raw = json!([{
            "tracks": [{"transcript": [{"text": "from track"}]}],
            "transcript": [{"text": "from item"}]
        }]);
        assert_eq!(texts(normalize(&raw, "dQw4w9WgXcQ")), vec!["from track"]);
    }

    #[test]
    fn test_empty_tracks_fall_back_to_item_transcript() {
        let raw = json!([{"tracks": [], "transcript": [{"text": "direct"}]}]);
        assert_eq!(texts(normalize(&raw, "dQw4w9WgXcQ")), vec!["direct"]);
    }

    #[test]
    fn test_malformed_segments_dropped() {
        let raw = json!({
            "dQw4w9WgXcQ": {"transcript": [
                {"text": "kept"},
                {"start": 1.0},
                "bare string",
                {"text": 42},
                {"text": "also kept"}
            ]}
        });
        match normalize(&raw, "dQw4w9WgXcQ") {
            Normalized::Segments { segments, dropped } => {
                assert_eq!(dropped, 3);
                let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
                assert_eq!(texts, vec!["kept", "also kept"]);
            }
            Normalized::Empty => panic!("expected segments"),
        }
    }

    #[test]
    fn test_unknown_shapes_are_empty() {
        for raw in [
            json!(null),
            json!("transcript"),
            json!(42),
            json!({}),
            json!([]),
            json!({"dQw4w9WgXcQ": {"transcript": "not a list"}}),
            json!([{"tracks": [{"language": "en"}]}]),
        ] {
            assert!(
                matches!(normalize(&raw, "dQw4w9WgXcQ"), Normalized::Empty),
                "expected empty for {}",
                raw
            );
        }
    }

    #[test]
    fn test_empty_transcript_list_is_empty() {
        let raw = json!({"dQw4w9WgXcQ": {"transcript": []}});
        assert!(matches!(normalize(&raw, "dQw4w9WgXcQ"), Normalized::Empty));
    }
}
