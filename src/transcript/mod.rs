//! Transcript data model and assembly.
//!
//! A [`Transcript`] is built from whatever the transcript API returned (see
//! [`response`]) and assembled into a single plain-text document.

mod api;
pub mod response;

pub use api::{HttpTranscriptApi, TranscriptApi};
pub use response::{normalize, ItemTranscript, Normalized, ResponseShape};

use crate::error::{PrepisError, Result};
use crate::youtube::VideoId;
use serde::{Deserialize, Serialize};

/// One timed unit of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Start offset in seconds, when the API reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// Duration in seconds, when the API reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// Ordered transcript segments for one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Build a transcript from a raw API response.
    ///
    /// Fails with [`PrepisError::EmptyTranscript`] when the response holds no
    /// transcript segments at all.
    pub fn from_response(video_id: VideoId, raw: &serde_json::Value) -> Result<Self> {
        match normalize(raw, video_id.as_str()) {
            Normalized::Segments { segments, dropped } => {
                if dropped > 0 {
                    tracing::warn!(
                        video_id = %video_id,
                        dropped,
                        kept = segments.len(),
                        "Dropped malformed transcript segments"
                    );
                }
                Ok(Self { video_id, segments })
            }
            Normalized::Empty => Err(PrepisError::EmptyTranscript(video_id.to_string())),
        }
    }

    /// Segment texts joined with spaces, trimmed.
    ///
    /// Empty when no segment carried readable text.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for segment in &self.segments {
            text.push_str(&segment.text);
            text.push(' ');
        }
        text.trim().to_string()
    }

    /// Assembled text, or [`PrepisError::UnreadableTranscript`] if it is blank.
    pub fn readable_text(&self) -> Result<String> {
        let text = self.text();
        if text.is_empty() {
            Err(PrepisError::UnreadableTranscript(self.video_id.to_string()))
        } else {
            Ok(text)
        }
    }

    /// End of the last timed segment, in seconds.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.segments
            .iter()
            .rev()
            .find_map(|s| Some(s.start? + s.duration.unwrap_or(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::extract_video_id;
    use serde_json::json;

    fn video() -> VideoId {
        extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_hello_world_response() {
        let raw = json!({
            "dQw4w9WgXcQ": {"transcript": [{"text": "Hello"}, {"text": "world"}]}
        });
        let transcript = Transcript::from_response(video(), &raw).unwrap();
        assert_eq!(transcript.text(), "Hello world");
    }

    #[test]
    fn test_text_trims_segment_whitespace_at_edges() {
        let transcript = Transcript {
            video_id: video(),
            segments: vec![
                TranscriptSegment::new("  first"),
                TranscriptSegment::new("second  "),
            ],
        };
        assert_eq!(transcript.text(), "first second");
    }

    #[test]
    fn test_blank_segments_are_unreadable() {
        let raw = json!({"dQw4w9WgXcQ": {"transcript": [{"text": " "}, {"text": ""}]}});
        let transcript = Transcript::from_response(video(), &raw).unwrap();
        assert_eq!(transcript.text(), "");
        assert!(matches!(
            transcript.readable_text(),
            Err(PrepisError::UnreadableTranscript(_))
        ));
    }

    #[test]
    fn test_unrecognised_response_is_empty_transcript() {
        let raw = json!({"status": "processing"});
        assert!(matches!(
            Transcript::from_response(video(), &raw),
            Err(PrepisError::EmptyTranscript(_))
        ));
    }

    #[test]
    fn test_duration_from_last_timed_segment() {
        let transcript = Transcript {
            video_id: video(),
            segments: vec![
                TranscriptSegment {
                    text: "a".into(),
                    start: Some(0.0),
                    duration: Some(2.0),
                },
                TranscriptSegment {
                    text: "b".into(),
                    start: Some(2.0),
                    duration: Some(3.5),
                },
                TranscriptSegment::new("untimed"),
            ],
        };
        assert_eq!(transcript.duration_seconds(), Some(5.5));
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Serves one canned response and records requested ids.
    #[derive(Clone)]
    pub struct MockTranscriptApi {
        pub response: serde_json::Value,
        pub calls: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl MockTranscriptApi {
        pub fn new(response: serde_json::Value) -> Self {
            Self {
                response,
                calls: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            }
        }

        /// Responds with a keyed-by-id transcript built from `texts`.
        pub fn with_texts(video_id: &str, texts: &[&str]) -> Self {
            let segments: Vec<serde_json::Value> = texts
                .iter()
                .map(|t| serde_json::json!({ "text": t, "start": 0.0, "duration": 1.0 }))
                .collect();
            Self::new(serde_json::json!({ video_id: { "transcript": segments } }))
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(serde_json::Value::Null)
            }
        }
    }

    #[async_trait]
    impl TranscriptApi for MockTranscriptApi {
        async fn fetch(&self, video_id: &VideoId) -> Result<serde_json::Value> {
            self.calls.lock().unwrap().push(video_id.to_string());
            if self.fail {
                return Err(PrepisError::FetchFailed("status 500".to_string()));
            }
            Ok(self.response.clone())
        }
    }
}
