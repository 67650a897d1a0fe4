//! Transcript pipeline for Prepis.
//!
//! Coordinates the path from a pasted link to deliverable text: identifier
//! extraction, the transcript API call, normalization, assembly and optional
//! translation.

use crate::config::{Prompts, Settings};
use crate::error::{PrepisError, Result};
use crate::openai::api_key_present;
use crate::transcript::{HttpTranscriptApi, Transcript, TranscriptApi};
use crate::translation::{
    summarize_or_apology, translate_or_original, LanguageService, OpenAILanguageService,
    SummaryDepth, SUMMARY_UNAVAILABLE,
};
use crate::youtube::{extract_video_id, looks_like_youtube_url, VideoId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const TITLE_WORDS: usize = 8;
const TITLE_MAX_CHARS: usize = 50;

/// Result of running the pipeline for one video.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedTranscript {
    pub video_id: VideoId,
    /// Assembled (and possibly translated) transcript text.
    pub text: String,
    /// Short title derived from the opening words.
    pub title: String,
    /// Whether `text` is a translation.
    pub translated: bool,
    pub segment_count: usize,
    pub duration_seconds: Option<f64>,
}

/// The main transcript pipeline.
pub struct TranscriptPipeline {
    api: Arc<dyn TranscriptApi>,
    language: Option<Arc<dyn LanguageService>>,
    translate: bool,
}

impl TranscriptPipeline {
    /// Create a pipeline from settings.
    ///
    /// Language features are only wired up when an OpenAI key is present.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api: Arc<dyn TranscriptApi> = Arc::new(HttpTranscriptApi::new(&settings.transcript_api)?);

        let language: Option<Arc<dyn LanguageService>> = if api_key_present() {
            let prompts = Prompts::load(
                settings.prompts.custom_dir.as_deref(),
                Some(&settings.prompts.variables),
            )?;
            let service = OpenAILanguageService::new(&settings.openai, &settings.translation)?
                .with_prompts(prompts);
            Some(Arc::new(service))
        } else {
            warn!("OPENAI_API_KEY not set; translation, summaries and speech are disabled");
            None
        };

        Ok(Self::with_components(api, language).with_translation(settings.translation.enabled))
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        api: Arc<dyn TranscriptApi>,
        language: Option<Arc<dyn LanguageService>>,
    ) -> Self {
        Self {
            api,
            language,
            translate: false,
        }
    }

    /// Translate fetched transcripts before returning them.
    pub fn with_translation(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    /// The language service, if one is configured.
    pub fn language(&self) -> Option<&Arc<dyn LanguageService>> {
        self.language.as_ref()
    }

    /// Extract the video id from user input.
    pub fn resolve(&self, input: &str) -> Result<VideoId> {
        let input = input.trim();
        if !looks_like_youtube_url(input) {
            return Err(PrepisError::InvalidInput(format!(
                "not a YouTube link: {}",
                input
            )));
        }
        extract_video_id(input).ok_or_else(|| {
            PrepisError::InvalidInput(format!("no video id in: {}", input))
        })
    }

    /// Run the pipeline for a pasted link.
    pub async fn fetch(&self, input: &str) -> Result<FetchedTranscript> {
        let video_id = self.resolve(input)?;
        self.fetch_id(video_id).await
    }

    /// Run the pipeline for a known video id.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn fetch_id(&self, video_id: VideoId) -> Result<FetchedTranscript> {
        let transcript = self.fetch_transcript(&video_id).await?;
        let original = transcript.readable_text()?;

        let (text, translated) = match (&self.language, self.translate) {
            (Some(language), true) => translate_or_original(language.as_ref(), &original).await,
            (None, true) => {
                warn!("Translation requested but no language service is configured");
                (original, false)
            }
            _ => (original, false),
        };

        info!(
            chars = text.chars().count(),
            segments = transcript.segments.len(),
            translated,
            "Transcript ready"
        );

        Ok(FetchedTranscript {
            title: derive_title(&text),
            video_id,
            text,
            translated,
            segment_count: transcript.segments.len(),
            duration_seconds: transcript.duration_seconds(),
        })
    }

    /// Fetch and normalize without assembling text.
    pub async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript> {
        let raw = self.api.fetch(video_id).await?;
        Transcript::from_response(video_id.clone(), &raw)
    }

    /// Summarize text, degrading to a fixed notice on any failure.
    pub async fn summarize(&self, text: &str, depth: SummaryDepth) -> String {
        match &self.language {
            Some(language) => summarize_or_apology(language.as_ref(), text, depth).await,
            None => {
                warn!("Summary requested but no language service is configured");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}

/// Short display title: the first eight words plus an ellipsis, capped at
/// fifty characters.
pub fn derive_title(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS).collect();
    let title = format!("{}...", words.join(" "));

    if title.chars().count() > TITLE_MAX_CHARS {
        let head: String = title.chars().take(TITLE_MAX_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::mock::MockTranscriptApi;
    use crate::translation::mock::MockLanguageService;
    use tokio_test::{assert_err, assert_ok};

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    fn pipeline(api: MockTranscriptApi) -> TranscriptPipeline {
        TranscriptPipeline::with_components(Arc::new(api), None)
    }

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("Hello world"), "Hello world...");
        assert_eq!(
            derive_title("one two three four five six seven eight nine ten"),
            "one two three four five six seven eight..."
        );

        let long = "Supercalifragilistic expialidocious words keep going forever";
        let title = derive_title(long);
        assert_eq!(title.chars().count(), 50);
        assert!(title.ends_with("..."));
    }

    #[tokio::test]
    async fn test_fetch_hello_world() {
        let api = MockTranscriptApi::with_texts("dQw4w9WgXcQ", &["Hello", "world"]);
        let calls = api.calls.clone();

        let fetched = assert_ok!(pipeline(api).fetch(URL).await);
        assert_eq!(fetched.text, "Hello world");
        assert_eq!(fetched.video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(fetched.title, "Hello world...");
        assert!(!fetched.translated);
        assert_eq!(*calls.lock().unwrap(), vec!["dQw4w9WgXcQ".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_api() {
        let api = MockTranscriptApi::with_texts("dQw4w9WgXcQ", &["Hello"]);
        let calls = api.calls.clone();
        let pipeline = pipeline(api);

        let err = assert_err!(pipeline.fetch("not a url").await);
        assert!(matches!(err, PrepisError::InvalidInput(_)));

        let err = assert_err!(pipeline.fetch("https://youtube.com/about").await);
        assert!(matches!(err, PrepisError::InvalidInput(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_categories() {
        let err = assert_err!(pipeline(MockTranscriptApi::failing()).fetch(URL).await);
        assert!(matches!(err, PrepisError::FetchFailed(_)));

        let empty = pipeline(MockTranscriptApi::new(serde_json::json!({"foo": "bar"})));
        let err = assert_err!(empty.fetch(URL).await);
        assert!(matches!(err, PrepisError::EmptyTranscript(_)));

        let blank = pipeline(MockTranscriptApi::with_texts("dQw4w9WgXcQ", &["  ", ""]));
        let err = assert_err!(blank.fetch(URL).await);
        assert!(matches!(err, PrepisError::UnreadableTranscript(_)));
    }

    #[tokio::test]
    async fn test_translation_applied_and_degrades() {
        let api = MockTranscriptApi::with_texts("dQw4w9WgXcQ", &["Hello", "world"]);
        let pipeline = TranscriptPipeline::with_components(
            Arc::new(api.clone()),
            Some(Arc::new(MockLanguageService::default())),
        )
        .with_translation(true);
        let fetched = assert_ok!(pipeline.fetch(URL).await);
        assert_eq!(fetched.text, "[sk] Hello world");
        assert!(fetched.translated);

        let pipeline = TranscriptPipeline::with_components(
            Arc::new(api),
            Some(Arc::new(MockLanguageService::failing())),
        )
        .with_translation(true);
        let fetched = assert_ok!(pipeline.fetch(URL).await);
        assert_eq!(fetched.text, "Hello world");
        assert!(!fetched.translated);
    }

    #[tokio::test]
    async fn test_summary_without_language_service() {
        let pipeline = pipeline(MockTranscriptApi::failing());
        let summary = pipeline.summarize("Some long text here", SummaryDepth::Short).await;
        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }
}
