//! Translation, summaries and speech synthesis.
//!
//! All three are delegated to a hosted language model. Failures here never
//! abort a request: callers fall back to the original text or a fixed notice
//! through [`translate_or_original`] and [`summarize_or_apology`].

mod openai;

pub use openai::OpenAILanguageService;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Returned in place of a summary when the model could not produce one.
pub const SUMMARY_UNAVAILABLE: &str =
    "Sorry, the summary could not be created right now. Please try again later.";

/// How thorough a summary should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryDepth {
    /// A few paragraphs.
    Short,
    /// Sectioned, keeps as much detail as possible.
    Detailed,
}

/// Text-to-speech voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    /// Parse a voice name, falling back to the default voice.
    pub fn parse_or_default(name: Option<&str>) -> Self {
        match name.map(str::parse::<Voice>) {
            Some(Ok(voice)) => voice,
            Some(Err(e)) => {
                warn!("{}, using alloy", e);
                Voice::default()
            }
            None => Voice::default(),
        }
    }
}

impl std::str::FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alloy" => Ok(Voice::Alloy),
            "echo" => Ok(Voice::Echo),
            "fable" => Ok(Voice::Fable),
            "onyx" => Ok(Voice::Onyx),
            "nova" => Ok(Voice::Nova),
            "shimmer" => Ok(Voice::Shimmer),
            _ => Err(format!("Unknown voice: {}", s)),
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        };
        write!(f, "{}", name)
    }
}

/// Pronunciation style, sent to the speech model as a spoken instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStyle {
    #[default]
    Default,
    Slovak,
    Clear,
    Friendly,
    Formal,
}

impl VoiceStyle {
    /// Instruction prefixed to the text, `None` for the default style.
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            VoiceStyle::Default => None,
            VoiceStyle::Slovak => {
                Some("Speak like a native Slovak speaker with excellent Slovak pronunciation.")
            }
            VoiceStyle::Clear => Some(
                "Speak very clearly and articulate every word, especially the Slovak letters ď, ť, ň, ľ, š, č, ž.",
            ),
            VoiceStyle::Friendly => Some("Speak in a friendly, warm tone."),
            VoiceStyle::Formal => Some("Speak formally and professionally."),
        }
    }

    /// Parse a style name, falling back to `fallback`.
    pub fn parse_or(name: Option<&str>, fallback: VoiceStyle) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or(fallback)
    }
}

impl std::str::FromStr for VoiceStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(VoiceStyle::Default),
            "slovak" => Ok(VoiceStyle::Slovak),
            "clear" => Ok(VoiceStyle::Clear),
            "friendly" => Ok(VoiceStyle::Friendly),
            "formal" => Ok(VoiceStyle::Formal),
            _ => Err(format!("Unknown voice style: {}", s)),
        }
    }
}

impl std::fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VoiceStyle::Default => "default",
            VoiceStyle::Slovak => "slovak",
            VoiceStyle::Clear => "clear",
            VoiceStyle::Friendly => "friendly",
            VoiceStyle::Formal => "formal",
        };
        write!(f, "{}", name)
    }
}

/// Hosted language operations.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Translate text, splitting it into request-sized chunks as needed.
    async fn translate(&self, text: &str) -> Result<String>;

    /// Summarize text.
    async fn summarize(&self, text: &str, depth: SummaryDepth) -> Result<String>;

    /// Synthesize speech as MP3 bytes.
    async fn speak(&self, text: &str, voice: Voice, style: VoiceStyle) -> Result<Vec<u8>>;
}

/// Translate, or hand back the original text if translation fails.
///
/// The flag is `true` when the returned text is a translation.
pub async fn translate_or_original(service: &dyn LanguageService, text: &str) -> (String, bool) {
    match service.translate(text).await {
        Ok(translated) if !translated.trim().is_empty() => (translated, true),
        Ok(_) => {
            warn!("Translation returned empty text, keeping original");
            (text.to_string(), false)
        }
        Err(e) => {
            warn!(error = %e, "Translation failed, keeping original");
            (text.to_string(), false)
        }
    }
}

/// Summarize, or return [`SUMMARY_UNAVAILABLE`] if summarization fails.
pub async fn summarize_or_apology(
    service: &dyn LanguageService,
    text: &str,
    depth: SummaryDepth,
) -> String {
    match service.summarize(text, depth).await {
        Ok(summary) if !summary.trim().is_empty() => summary,
        Ok(_) => SUMMARY_UNAVAILABLE.to_string(),
        Err(e) => {
            warn!(error = %e, ?depth, "Summarization failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::PrepisError;
    use std::sync::{Arc, Mutex};

    /// Records calls; prefixes translations and summaries so tests can see them.
    #[derive(Clone, Default)]
    pub struct MockLanguageService {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl MockLanguageService {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn record(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(PrepisError::Downstream("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl LanguageService for MockLanguageService {
        async fn translate(&self, text: &str) -> Result<String> {
            self.record(format!("translate:{}", text))?;
            Ok(format!("[sk] {}", text))
        }

        async fn summarize(&self, text: &str, depth: SummaryDepth) -> Result<String> {
            self.record(format!("summarize:{:?}:{}", depth, text))?;
            Ok(format!("summary of {} chars", text.chars().count()))
        }

        async fn speak(&self, text: &str, voice: Voice, style: VoiceStyle) -> Result<Vec<u8>> {
            self.record(format!("speak:{}:{}:{}", voice, style, text))?;
            Ok(b"ID3mock".to_vec())
        }
    }
}
