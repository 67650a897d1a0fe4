//! OpenAI-backed language service.

use super::{LanguageService, SummaryDepth, Voice, VoiceStyle};
use crate::chunking::split_text;
use crate::config::{OpenAISettings, Prompts, TranslationSettings};
use crate::error::{PrepisError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice as OpenAIVoice,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

const SHORT_SUMMARY_TOKENS: u32 = 500;
const DETAILED_SUMMARY_TOKENS: u32 = 4000;

/// Translation, summaries and speech through the OpenAI API.
pub struct OpenAILanguageService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    settings: OpenAISettings,
    prompts: Prompts,
    source_language: String,
    target_language: String,
}

impl OpenAILanguageService {
    /// Create a new service.
    pub fn new(settings: &OpenAISettings, translation: &TranslationSettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(settings.timeout_secs))?,
            settings: settings.clone(),
            prompts: Prompts::default(),
            source_language: translation.source_language.clone(),
            target_language: translation.target_language.clone(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn vars(&self, text: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("source_language".to_string(), self.source_language.clone());
        vars.insert("target_language".to_string(), self.target_language.clone());
        vars.insert("text".to_string(), text.to_string());
        vars
    }

    async fn complete(&self, system: &str, user: &str, max_tokens: Option<u32>) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| PrepisError::Downstream(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| PrepisError::Downstream(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.settings.model)
            .messages(messages)
            .temperature(self.settings.temperature);
        if let Some(max_tokens) = max_tokens {
            args.max_completion_tokens(max_tokens);
        }
        let request = args
            .build()
            .map_err(|e| PrepisError::Downstream(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PrepisError::Downstream(format!("Chat completion failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| PrepisError::Downstream("Empty response from model".to_string()))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl LanguageService for OpenAILanguageService {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn translate(&self, text: &str) -> Result<String> {
        let chunks = split_text(text, self.settings.translate_chunk_chars);
        info!(
            "Translating {} chunk(s) into {}",
            chunks.len(),
            self.target_language
        );

        let mut translated = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let vars = self.vars(chunk);
            let system = self
                .prompts
                .render_with_custom(&self.prompts.translation.system, &vars);
            let user = self
                .prompts
                .render_with_custom(&self.prompts.translation.user, &vars);

            translated.push(self.complete(&system, &user, None).await?);
            debug!("Translated chunk {}/{}", i + 1, chunks.len());
        }

        Ok(translated.join(" "))
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn summarize(&self, text: &str, depth: SummaryDepth) -> Result<String> {
        let vars = self.vars(text);
        let (system, user, max_tokens) = match depth {
            SummaryDepth::Short => (
                &self.prompts.summary.system,
                &self.prompts.summary.user,
                SHORT_SUMMARY_TOKENS,
            ),
            SummaryDepth::Detailed => (
                &self.prompts.summary.detailed_system,
                &self.prompts.summary.detailed_user,
                DETAILED_SUMMARY_TOKENS,
            ),
        };

        let system = self.prompts.render_with_custom(system, &vars);
        let user = self.prompts.render_with_custom(user, &vars);
        self.complete(&system, &user, Some(max_tokens)).await
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn speak(&self, text: &str, voice: Voice, style: VoiceStyle) -> Result<Vec<u8>> {
        let input = speech_input(text, style, self.settings.tts_max_chars);

        let request = CreateSpeechRequestArgs::default()
            .model(SpeechModel::Other(self.settings.tts_model.clone()))
            .voice(openai_voice(voice))
            .input(input)
            .response_format(SpeechResponseFormat::Mp3)
            .build()
            .map_err(|e| PrepisError::Downstream(e.to_string()))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| PrepisError::Downstream(format!("Speech synthesis failed: {}", e)))?;

        info!("Synthesized {} bytes of audio", response.bytes.len());
        Ok(response.bytes.to_vec())
    }
}

fn openai_voice(voice: Voice) -> OpenAIVoice {
    match voice {
        Voice::Alloy => OpenAIVoice::Alloy,
        Voice::Echo => OpenAIVoice::Echo,
        Voice::Fable => OpenAIVoice::Fable,
        Voice::Onyx => OpenAIVoice::Onyx,
        Voice::Nova => OpenAIVoice::Nova,
        Voice::Shimmer => OpenAIVoice::Shimmer,
    }
}

/// Text sent to the speech model: truncated to `max_chars`, then prefixed
/// with the style instruction.
fn speech_input(text: &str, style: VoiceStyle, max_chars: usize) -> String {
    let text = truncate_chars(text.trim(), max_chars);
    match style.instruction() {
        Some(instruction) => format!("{}\n\n{}", instruction, text),
        None => text.to_string(),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_service() -> OpenAILanguageService {
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key("sk-test")
            .with_api_base("http://127.0.0.1:9/v1");
        OpenAILanguageService {
            client: async_openai::Client::with_config(config),
            settings: OpenAISettings::default(),
            prompts: Prompts::default(),
            source_language: "English".to_string(),
            target_language: "Slovak".to_string(),
        }
    }

    #[tokio::test]
    async fn test_api_failures_are_downstream_errors() {
        let service = unreachable_service();

        let err = service
            .summarize("Some text.", SummaryDepth::Short)
            .await
            .unwrap_err();
        assert!(matches!(err, PrepisError::Downstream(_)), "{:?}", err);
        assert!(!err.is_user_error());

        let err = service
            .speak("Ahoj", Voice::Nova, VoiceStyle::Default)
            .await
            .unwrap_err();
        assert!(matches!(err, PrepisError::Downstream(_)), "{:?}", err);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ďakujem", 3), "ďak");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 4), "");
    }

    #[test]
    fn test_speech_input_style_prefix() {
        assert_eq!(speech_input(" Ahoj ", VoiceStyle::Default, 100), "Ahoj");

        let styled = speech_input("Ahoj", VoiceStyle::Formal, 100);
        assert!(styled.starts_with("Speak formally"));
        assert!(styled.ends_with("\n\nAhoj"));
    }

    #[test]
    fn test_speech_input_truncated_before_prefix() {
        let text = "x".repeat(50);
        let input = speech_input(&text, VoiceStyle::Slovak, 10);
        assert!(input.ends_with(&"x".repeat(10)));
        assert!(!input.ends_with(&"x".repeat(11)));
    }
}
