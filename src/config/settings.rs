//! Configuration settings for Prepis.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest text the Bot API accepts in one message.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Shortest message limit that still leaves room for a "Part i/n" frame.
const MIN_MESSAGE_LENGTH: usize = 64;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcript_api: TranscriptApiSettings,
    pub openai: OpenAISettings,
    pub translation: TranslationSettings,
    pub telegram: TelegramSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Transcript API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptApiSettings {
    /// Endpoint accepting `{"ids": [...]}` POST requests.
    pub endpoint: String,
    /// Token sent as `Authorization: Basic <token>`.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TranscriptApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://www.youtube-transcript.io/api/transcripts".to_string(),
            token: None,
            timeout_secs: 60,
        }
    }
}

/// OpenAI settings for translation, summaries and speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Chat model used for translation and summaries.
    pub model: String,
    /// Speech model used for text-to-speech.
    pub tts_model: String,
    /// Sampling temperature for chat requests.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum characters sent per translation request.
    pub translate_chunk_chars: usize,
    /// Maximum characters accepted by a single speech request.
    pub tts_max_chars: usize,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            tts_model: "gpt-4o-mini-tts".to_string(),
            temperature: 0.3,
            timeout_secs: 300,
            translate_chunk_chars: 4000,
            tts_max_chars: 4000,
        }
    }
}

/// Translation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Translate fetched transcripts before delivering them.
    pub enabled: bool,
    /// Language of the incoming transcripts.
    pub source_language: String,
    /// Language to translate and summarize into.
    pub target_language: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            source_language: "English".to_string(),
            target_language: "Slovak".to_string(),
        }
    }
}

/// Telegram bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    /// Bot token from @BotFather.
    pub bot_token: Option<String>,
    /// Bot API base URL.
    pub api_base: String,
    /// Maximum characters per outgoing message (Telegram caps at 4096).
    pub max_message_length: usize,
    /// Pause between consecutive parts of one reply, in milliseconds.
    pub message_delay_ms: u64,
    /// Chat used when a podcast request names none.
    pub default_chat_id: Option<String>,
    /// Long-polling timeout for getUpdates, in seconds.
    pub poll_timeout_secs: u64,
    /// Transcripts remembered per chat for the summarize button.
    pub transcript_cache_size: usize,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: "https://api.telegram.org".to_string(),
            max_message_length: 4000,
            message_delay_ms: 500,
            default_chat_id: None,
            poll_timeout_secs: 30,
            transcript_cache_size: 10,
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Entries kept in each browser session's history.
    pub history_limit: usize,
    /// Team-radio translations kept in the shared feed.
    pub feed_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            history_limit: 10,
            feed_capacity: 20,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Secrets found in the environment override the file.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let settings = Self::read_from(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`Settings::load_from`] but without validation.
    pub fn read_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env();
        Ok(settings)
    }

    /// Override secrets from environment variables.
    pub fn apply_env(&mut self) {
        if let Some(token) = env_var("YOUTUBE_TRANSCRIPT_API_TOKEN") {
            self.transcript_api.token = Some(token);
        }
        if let Some(token) = env_var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
    }

    /// Reject values that would make the services misbehave.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PrepisError;

        url::Url::parse(&self.transcript_api.endpoint).map_err(|e| {
            PrepisError::Config(format!(
                "transcript_api.endpoint is not a valid URL: {}",
                e
            ))
        })?;
        url::Url::parse(&self.telegram.api_base).map_err(|e| {
            PrepisError::Config(format!("telegram.api_base is not a valid URL: {}", e))
        })?;

        if !(MIN_MESSAGE_LENGTH..=TELEGRAM_MESSAGE_LIMIT)
            .contains(&self.telegram.max_message_length)
        {
            return Err(PrepisError::Config(format!(
                "telegram.max_message_length must be between {} and {}",
                MIN_MESSAGE_LENGTH, TELEGRAM_MESSAGE_LIMIT
            )));
        }
        if self.openai.translate_chunk_chars == 0 {
            return Err(PrepisError::Config(
                "openai.translate_chunk_chars must be greater than zero".to_string(),
            ));
        }
        if self.server.history_limit == 0
            || self.server.feed_capacity == 0
            || self.telegram.transcript_cache_size == 0
        {
            return Err(PrepisError::Config(
                "history, feed and transcript cache sizes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prepis")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Transcript API token, if configured.
    pub fn transcript_token(&self) -> Option<&str> {
        self.transcript_api.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Telegram bot token, if configured.
    pub fn telegram_token(&self) -> Option<&str> {
        self.telegram.bot_token.as_deref().filter(|t| !t.is_empty())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
