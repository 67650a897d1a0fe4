//! Error types for Prepis.

use thiserror::Error;

/// Library-level error type for Prepis operations.
#[derive(Error, Debug)]
pub enum PrepisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript fetch failed: {0}")]
    FetchFailed(String),

    #[error("Transcript for {0} contains no segments")]
    EmptyTranscript(String),

    #[error("Transcript for {0} contains no readable text")]
    UnreadableTranscript(String),

    #[error("Downstream service failed: {0}")]
    Downstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Telegram(String),
}

impl PrepisError {
    /// Message shown to a chat or web user for this error.
    ///
    /// Input and transcript problems each get their own wording; everything
    /// else collapses into a generic failure notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            PrepisError::InvalidInput(_) => {
                "Could not extract a video ID from the link. Please check the URL."
            }
            PrepisError::FetchFailed(_) => {
                "Could not fetch the transcript. The video may have no captions or the transcript service failed."
            }
            PrepisError::EmptyTranscript(_) => "The transcript contains no segments.",
            PrepisError::UnreadableTranscript(_) => {
                "The transcript was fetched but contains no readable text."
            }
            _ => "An unexpected error occurred while processing the transcript.",
        }
    }

    /// Whether the error was caused by what the user sent rather than by us.
    pub fn is_user_error(&self) -> bool {
        matches!(self, PrepisError::InvalidInput(_))
    }
}

/// Result type alias for Prepis operations.
pub type Result<T> = std::result::Result<T, PrepisError>;
