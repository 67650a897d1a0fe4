//! Pre-flight checks before network operations.
//!
//! Validates that required tokens are available before starting operations
//! that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{PrepisError, Result};
use crate::openai::api_key_present;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Fetching needs the transcript API token.
    Fetch,
    /// Translation, summaries and speech also need an OpenAI key.
    Language,
    /// The bot needs the transcript token and a bot token.
    Bot,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_transcript_token(settings)?;
    match operation {
        Operation::Fetch => {}
        Operation::Language => check_api_key()?,
        Operation::Bot => check_bot_token(settings)?,
    }
    Ok(())
}

fn check_transcript_token(settings: &Settings) -> Result<()> {
    match settings.transcript_token() {
        Some(_) => Ok(()),
        None => Err(PrepisError::Config(
            "YOUTUBE_TRANSCRIPT_API_TOKEN not set. Set it with: export YOUTUBE_TRANSCRIPT_API_TOKEN='...'"
                .to_string(),
        )),
    }
}

fn check_bot_token(settings: &Settings) -> Result<()> {
    match settings.telegram_token() {
        Some(_) => Ok(()),
        None => Err(PrepisError::Config(
            "TELEGRAM_BOT_TOKEN not set. Get one from @BotFather and export TELEGRAM_BOT_TOKEN='...'"
                .to_string(),
        )),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    if api_key_present() {
        Ok(())
    } else {
        Err(PrepisError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_requires_transcript_token() {
        let mut settings = Settings::default();
        settings.transcript_api.token = None;
        assert!(check(Operation::Fetch, &settings).is_err());

        settings.transcript_api.token = Some("abc123".to_string());
        assert!(check(Operation::Fetch, &settings).is_ok());
    }

    #[test]
    fn test_bot_requires_bot_token() {
        let mut settings = Settings::default();
        settings.transcript_api.token = Some("abc123".to_string());
        settings.telegram.bot_token = None;
        assert!(check(Operation::Bot, &settings).is_err());

        settings.telegram.bot_token = Some("123:abc".to_string());
        assert!(check(Operation::Bot, &settings).is_ok());
    }
}
