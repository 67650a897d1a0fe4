//! Telegram bot front end.
//!
//! Long-polls the Bot API and replies to YouTube links with their
//! transcripts. Each update is handled on its own task.

mod handler;
pub mod telegram;

pub use handler::BotHandler;
pub use telegram::{Chat, InlineKeyboardMarkup, TelegramClient, Update};

use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::TranscriptPipeline;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Pause before polling again after a failed getUpdates call.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Outbound side of a chat platform.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Send a message, returning its id.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64>;

    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str) -> Result<()>;

    /// Upload mp3 audio to a chat given by id or `@username`.
    async fn send_audio(&self, chat_id: &str, audio: Vec<u8>, caption: &str, title: &str)
        -> Result<()>;

    async fn get_chat(&self, chat_id: &str) -> Result<Chat>;
}

/// Run the bot until the process is stopped.
pub async fn run(settings: &Settings) -> Result<()> {
    let client = Arc::new(TelegramClient::new(&settings.telegram)?);
    let pipeline = Arc::new(TranscriptPipeline::new(settings)?);
    let handler = Arc::new(BotHandler::new(
        pipeline,
        client.clone(),
        &settings.telegram,
    ));

    let poll_timeout = settings.telegram.poll_timeout_secs;
    let mut offset = 0;
    info!("Bot started, polling for updates");

    loop {
        let updates = match client.get_updates(offset, poll_timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Polling failed");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let handler = handler.clone();
            tokio::spawn(async move { handler.handle_update(update).await });
        }
    }
}
