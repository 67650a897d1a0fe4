//! Message and callback handling for the bot.

use super::telegram::{CallbackQuery, InlineKeyboardMarkup, Update};
use super::ChatSink;
use crate::chunking::{chunk_framed, chunk_text};
use crate::config::TelegramSettings;
use crate::error::{PrepisError, Result};
use crate::history::BoundedHistory;
use crate::pipeline::{FetchedTranscript, TranscriptPipeline};
use crate::translation::SummaryDepth;
use crate::youtube::looks_like_youtube_url;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const SUMMARIZE_PREFIX: &str = "summarize_";
const SUMMARIZE_BUTTON: &str = "📝 Summarize";

const START_TEXT: &str = "Hi! Send me a YouTube link and I will reply with the video's transcript.";
const HELP_TEXT: &str = "Send a YouTube link (youtube.com or youtu.be) and I will fetch its transcript.\n\nLong transcripts arrive in several parts. Tap \"Summarize\" under the last part to get a short summary.";
const FETCHING_TEXT: &str = "Fetching the transcript, please wait...";
const SENDING_TEXT: &str = "Transcript fetched, sending the text...";
const SUMMARIZING_TEXT: &str = "Summarizing the transcript, please wait...";
const SUMMARY_LONG_TEXT: &str = "The summary is long, sending it as new messages...";
const NO_TRANSCRIPT_TEXT: &str = "I no longer have the transcript for this video. Please send the link again.";

/// Chats whose transcripts are remembered before the least recently active
/// one is forgotten.
const MAX_CACHED_CHATS: usize = 1000;

#[derive(Debug, Clone)]
struct CachedTranscript {
    video_id: String,
    text: String,
}

#[derive(Clone)]
struct ChatCache {
    chat_id: i64,
    transcripts: BoundedHistory<CachedTranscript>,
}

/// Handles bot updates against a [`ChatSink`].
pub struct BotHandler {
    pipeline: Arc<TranscriptPipeline>,
    sink: Arc<dyn ChatSink>,
    cache: Mutex<BoundedHistory<ChatCache>>,
    cache_size: usize,
    max_message_length: usize,
    message_delay: Duration,
}

impl BotHandler {
    pub fn new(
        pipeline: Arc<TranscriptPipeline>,
        sink: Arc<dyn ChatSink>,
        settings: &TelegramSettings,
    ) -> Self {
        Self {
            pipeline,
            sink,
            cache: Mutex::new(BoundedHistory::new(MAX_CACHED_CHATS)),
            cache_size: settings.transcript_cache_size,
            max_message_length: settings.max_message_length,
            message_delay: Duration::from_millis(settings.message_delay_ms),
        }
    }

    /// Dispatch one update. Errors are logged, never propagated.
    pub async fn handle_update(&self, update: Update) {
        let result = if let Some(query) = update.callback_query {
            self.handle_callback(query).await
        } else if let Some(message) = update.message {
            match message.text {
                Some(text) => self.handle_text(message.chat.id, &text).await,
                None => Ok(()),
            }
        } else {
            Ok(())
        };

        if let Err(e) = result {
            error!(update_id = update.update_id, error = %e, "Failed to handle update");
        }
    }

    /// Handle a text message: commands, then YouTube links.
    pub async fn handle_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let text = text.trim();
        match command(text) {
            Some("start") => return self.sink.send_text(chat_id, START_TEXT, None).await.map(drop),
            Some("help") => return self.sink.send_text(chat_id, HELP_TEXT, None).await.map(drop),
            Some(_) => return Ok(()),
            None => {}
        }

        if !looks_like_youtube_url(text) {
            return Ok(());
        }
        self.process_url(chat_id, text).await
    }

    #[instrument(skip(self, text))]
    async fn process_url(&self, chat_id: i64, text: &str) -> Result<()> {
        let video_id = match self.pipeline.resolve(text) {
            Ok(id) => id,
            Err(e) => return self.report(chat_id, &e).await,
        };

        self.sink.send_text(chat_id, FETCHING_TEXT, None).await?;

        let fetched = match self.pipeline.fetch_id(video_id).await {
            Ok(fetched) => fetched,
            Err(e) => return self.report(chat_id, &e).await,
        };

        self.remember(chat_id, &fetched);
        self.sink.send_text(chat_id, SENDING_TEXT, None).await?;
        self.deliver(chat_id, &fetched).await
    }

    async fn report(&self, chat_id: i64, err: &PrepisError) -> Result<()> {
        warn!(chat_id, error = %err, "Request failed");
        self.sink.send_text(chat_id, err.user_message(), None).await.map(drop)
    }

    fn remember(&self, chat_id: i64, fetched: &FetchedTranscript) {
        let entry = CachedTranscript {
            video_id: fetched.video_id.to_string(),
            text: fetched.text.clone(),
        };
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let mut chat = cache
            .take(|c| c.chat_id == chat_id)
            .unwrap_or_else(|| ChatCache {
                chat_id,
                transcripts: BoundedHistory::new(self.cache_size),
            });
        chat.transcripts.push_unique(entry, |a, b| a.video_id == b.video_id);
        cache.push(chat);
    }

    fn cached_text(&self, chat_id: i64, video_id: &str) -> Option<String> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .find(|c| c.chat_id == chat_id)?
            .transcripts
            .find(|entry| entry.video_id == video_id)
            .map(|entry| entry.text.clone())
    }

    /// Send the transcript, in framed parts when it exceeds the message limit.
    async fn deliver(&self, chat_id: i64, fetched: &FetchedTranscript) -> Result<()> {
        let chunks = chunk_framed(&fetched.text, self.max_message_length);
        let keyboard = InlineKeyboardMarkup::single(
            SUMMARIZE_BUTTON,
            &format!("{}{}", SUMMARIZE_PREFIX, fetched.video_id),
        );

        if chunks.len() > 1 {
            let notice = format!(
                "The transcript is long ({} characters), sending it in parts.",
                fetched.text.chars().count()
            );
            self.sink.send_text(chat_id, &notice, None).await?;
        }

        for chunk in &chunks {
            let markup = chunk.is_last().then_some(&keyboard);
            if let Err(e) = self.sink.send_text(chat_id, &chunk.framed(), markup).await {
                error!(part = chunk.index + 1, error = %e, "Failed to send transcript part");
                let notice = format!(
                    "Failed to send part {}. Try a shorter video.",
                    chunk.index + 1
                );
                return self.sink.send_text(chat_id, &notice, None).await.map(drop);
            }
            if !chunk.is_last() && !self.message_delay.is_zero() {
                tokio::time::sleep(self.message_delay).await;
            }
        }

        info!(chat_id, parts = chunks.len(), "Transcript delivered");
        Ok(())
    }

    /// Handle an inline button press.
    pub async fn handle_callback(&self, query: CallbackQuery) -> Result<()> {
        self.sink.answer_callback(&query.id).await?;

        let Some(video_id) = query
            .data
            .as_deref()
            .and_then(|d| d.strip_prefix(SUMMARIZE_PREFIX))
        else {
            return Ok(());
        };
        let Some(chat_id) = query.message.as_ref().map(|m| m.chat.id) else {
            return Ok(());
        };

        let Some(text) = self.cached_text(chat_id, video_id) else {
            return self.sink.send_text(chat_id, NO_TRANSCRIPT_TEXT, None).await.map(drop);
        };

        let notice_id = self.sink.send_text(chat_id, SUMMARIZING_TEXT, None).await?;
        let summary = self.pipeline.summarize(&text, SummaryDepth::Short).await;
        let message = format!("📝 Summary:\n\n{}", summary);

        if message.chars().count() <= self.max_message_length {
            return self.sink.edit_text(chat_id, notice_id, &message).await;
        }

        self.sink.edit_text(chat_id, notice_id, SUMMARY_LONG_TEXT).await?;
        for chunk in chunk_text(&summary, self.max_message_length) {
            self.sink.send_text(chat_id, &chunk.content, None).await?;
            if !chunk.is_last() && !self.message_delay.is_zero() {
                tokio::time::sleep(self.message_delay).await;
            }
        }
        Ok(())
    }
}

/// Command name of a `/command` or `/command@botname` message.
fn command(text: &str) -> Option<&str> {
    let first = text.strip_prefix('/')?.split_whitespace().next()?;
    Some(first.split('@').next().unwrap_or(first))
}
