//! Minimal Telegram Bot API client.

use super::ChatSink;
use crate::config::TelegramSettings;
use crate::error::{PrepisError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Incoming update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

impl Chat {
    /// Group title, or the user's first name for private chats.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardMarkup {
    /// A keyboard with a single button.
    pub fn single(text: &str, callback_data: &str) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: text.to_string(),
                callback_data: callback_data.to_string(),
            }]],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Bot API client over reqwest.
pub struct TelegramClient {
    client: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(settings: &TelegramSettings) -> Result<Self> {
        let token = settings
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                PrepisError::Config("Telegram bot token is not set (TELEGRAM_BOT_TOKEN)".to_string())
            })?;

        // Long polls hold the connection open for poll_timeout_secs.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.poll_timeout_secs + 30))
            .build()?;

        Ok(Self {
            client,
            base: format!("{}/bot{}", settings.api_base.trim_end_matches('/'), token),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: serde_json::Value) -> Result<T> {
        let response = self
            .client
            .post(self.url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| PrepisError::Telegram(format!("{} failed: {}", method, e.without_url())))?;

        Self::parse(method, response).await
    }

    async fn parse<T: DeserializeOwned>(method: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body: ApiResponse<T> = response.json().await.map_err(|e| {
            PrepisError::Telegram(format!("{} returned an unreadable body: {}", method, e.without_url()))
        })?;

        match (body.ok, body.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(PrepisError::Telegram(format!(
                "{} failed ({}): {}",
                method,
                status,
                body.description.unwrap_or_else(|| "unknown error".to_string())
            ))),
        }
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = markup {
            body["reply_markup"] = serde_json::to_value(markup)?;
        }
        self.call("sendMessage", body).await
    }

    pub async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<()> {
        let _: bool = self
            .call("answerCallbackQuery", json!({ "callback_query_id": callback_id }))
            .await?;
        Ok(())
    }

    /// Upload an mp3 as an audio message.
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn send_audio(
        &self,
        chat_id: &str,
        audio: Vec<u8>,
        caption: &str,
        title: &str,
    ) -> Result<Message> {
        let part = Part::bytes(audio)
            .file_name("podcast.mp3")
            .mime_str("audio/mpeg")?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .text("title", title.to_string())
            .part("audio", part);

        let response = self
            .client
            .post(self.url("sendAudio"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PrepisError::Telegram(format!("sendAudio failed: {}", e.without_url())))?;

        debug!(status = %response.status(), "sendAudio responded");
        Self::parse("sendAudio", response).await
    }

    /// Look up a chat by numeric id or `@username`.
    pub async fn get_chat(&self, chat_id: &str) -> Result<Chat> {
        self.call("getChat", json!({ "chat_id": chat_id })).await
    }
}

#[async_trait]
impl ChatSink for TelegramClient {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64> {
        Ok(self.send_message(chat_id, text, markup).await?.message_id)
    }

    async fn edit_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        self.edit_message_text(chat_id, message_id, text).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.answer_callback_query(callback_id).await
    }

    async fn send_audio(&self, chat_id: &str, audio: Vec<u8>, caption: &str, title: &str) -> Result<()> {
        TelegramClient::send_audio(self, chat_id, audio, caption, title).await?;
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Chat> {
        TelegramClient::get_chat(self, chat_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_deserializes() {
        let raw = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "chat": {"id": -100123, "type": "group", "title": "Team"},
                "text": "https://youtu.be/dQw4w9WgXcQ"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(update.update_id, 42);
        assert_eq!(message.chat.id, -100123);
        assert_eq!(message.chat.display_name(), "Team");
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_callback_deserializes() {
        let raw = r#"{
            "update_id": 43,
            "callback_query": {
                "id": "abc",
                "from": {"id": 1, "is_bot": false, "first_name": "A"},
                "message": {"message_id": 8, "chat": {"id": 5, "type": "private", "first_name": "A"}},
                "data": "summarize_dQw4w9WgXcQ"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("summarize_dQw4w9WgXcQ"));
        assert_eq!(query.message.unwrap().chat.display_name(), "A");
    }

    #[test]
    fn test_keyboard_serializes() {
        let markup = InlineKeyboardMarkup::single("Summarize", "summarize_x");
        let value = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            value,
            json!({"inline_keyboard": [[{"text": "Summarize", "callback_data": "summarize_x"}]]})
        );
    }

    #[test]
    fn test_missing_token_rejected() {
        let settings = TelegramSettings::default();
        assert!(matches!(
            TelegramClient::new(&settings),
            Err(PrepisError::Config(_))
        ));
    }
}
