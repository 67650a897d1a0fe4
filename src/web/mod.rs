//! Web front end: transcript form, JSON helpers and the team-radio feed.

mod handlers;
pub mod pages;
pub mod session;

use crate::bot::{ChatSink, TelegramClient};
use crate::config::Settings;
use crate::error::{PrepisError, Result};
use crate::history::BoundedHistory;
use crate::pipeline::TranscriptPipeline;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use session::SessionStore;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// A translated team-radio message pushed by an external translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioTranslation {
    pub english: String,
    pub slovak: String,
    /// Unix seconds.
    pub timestamp: f64,
}

/// Shared application state.
pub struct AppState {
    pub pipeline: TranscriptPipeline,
    pub telegram: Option<Arc<dyn ChatSink>>,
    pub default_chat_id: Option<String>,
    pub sessions: SessionStore,
    pub feed: Mutex<BoundedHistory<RadioTranslation>>,
}

impl AppState {
    /// Build state from settings. Telegram features are disabled without a bot token.
    pub fn new(settings: &Settings) -> Result<Self> {
        let pipeline = TranscriptPipeline::new(settings)?;
        let telegram: Option<Arc<dyn ChatSink>> = match TelegramClient::new(&settings.telegram) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "Telegram features disabled");
                None
            }
        };
        Ok(Self::with_components(pipeline, telegram, settings))
    }

    /// Build state with custom components.
    pub fn with_components(
        pipeline: TranscriptPipeline,
        telegram: Option<Arc<dyn ChatSink>>,
        settings: &Settings,
    ) -> Self {
        Self {
            pipeline,
            telegram,
            default_chat_id: settings.telegram.default_chat_id.clone(),
            sessions: SessionStore::new(settings.server.history_limit),
            feed: Mutex::new(BoundedHistory::new(settings.server.feed_capacity)),
        }
    }

    pub fn feed_snapshot(&self) -> Vec<RadioTranslation> {
        self.feed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .to_vec()
    }
}

/// All routes, with permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/process", post(handlers::process))
        .route("/replay/{video_id}", get(handlers::replay))
        .route("/summarize", post(handlers::summarize))
        .route("/detailed_summarize", post(handlers::detailed_summarize))
        .route("/text_to_speech", post(handlers::text_to_speech))
        .route("/send_podcast_to_telegram", post(handlers::send_podcast_to_telegram))
        .route("/get_telegram_chat_id", post(handlers::get_telegram_chat_id))
        .route("/f1translator/receive", post(handlers::receive_translation))
        .route("/f1translations", get(handlers::translations_page))
        .route("/api/f1translations", get(handlers::translations_json))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// HTTP status for a pipeline error.
pub fn status_for(err: &PrepisError) -> StatusCode {
    match err {
        PrepisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PrepisError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
        PrepisError::EmptyTranscript(_) | PrepisError::UnreadableTranscript(_) => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
