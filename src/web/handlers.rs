use super::pages::{self, IndexView};
use super::session::{HistoryEntry, Session};
use super::{status_for, AppState, RadioTranslation};
use crate::translation::{LanguageService, SummaryDepth, Voice, VoiceStyle};
use axum::extract::{Form, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

const EMPTY_URL_TEXT: &str = "Please enter a YouTube URL.";
const MIN_SUMMARY_CHARS: usize = 10;
const MIN_SPEECH_CHARS: usize = 2;
const PODCAST_CAPTION: &str = "Podcast generated from a YouTube video transcript";
const PODCAST_TITLE: &str = "YouTube podcast";
const CHAT_ID_HELP: &str = "To find a chat id: for a private chat, message @getmyid_bot with /start. \
For a group, add the bot to the group. For a channel, add the bot as an administrator and post a message.";

// === Request/Response Types ===

#[derive(Deserialize)]
pub(super) struct ProcessForm {
    #[serde(default)]
    youtube_url: String,
}

#[derive(Deserialize)]
pub(super) struct TextRequest {
    text: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct SpeechRequest {
    text: Option<String>,
    voice: Option<String>,
    style: Option<String>,
    chat_id: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ChatLookupRequest {
    username: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct RadioRequest {
    english: Option<String>,
    slovak: Option<String>,
    timestamp: Option<f64>,
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Serialize)]
struct ChatLookupResponse {
    success: bool,
    message: String,
    chat_id: i64,
    chat_type: String,
    chat_title: String,
}

#[derive(Serialize)]
struct FeedResponse {
    translations: Vec<RadioTranslation>,
    count: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn language(state: &AppState) -> Result<&Arc<dyn LanguageService>, Response> {
    state.pipeline.language().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Language features are not configured (OPENAI_API_KEY)",
        )
    })
}

/// Text of at least `min` characters after trimming.
fn required_text(text: Option<String>, min: usize, what: &str) -> Result<String, Response> {
    match text {
        None => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Missing text to {}.", what),
        )),
        Some(t) if t.trim().chars().count() < min => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Text is too short to {}.", what),
        )),
        Some(t) => Ok(t),
    }
}

// === Handlers ===

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(super) async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let history = state.sessions.history(&session.id);
    let html = pages::index_page(&IndexView {
        history: &history,
        ..Default::default()
    });
    session.attach(Html(html).into_response())
}

pub(super) async fn process(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ProcessForm>,
) -> Response {
    let session = Session::from_headers(&headers);
    let url = form.youtube_url.trim();
    if url.is_empty() {
        let history = state.sessions.history(&session.id);
        let html = pages::index_page(&IndexView {
            error: Some(EMPTY_URL_TEXT),
            history: &history,
            ..Default::default()
        });
        return session.attach((StatusCode::BAD_REQUEST, Html(html)).into_response());
    }

    let response = process_url(&state, &session, url).await;
    session.attach(response)
}

pub(super) async fn replay(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> Response {
    let session = Session::from_headers(&headers);
    let response = match state.sessions.find(&session.id, &video_id) {
        Some(entry) => process_url(&state, &session, &entry.url).await,
        None => {
            let history = state.sessions.history(&session.id);
            let html = pages::index_page(&IndexView {
                error: Some("History entry not found."),
                history: &history,
                ..Default::default()
            });
            (StatusCode::NOT_FOUND, Html(html)).into_response()
        }
    };
    session.attach(response)
}

/// Run the pipeline for `url` and render the form page with the outcome.
async fn process_url(state: &AppState, session: &Session, url: &str) -> Response {
    match state.pipeline.fetch(url).await {
        Ok(fetched) => {
            state.sessions.record(
                &session.id,
                HistoryEntry {
                    url: url.to_string(),
                    video_id: fetched.video_id.to_string(),
                    title: fetched.title.clone(),
                },
            );
            let history = state.sessions.history(&session.id);
            let html = pages::index_page(&IndexView {
                submitted_url: url,
                transcript: Some(fetched.text.as_str()),
                translated: fetched.translated,
                history: &history,
                ..Default::default()
            });
            Html(html).into_response()
        }
        Err(e) => {
            if e.is_user_error() {
                info!(url, error = %e, "Rejected input");
            } else {
                warn!(url, error = %e, "Processing failed");
            }
            let history = state.sessions.history(&session.id);
            let html = pages::index_page(&IndexView {
                submitted_url: url,
                error: Some(e.user_message()),
                history: &history,
                ..Default::default()
            });
            (status_for(&e), Html(html)).into_response()
        }
    }
}

pub(super) async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Response {
    summarize_with(&state, req, SummaryDepth::Short).await
}

pub(super) async fn detailed_summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Response {
    summarize_with(&state, req, SummaryDepth::Detailed).await
}

async fn summarize_with(state: &AppState, req: TextRequest, depth: SummaryDepth) -> Response {
    let text = match required_text(req.text, MIN_SUMMARY_CHARS, "summarize") {
        Ok(text) => text,
        Err(response) => return response,
    };

    let summary = state.pipeline.summarize(&text, depth).await;
    info!(
        ?depth,
        text_chars = text.chars().count(),
        summary_chars = summary.chars().count(),
        "Summary created"
    );
    Json(SummaryResponse { summary }).into_response()
}

pub(super) async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeechRequest>,
) -> Response {
    let text = match required_text(req.text, MIN_SPEECH_CHARS, "convert to speech") {
        Ok(text) => text,
        Err(response) => return response,
    };
    let language = match language(&state) {
        Ok(language) => language,
        Err(response) => return response,
    };

    let voice = Voice::parse_or_default(req.voice.as_deref());
    let style = VoiceStyle::parse_or(req.style.as_deref(), VoiceStyle::Slovak);

    match language.speak(&text, voice, style).await {
        Ok(audio) => {
            info!(%voice, %style, bytes = audio.len(), "Speech created");
            (
                [
                    (header::CONTENT_TYPE, "audio/mpeg"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"speech.mp3\""),
                ],
                audio,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Speech synthesis failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not create the audio recording.",
            )
        }
    }
}

pub(super) async fn send_podcast_to_telegram(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeechRequest>,
) -> Response {
    let text = match required_text(req.text, MIN_SPEECH_CHARS, "convert to speech") {
        Ok(text) => text,
        Err(response) => return response,
    };
    let language = match language(&state) {
        Ok(language) => language,
        Err(response) => return response,
    };
    let Some(telegram) = state.telegram.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Telegram is not configured (TELEGRAM_BOT_TOKEN)",
        );
    };
    let Some(chat_id) = req
        .chat_id
        .filter(|c| !c.trim().is_empty())
        .or_else(|| state.default_chat_id.clone())
    else {
        return error_response(StatusCode::BAD_REQUEST, "Missing chat_id.");
    };

    let voice = Voice::parse_or_default(req.voice.as_deref());
    let style = VoiceStyle::parse_or(req.style.as_deref(), VoiceStyle::Slovak);

    let audio = match language.speak(&text, voice, style).await {
        Ok(audio) => audio,
        Err(e) => {
            error!(error = %e, "Speech synthesis failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not create the audio recording.",
            );
        }
    };

    match telegram
        .send_audio(&chat_id, audio, PODCAST_CAPTION, PODCAST_TITLE)
        .await
    {
        Ok(()) => {
            info!(chat_id = %chat_id, "Podcast sent to Telegram");
            Json(serde_json::json!({
                "success": true,
                "message": "Podcast sent to Telegram",
            }))
            .into_response()
        }
        Err(e) => {
            error!(chat_id = %chat_id, error = %e, "Podcast upload failed");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": format!("Failed to send podcast: {}", e),
                })),
            )
                .into_response()
        }
    }
}

pub(super) async fn get_telegram_chat_id(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatLookupRequest>,
) -> Response {
    let Some(username) = req.username.map(|u| u.trim().to_string()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing username or group id.");
    };
    let username = username.trim_start_matches('@');
    if username.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Username must not be empty.");
    }
    let Some(telegram) = state.telegram.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Telegram is not configured (TELEGRAM_BOT_TOKEN)",
        );
    };

    // Numeric ids are tried as-is first, then everything as @username.
    let numeric = username.strip_prefix('-').unwrap_or(username);
    let by_id = if !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()) {
        telegram.get_chat(username).await.ok()
    } else {
        None
    };
    let lookup = match by_id {
        Some(chat) => Ok(chat),
        None => telegram.get_chat(&format!("@{}", username)).await,
    };

    match lookup {
        Ok(chat) => Json(ChatLookupResponse {
            success: true,
            message: "Chat ID found".to_string(),
            chat_id: chat.id,
            chat_type: chat.kind.clone(),
            chat_title: chat.display_name().to_string(),
        })
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": format!("Could not get chat id: {}", e),
                "help": CHAT_ID_HELP,
            })),
        )
            .into_response(),
    }
}

pub(super) async fn receive_translation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RadioRequest>,
) -> Response {
    let (Some(english), Some(slovak)) = (
        req.english.filter(|t| !t.trim().is_empty()),
        req.slovak.filter(|t| !t.trim().is_empty()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "status": "error",
                "message": "Missing required fields.",
            })),
        )
            .into_response();
    };

    let timestamp = req
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as f64 / 1000.0);
    info!(
        english = %english.chars().take(30).collect::<String>(),
        "Team radio translation received"
    );

    state
        .feed
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(RadioTranslation {
            english,
            slovak,
            timestamp,
        });

    Json(serde_json::json!({
        "status": "success",
        "message": "Translation received.",
    }))
    .into_response()
}

pub(super) async fn translations_page(State(state): State<Arc<AppState>>) -> Response {
    Html(pages::radio_page(&state.feed_snapshot())).into_response()
}

pub(super) async fn translations_json(State(state): State<Arc<AppState>>) -> Response {
    let translations = state.feed_snapshot();
    Json(FeedResponse {
        count: translations.len(),
        translations,
    })
    .into_response()
}
