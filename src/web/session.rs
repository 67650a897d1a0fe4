//! Cookie-keyed, in-memory browsing history.

use crate::history::BoundedHistory;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use serde::Serialize;
use std::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "prepis_session";

/// Sessions kept before the least recently used one is forgotten.
const MAX_SESSIONS: usize = 1000;

/// One processed link in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub url: String,
    pub video_id: String,
    pub title: String,
}

/// The caller's session id, minted when the request carried none.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    fresh: bool,
}

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value).ok());

        match existing {
            Some(id) => Self {
                id: id.to_string(),
                fresh: false,
            },
            None => Self {
                id: Uuid::new_v4().to_string(),
                fresh: true,
            },
        }
    }

    /// Set the session cookie on `response` if it was just minted.
    pub fn attach(&self, mut response: Response) -> Response {
        if self.fresh {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

struct SessionHistory {
    id: String,
    entries: BoundedHistory<HistoryEntry>,
}

/// Per-session histories, bounded both per session and in session count.
pub struct SessionStore {
    sessions: Mutex<BoundedHistory<SessionHistory>>,
    history_limit: usize,
}

impl SessionStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            sessions: Mutex::new(BoundedHistory::new(MAX_SESSIONS)),
            history_limit,
        }
    }

    /// Entries for `session_id`, newest first.
    pub fn history(&self, session_id: &str) -> Vec<HistoryEntry> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .find(|s| s.id == session_id)
            .map(|s| s.entries.to_vec())
            .unwrap_or_default()
    }

    /// Record a processed link as the newest entry, replacing any entry for
    /// the same URL.
    pub fn record(&self, session_id: &str, entry: HistoryEntry) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let mut session = sessions
            .take(|s| s.id == session_id)
            .unwrap_or_else(|| SessionHistory {
                id: session_id.to_string(),
                entries: BoundedHistory::new(self.history_limit),
            });
        session.entries.push_unique(entry, |a, b| a.url == b.url);
        sessions.push(session);
    }

    /// Most recent entry for `video_id` in this session.
    pub fn find(&self, session_id: &str, video_id: &str) -> Option<HistoryEntry> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .find(|s| s.id == session_id)?
            .entries
            .find(|e| e.video_id == video_id)
            .cloned()
    }
}
