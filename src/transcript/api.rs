//! Client for the hosted transcript API.

use crate::config::TranscriptApiSettings;
use crate::error::{PrepisError, Result};
use crate::youtube::VideoId;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Source of raw transcript responses.
#[async_trait]
pub trait TranscriptApi: Send + Sync {
    /// Fetch the raw JSON response for one video.
    async fn fetch(&self, video_id: &VideoId) -> Result<serde_json::Value>;
}

/// youtube-transcript.io style API: `POST {"ids": [id]}` with Basic auth.
pub struct HttpTranscriptApi {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpTranscriptApi {
    pub fn new(settings: &TranscriptApiSettings) -> Result<Self> {
        let token = settings
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                PrepisError::Config(
                    "Transcript API token is not set (YOUTUBE_TRANSCRIPT_API_TOKEN)".to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            token,
        })
    }

    /// Token prefix safe to show in logs.
    fn token_hint(&self) -> String {
        let prefix: String = self.token.chars().take(5).collect();
        format!("{}...", prefix)
    }
}

#[async_trait]
impl TranscriptApi for HttpTranscriptApi {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch(&self, video_id: &VideoId) -> Result<serde_json::Value> {
        info!(token = %self.token_hint(), "Requesting transcript");

        let payload = serde_json::json!({ "ids": [video_id.as_str()] });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Basic {}", self.token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Transcript API unreachable");
                PrepisError::FetchFailed(format!("request failed: {}", e))
            })?;

        let status = response.status();
        debug!(status = %status, "Transcript API responded");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(500).collect();
            error!(status = %status, body = %preview, "Transcript API returned an error");
            return Err(PrepisError::FetchFailed(format!(
                "transcript API returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PrepisError::FetchFailed(format!("failed to read body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!(error = %e, body = %preview, "Transcript API returned malformed JSON");
            PrepisError::FetchFailed(format!("malformed response body: {}", e))
        })
    }
}
