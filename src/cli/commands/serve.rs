//! HTTP server: transcript form, JSON helpers and the team-radio feed.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::web::{router, AppState};
use std::sync::Arc;

/// Run the HTTP server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Fetch, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'prepis doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState::new(&settings)?);
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Prepis Web Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Form", "GET  /");
    Output::kv("Process", "POST /process");
    Output::kv("Replay", "GET  /replay/{video_id}");
    Output::kv("Summarize", "POST /summarize, /detailed_summarize");
    Output::kv("Speech", "POST /text_to_speech");
    Output::kv("Podcast", "POST /send_podcast_to_telegram");
    Output::kv("Chat ID", "POST /get_telegram_chat_id");
    Output::kv("Team radio", "POST /f1translator/receive, GET /f1translations, GET /api/f1translations");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
