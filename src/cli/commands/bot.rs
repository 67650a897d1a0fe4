//! Bot command implementation.

use crate::bot;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::openai::api_key_present;
use anyhow::Result;

/// Run the Telegram bot until interrupted.
pub async fn run_bot(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Bot, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'prepis doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::header("Prepis Telegram Bot");
    Output::kv("Max message length", &settings.telegram.max_message_length.to_string());
    Output::kv("Translation", if settings.translation.enabled { "on" } else { "off" });
    if !api_key_present() {
        Output::warning("OPENAI_API_KEY not set; the Summarize button will only apologise.");
    }
    Output::info("Press Ctrl+C to stop the bot.");

    tokio::select! {
        result = bot::run(&settings) => result?,
        _ = tokio::signal::ctrl_c() => Output::info("Stopping bot."),
    }

    Ok(())
}
