//! Fetch command implementation.

use super::with_spinner;
use crate::chunking::chunk_text;
use crate::cli::output::format_duration;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::TranscriptPipeline;
use anyhow::Result;

/// Run the fetch command.
pub async fn run_fetch(
    url: &str,
    translate: bool,
    max_len: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let operation = if translate {
        Operation::Language
    } else {
        Operation::Fetch
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'prepis doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pipeline =
        TranscriptPipeline::new(&settings)?.with_translation(translate || settings.translation.enabled);
    let fetched = with_spinner("Fetching transcript...", pipeline.fetch(url)).await?;

    let max_len = max_len.unwrap_or(settings.telegram.max_message_length);
    let chunks = chunk_text(&fetched.text, max_len);

    Output::header(&fetched.title);
    Output::kv("Video", &fetched.video_id.watch_url());
    Output::kv("Segments", &fetched.segment_count.to_string());
    if let Some(duration) = fetched.duration_seconds {
        Output::kv("Duration", &format_duration(duration));
    }
    Output::kv("Characters", &fetched.text.chars().count().to_string());
    Output::kv("Parts", &chunks.len().to_string());
    if translate && !fetched.translated {
        Output::warning("Translation failed, showing the original transcript.");
    }

    for chunk in &chunks {
        Output::chunk(chunk);
    }

    Ok(())
}
