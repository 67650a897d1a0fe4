//! Speak command implementation.

use super::with_spinner;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::TranscriptPipeline;
use crate::translation::{Voice, VoiceStyle};
use anyhow::{Context, Result};

/// Run the speak command.
pub async fn run_speak(
    url: &str,
    output: &str,
    voice: &str,
    style: &str,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Language, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'prepis doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let voice = Voice::parse_or_default(Some(voice));
    let style = VoiceStyle::parse_or(Some(style), VoiceStyle::Slovak);

    let pipeline = TranscriptPipeline::new(&settings)?;
    let language = pipeline
        .language()
        .cloned()
        .context("No language service configured")?;

    let fetched = with_spinner("Fetching transcript...", pipeline.fetch(url)).await?;
    if fetched.text.chars().count() > settings.openai.tts_max_chars {
        Output::warning(&format!(
            "Transcript is longer than {} characters; only the beginning will be voiced.",
            settings.openai.tts_max_chars
        ));
    }

    let audio = with_spinner(
        &format!("Synthesizing speech ({}, {})...", voice, style),
        language.speak(&fetched.text, voice, style),
    )
    .await?;

    let path = Settings::expand_path(output);
    std::fs::write(&path, &audio)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Output::success(&format!("Wrote {} bytes to {}", audio.len(), path.display()));

    Ok(())
}
