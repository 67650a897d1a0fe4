//! Summarize command implementation.

use super::with_spinner;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::TranscriptPipeline;
use crate::translation::SummaryDepth;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(url: &str, detailed: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Language, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'prepis doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pipeline = TranscriptPipeline::new(&settings)?;
    let fetched = with_spinner("Fetching transcript...", pipeline.fetch(url)).await?;

    let depth = if detailed {
        SummaryDepth::Detailed
    } else {
        SummaryDepth::Short
    };
    let spinner = Output::spinner("Summarizing...");
    let summary = pipeline.summarize(&fetched.text, depth).await;
    spinner.finish_and_clear();

    Output::header(&fetched.title);
    println!("{}", summary);

    Ok(())
}
