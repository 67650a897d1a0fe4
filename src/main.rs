//! Prepis CLI entry point.

use anyhow::Result;
use clap::Parser;
use prepis::cli::{commands, Cli, Commands};
use prepis::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(Settings::expand_path);

    // Doctor reports invalid values instead of refusing to start
    let settings = match &cli.command {
        Commands::Doctor => Settings::read_from(config_path.as_ref())?,
        _ => Settings::load_from(config_path.as_ref())?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("prepis={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match cli.command {
        Commands::Doctor => {
            let path = config_path.unwrap_or_else(Settings::default_config_path);
            commands::run_doctor(&settings, &path)?;
        }

        Commands::Fetch {
            url,
            translate,
            max_len,
        } => {
            commands::run_fetch(&url, translate, max_len, settings).await?;
        }

        Commands::Summarize { url, detailed } => {
            commands::run_summarize(&url, detailed, settings).await?;
        }

        Commands::Speak {
            url,
            output,
            voice,
            style,
        } => {
            commands::run_speak(&url, &output, &voice, &style, settings).await?;
        }

        Commands::Bot => {
            commands::run_bot(settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, config_path, settings)?;
        }
    }

    Ok(())
}
