//! CLI module for Prepis.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Prepis - YouTube transcripts over Telegram, HTTP and the terminal
///
/// Fetches a video's transcript from a hosted transcript API, splits it into
/// message-sized parts and optionally translates, summarizes or voices it.
/// The name comes from the Slovak word "prepis", a transcript.
#[derive(Parser, Debug)]
#[command(name = "prepis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check tokens and configuration
    Doctor,

    /// Fetch a video's transcript and print it in parts
    Fetch {
        /// YouTube URL
        url: String,

        /// Translate the transcript into the configured target language
        #[arg(short, long)]
        translate: bool,

        /// Maximum characters per printed part
        #[arg(short, long)]
        max_len: Option<usize>,
    },

    /// Summarize a video's transcript
    Summarize {
        /// YouTube URL
        url: String,

        /// Produce a longer, sectioned summary
        #[arg(short, long)]
        detailed: bool,
    },

    /// Voice a video's transcript into an mp3 file
    Speak {
        /// YouTube URL
        url: String,

        /// Output mp3 file
        #[arg(short, long)]
        output: String,

        /// Voice (alloy, echo, fable, onyx, nova, shimmer)
        #[arg(long, default_value = "alloy")]
        voice: String,

        /// Pronunciation style (default, slovak, clear, friendly, formal)
        #[arg(long, default_value = "slovak")]
        style: String,
    },

    /// Run the Telegram bot
    Bot,

    /// Start the web server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::parse_from([
            "prepis",
            "fetch",
            "https://youtu.be/dQw4w9WgXcQ",
            "--translate",
            "--max-len",
            "1000",
        ]);
        match cli.command {
            Commands::Fetch {
                url,
                translate,
                max_len,
            } => {
                assert_eq!(url, "https://youtu.be/dQw4w9WgXcQ");
                assert!(translate);
                assert_eq!(max_len, Some(1000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_speak_defaults() {
        let cli = Cli::parse_from(["prepis", "-vv", "speak", "https://youtu.be/x", "-o", "out.mp3"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Speak { voice, style, .. } => {
                assert_eq!(voice, "alloy");
                assert_eq!(style, "slovak");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["prepis", "serve", "--port", "8080"]);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                host: None,
                port: Some(8080)
            }
        ));
    }
}
