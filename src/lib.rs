//! Prepis - YouTube transcripts over Telegram, HTTP and the terminal
//!
//! Fetches video transcripts from a hosted transcript API and delivers them
//! in message-sized parts, optionally translated, summarized or voiced.
//!
//! # Overview
//!
//! Prepis allows you to:
//! - Extract video ids from any common YouTube link form
//! - Normalize transcript responses of several shapes into plain text
//! - Split long text at sentence and word boundaries under a size limit
//! - Serve transcripts through a Telegram bot, a web form or the CLI
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `youtube` - Video id extraction
//! - `transcript` - Transcript API client, response normalization and assembly
//! - `chunking` - Size-bounded text splitting
//! - `translation` - Translation, summaries and speech via OpenAI
//! - `pipeline` - Link to deliverable text
//! - `history` - Bounded newest-first lists
//! - `bot` - Telegram bot
//! - `web` - HTTP front end
//!
//! # Example
//!
//! ```rust,no_run
//! use prepis::config::Settings;
//! use prepis::pipeline::TranscriptPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = TranscriptPipeline::new(&settings)?;
//!
//!     let fetched = pipeline.fetch("https://youtu.be/dQw4w9WgXcQ").await?;
//!     for chunk in prepis::chunking::chunk_text(&fetched.text, 4000) {
//!         println!("{}", chunk.framed());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod openai;
pub mod pipeline;
pub mod transcript;
pub mod translation;
pub mod web;
pub mod youtube;

pub use error::{PrepisError, Result};
