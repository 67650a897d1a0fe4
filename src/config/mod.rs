//! Configuration module for Prepis.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, SummaryPrompts, TranslationPrompts};
pub use settings::{
    GeneralSettings, OpenAISettings, PromptSettings, ServerSettings, Settings, TelegramSettings,
    TranscriptApiSettings, TranslationSettings,
};
