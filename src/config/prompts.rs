//! Prompt templates for Prepis.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub translation: TranslationPrompts,
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for transcript translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationPrompts {
    pub system: String,
    pub user: String,
}

impl Default for TranslationPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a translator specialising in translation from {{source_language}} to {{target_language}}. The translation must read fluently and keep the meaning and style of the original.

IMPORTANT: Start your answer directly with the translation. Never add introductory phrases or pleasantries such as "Sure", "Here is the translation" or "Translation:"."#
                .to_string(),

            user: r#"Translate the following text from {{source_language}} to {{target_language}}. Only the translation, no extra explanations or introductions:

{{text}}"#
                .to_string(),
        }
    }
}

/// Prompts for short and detailed summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
    pub user: String,
    pub detailed_system: String,
    pub detailed_user: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an assistant specialising in summarising texts. Write a concise, informative summary of the provided text in {{target_language}}. Keep the key ideas, facts and main points.

IMPORTANT: Start your answer directly with the summary, without introductory phrases such as "Sure", "Here is the summary" or "Summary:"."#
                .to_string(),

            user: r#"Summarise the following text in {{target_language}} without any introductory phrases:

{{text}}"#
                .to_string(),

            detailed_system: r#"You are an assistant specialising in detailed summaries. Write a comprehensive, informative and detailed summary of the provided text in {{target_language}}. Keep all important details, key ideas, facts and main points. Split the text into thematic sections with subheadings where it helps.

IMPORTANT: Start your answer directly with the summary, without introductory phrases such as "Sure", "Here is the summary" or "Summary:"."#
                .to_string(),

            detailed_user: r#"Write a detailed summary of the following text in {{target_language}} without any introductory phrases. The summary should be thorough and capture as much relevant information as possible:

{{text}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let translation_path = custom_path.join("translation.toml");
            if translation_path.exists() {
                let content = std::fs::read_to_string(&translation_path)?;
                prompts.translation = toml::from_str(&content)?;
            }

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
