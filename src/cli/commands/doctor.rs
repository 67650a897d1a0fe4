//! Doctor command - verify tokens and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Prepis Doctor");
    println!();
    println!("Checking tokens and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Tokens").bold());
    let token_checks = vec![
        check_secret(
            "YOUTUBE_TRANSCRIPT_API_TOKEN",
            settings.transcript_token(),
            true,
            "Set with: export YOUTUBE_TRANSCRIPT_API_TOKEN='...'",
        ),
        check_secret(
            "TELEGRAM_BOT_TOKEN",
            settings.telegram_token(),
            false,
            "Needed for the bot and podcasts. Get one from @BotFather",
        ),
        check_openai_api_key(),
    ];
    for check in &token_checks {
        check.print();
    }
    checks.extend(token_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![
        check_config_file(config_path),
        check_settings(settings),
        check_prompts_dir(settings),
    ];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Prepis.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! Prepis is ready to use.");
    }

    Ok(())
}

/// First and last characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_secret(name: &str, value: Option<&str>, required: bool, hint: &str) -> CheckResult {
    match value {
        Some(secret) => CheckResult::ok(name, &format!("configured ({})", mask(secret))),
        None if required => CheckResult::error(name, "not set", hint),
        None => CheckResult::warning(name, "not set", hint),
    }
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    let hint = "Needed for translation, summaries and speech. Set with: export OPENAI_API_KEY='sk-...'";
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask(&key)))
        }
        Ok(key) if key.trim().is_empty() => CheckResult::warning("OPENAI_API_KEY", "empty", hint),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::warning("OPENAI_API_KEY", "not set", hint),
    }
}

fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override defaults", path.display()),
        )
    }
}

fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Settings",
            &format!(
                "messages up to {} chars, translation {}",
                settings.telegram.max_message_length,
                if settings.translation.enabled {
                    format!("into {}", settings.translation.target_language)
                } else {
                    "off".to_string()
                }
            ),
        ),
        Err(e) => CheckResult::error("Settings", &e.to_string(), "Fix the value in the config file"),
    }
}

fn check_prompts_dir(settings: &Settings) -> CheckResult {
    match &settings.prompts.custom_dir {
        None => CheckResult::ok("Prompts", "built-in"),
        Some(dir) => {
            let path = Settings::expand_path(dir);
            if path.is_dir() {
                CheckResult::ok("Prompts", &format!("custom ({})", path.display()))
            } else {
                CheckResult::warning(
                    "Prompts",
                    &format!("{} does not exist", path.display()),
                    "Built-in prompts will be used",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_mask_hides_secret() {
        assert_eq!(mask("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask("short"), "***");
    }

    #[test]
    fn test_missing_required_secret_is_error() {
        let result = check_secret("TOKEN", None, true, "set it");
        assert_eq!(result.status, CheckStatus::Error);
        let result = check_secret("TOKEN", None, false, "set it");
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_invalid_settings_reported() {
        let mut settings = Settings::default();
        settings.telegram.max_message_length = 0;
        assert_eq!(check_settings(&settings).status, CheckStatus::Error);
        assert_eq!(check_settings(&Settings::default()).status, CheckStatus::Ok);
    }
}
