//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use askbox::OverlapPolicy;
use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub ask: AskConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repositories: default_repositories(),
            ui: UiConfig::default(),
            ask: AskConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_repositories() -> Vec<String> {
    vec![
        "junwen-k/use-ask".into(),
        "ratatui/ratatui".into(),
        "tokio-rs/tokio".into(),
        "serde-rs/serde".into(),
        "crossterm-rs/crossterm".into(),
    ]
}

/// UI appearance and behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default)]
    pub confirm: ConfirmDefaults,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            timestamp_format: default_timestamp_format(),
            confirm: ConfirmDefaults::default(),
        }
    }
}

/// Texts the confirm dialog uses when a question leaves them unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmDefaults {
    #[serde(default = "default_confirm_title")]
    pub title: String,
    #[serde(default = "default_action_text")]
    pub action_text: String,
    #[serde(default = "default_cancel_text")]
    pub cancel_text: String,
}

impl Default for ConfirmDefaults {
    fn default() -> Self {
        Self {
            title: default_confirm_title(),
            action_text: default_action_text(),
            cancel_text: default_cancel_text(),
        }
    }
}

/// Question store behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskConfig {
    /// What a new question does to one that is still outstanding.
    #[serde(default)]
    pub overlap: OverlapPolicy,
    /// Cancel unanswered questions after this many seconds. Unset or 0 waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Diagnostics and decision logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub log_decisions: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            level: default_level(),
            log_decisions: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_tick_rate_ms() -> u64 {
    250
}
fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}
fn default_confirm_title() -> String {
    "Are you sure?".to_string()
}
fn default_action_text() -> String {
    "Continue".to_string()
}
fn default_cancel_text() -> String {
    "Cancel".to_string()
}
fn default_log_dir() -> String {
    "~/.local/share/askbox/logs".to_string()
}
fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.repositories.len(), 5);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.ui.confirm.title, "Are you sure?");
        assert_eq!(config.ask.overlap, OverlapPolicy::Supersede);
        assert_eq!(config.ask.timeout_secs, None);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            repositories = ["a/b"]

            [ui.confirm]
            action_text = "Delete"

            [ask]
            overlap = "cancel_previous"
            timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.repositories, vec!["a/b"]);
        assert_eq!(config.ui.confirm.action_text, "Delete");
        assert_eq!(config.ui.confirm.cancel_text, "Cancel");
        assert_eq!(config.ask.overlap, OverlapPolicy::CancelPrevious);
        assert_eq!(config.ask.timeout_secs, Some(30));
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let parsed: Result<AppConfig, _> = toml::from_str("[ask]\noverlap = \"queue\"\n");
        assert!(parsed.is_err());
    }
}
