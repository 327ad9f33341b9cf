//! Diagnostics and decision logging to disk.
//!
//! The terminal is in raw mode while the app runs, so `tracing` output goes to
//! `askbox.log` in the configured log directory (default:
//! `~/.local/share/askbox/logs/`). Answered questions are additionally written
//! to daily `decisions_<date>.log` files.

use crate::app::event::{Decision, Verdict};
use crate::config::model::LoggingConfig;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

/// Expand a leading `~` to the home directory.
fn expand_dir(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(dir)
}

/// Install the global `tracing` subscriber. No-op unless logging is enabled.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }
    let level = tracing::Level::from_str(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let log_dir = expand_dir(&config.log_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let path = log_dir.join("askbox.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;
    tracing::info!(path = %path.display(), %level, "logging started");
    Ok(())
}

/// Format one decision as a log line (without timestamp).
pub fn format_decision(decision: &Decision) -> String {
    let verdict = match &decision.verdict {
        Verdict::Confirmed => "confirmed".to_string(),
        Verdict::Renamed(name) => format!("renamed to {}", name),
        Verdict::Declined(Some(reason)) => format!("declined ({})", reason),
        Verdict::Declined(None) => "declined".to_string(),
    };
    format!("[{}] {} {}", decision.dialog.label(), decision.repository, verdict)
}

/// Appends answered questions to daily log files.
///
/// The file handle for the current day is cached. Falls back to dropping lines
/// if the log file cannot be created.
pub struct DecisionLog {
    enabled: bool,
    log_dir: PathBuf,
    timestamp_format: String,
    current: Option<(String, fs::File)>,
}

impl DecisionLog {
    pub fn new(config: &LoggingConfig, timestamp_format: &str) -> Self {
        Self {
            enabled: config.enabled && config.log_decisions,
            log_dir: expand_dir(&config.log_dir),
            timestamp_format: timestamp_format.to_string(),
            current: None,
        }
    }

    pub fn log_decision(&mut self, decision: &Decision) {
        if !self.enabled {
            return;
        }

        let now = chrono::Local::now();
        let filename = format!("decisions_{}.log", now.format("%Y-%m-%d"));
        if self.current.as_ref().map(|(name, _)| name) != Some(&filename) {
            let _ = fs::create_dir_all(&self.log_dir);
            let path = self.log_dir.join(&filename);
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => self.current = Some((filename, file)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot open decision log");
                    self.current = None;
                    return;
                }
            }
        }

        if let Some((_, file)) = self.current.as_mut() {
            let line = format!("[{}] {}", now.format(&self.timestamp_format), format_decision(decision));
            let _ = writeln!(file, "{}", line);
        }
    }
}
