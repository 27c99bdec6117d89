//! Logging configuration from environment variables

use std::path::PathBuf;

/// Logging system configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter (e.g., "toagro_client=debug,info")
    pub log_level: String,
    /// Log directory (daily rotation happens inside it)
    pub log_dir: PathBuf,
    /// File name prefix for the rolling log
    pub file_prefix: String,
    /// Write JSON lines instead of human-readable text
    pub json: bool,
    /// Mirror log output to stderr
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "toagro_client=info,warn".to_string(),
            log_dir: PathBuf::from("logs"),
            file_prefix: "toagro-client.log".to_string(),
            json: false,
            stderr: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: std::env::var("TOAGRO_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_prefix: defaults.file_prefix,
            json: flag("TOAGRO_LOG_JSON"),
            stderr: flag("TOAGRO_LOG_STDERR"),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

fn flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}
