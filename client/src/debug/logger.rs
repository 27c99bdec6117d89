//! File-based logging initialization

use super::config::LogConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system
///
/// Sets up logging with:
/// - Daily log rotation inside `config.log_dir`
/// - Non-blocking writes so network callbacks never wait on disk
/// - Optional JSON output and stderr mirroring
///
/// Returns the appender guard; logs are flushed when it is dropped, so keep it
/// alive for the lifetime of the program. Returns `None` when the log
/// directory cannot be created or a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("toagro_client=info,warn"));

    let file_layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .boxed()
    };

    let stderr_layer = config
        .stderr
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(true).boxed());

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    if installed.is_err() {
        return None;
    }

    tracing::info!(
        log_dir = %config.log_dir.display(),
        log_level = %config.log_level,
        json = config.json,
        "Logging initialized"
    );

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let dir = std::env::temp_dir().join(format!("toagro-logs-{}", uuid::Uuid::new_v4()));
        let config = LogConfig {
            log_dir: dir.clone(),
            ..LogConfig::default()
        };

        let guard = init(&config);
        assert!(guard.is_some());
        assert!(dir.is_dir());
        assert!(init(&config).is_none());

        drop(guard);
        fs::remove_dir_all(&dir).ok();
    }
}
