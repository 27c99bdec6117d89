//! # Logging
//!
//! Structured logging for the client library, built on `tracing`.
//!
//! ## Modules
//!
//! - **[`config`]**: [`LogConfig`] read from `RUST_LOG` / `TOAGRO_LOG_*`
//! - **[`logger`]**: subscriber setup with a daily-rolling file appender
//!
//! ## Usage
//!
//! ```rust,no_run
//! use toagro_client::debug::{logger, LogConfig};
//!
//! let _guard = logger::init(&LogConfig::from_env());
//! tracing::info!("client started");
//! ```

pub mod config;
pub mod logger;

pub use config::LogConfig;
