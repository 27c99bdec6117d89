//! # Client Configuration
//!
//! Runtime configuration loaded from environment variables (and a `.env` file
//! when present). Every value is passive: it is read once at startup and only
//! checked for presence. Missing URLs fall back to local development defaults,
//! missing third-party keys stay `None`.
//!
//! ## Recognized Variables
//!
//! | Variable                  | Default                        |
//! |---------------------------|--------------------------------|
//! | `API_BASE_URL`            | `http://localhost:3000/api`    |
//! | `WS_BASE_URL`             | derived from `API_BASE_URL`    |
//! | `APP_TITLE`               | `ToAgro`                       |
//! | `APP_DESCRIPTION`         | marketplace tagline            |
//! | `APP_ENV`                 | `development`                  |
//! | `STRIPE_PUBLIC_KEY`       | -                              |
//! | `PAYPAL_CLIENT_ID`        | -                              |
//! | `GOOGLE_MAPS_API_KEY`     | -                              |
//! | `RECAPTCHA_SITE_KEY`      | -                              |
//! | `SENTRY_DSN`              | -                              |
//! | `ANALYTICS_ID`            | -                              |
//! | `REQUEST_TIMEOUT_SECS`    | `10`                           |
//! | `WS_RECONNECT_INTERVAL_MS`| `3000`                         |
//! | `STORAGE_DIR`             | `.toagro`                      |

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::core::error::{AppError, Result};

/// Currency used when a payment request does not name one.
pub const DEFAULT_CURRENCY: &str = "UAH";
/// Page size used when a list request does not name one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest page size the backend accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;
/// Prefix for every durable storage key.
pub const STORAGE_PREFIX: &str = "toagro";
/// Length of the recent-search history.
pub const RECENT_SEARCHES_LIMIT: usize = 10;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_APP_TITLE: &str = "ToAgro";
const DEFAULT_APP_DESCRIPTION: &str =
    "Аграрний маркетплейс для купівлі і продажі сільськогосподарської продукції та обладнання";

/// Deployment environment name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::Config(format!("unknown environment '{other}'"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        })
    }
}

/// Public keys and ids for services the client talks to directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThirdPartyKeys {
    pub payment_public_key: Option<String>,
    pub paypal_client_id: Option<String>,
    pub maps_api_key: Option<String>,
    pub captcha_site_key: Option<String>,
    pub error_tracking_dsn: Option<String>,
    pub analytics_id: Option<String>,
}

/// Limits applied to image uploads before any bytes leave the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size: usize,
    pub accepted_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 5,
            max_file_size: 5 * 1024 * 1024,
            accepted_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every REST path is appended to (no trailing slash).
    pub api_base_url: String,
    /// Base URL of the socket endpoint (no trailing slash).
    pub ws_base_url: String,
    pub app_title: String,
    pub app_description: String,
    pub environment: Environment,
    pub third_party: ThirdPartyKeys,
    pub request_timeout: Duration,
    /// Fixed delay between socket reconnect attempts.
    pub reconnect_interval: Duration,
    pub uploads: UploadLimits,
    /// Directory holding the persistent storage file.
    pub storage_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_api_base(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    /// Defaults pointed at a specific API; the socket URL is derived from it.
    pub fn with_api_base(api_base_url: &str) -> Self {
        let api_base_url = api_base_url.trim_end_matches('/').to_string();
        Self {
            ws_base_url: derive_ws_url(&api_base_url),
            api_base_url,
            app_title: DEFAULT_APP_TITLE.to_string(),
            app_description: DEFAULT_APP_DESCRIPTION.to_string(),
            environment: Environment::Development,
            third_party: ThirdPartyKeys::default(),
            request_timeout: Duration::from_secs(10),
            reconnect_interval: Duration::from_millis(3000),
            uploads: UploadLimits::default(),
            storage_dir: PathBuf::from(".toagro"),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let mut config = Self::with_api_base(&api_base_url);

        if let Ok(ws) = env::var("WS_BASE_URL") {
            config.ws_base_url = ws.trim_end_matches('/').to_string();
        }
        if let Ok(title) = env::var("APP_TITLE") {
            config.app_title = title;
        }
        if let Ok(description) = env::var("APP_DESCRIPTION") {
            config.app_description = description;
        }
        if let Ok(raw) = env::var("APP_ENV") {
            config.environment = raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to development environment");
                Environment::Development
            });
        }

        config.third_party = ThirdPartyKeys {
            payment_public_key: optional_env("STRIPE_PUBLIC_KEY"),
            paypal_client_id: optional_env("PAYPAL_CLIENT_ID"),
            maps_api_key: optional_env("GOOGLE_MAPS_API_KEY"),
            captcha_site_key: optional_env("RECAPTCHA_SITE_KEY"),
            error_tracking_dsn: optional_env("SENTRY_DSN"),
            analytics_id: optional_env("ANALYTICS_ID"),
        };

        if let Some(secs) = parsed_env::<u64>("REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parsed_env::<u64>("WS_RECONNECT_INTERVAL_MS") {
            config.reconnect_interval = Duration::from_millis(ms);
        }
        if let Ok(dir) = env::var("STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }

        tracing::debug!(
            api = %config.api_base_url,
            ws = %config.ws_base_url,
            environment = %config.environment,
            "Client configuration loaded"
        );
        config
    }

    /// Absolute URL for a REST path such as `/listings/7`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Socket URL: `<ws_base><namespace>?token=<token>`.
    pub fn ws_url_for(&self, namespace: &str, token: Option<&str>) -> Result<Url> {
        let raw = format!("{}{}", self.ws_base_url, namespace);
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::Config(format!("invalid socket url '{raw}': {e}")))?;
        if let Some(token) = token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// `http://host/api` -> `ws://host/ws`, `https://...` -> `wss://...`.
fn derive_ws_url(api_base_url: &str) -> String {
    match Url::parse(api_base_url) {
        Ok(url) => {
            let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
            // set_scheme refuses http -> ws, so rebuild from parts
            let host = url.host_str().unwrap_or("localhost");
            let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
            format!("{scheme}://{host}{port}/ws")
        }
        Err(_) => api_base_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1),
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_env<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparsable value");
            None
        }
    }
}
