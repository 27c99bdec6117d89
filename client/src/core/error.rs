//! # Common Error Types
//!
//! Consolidated error handling for the client library.
//!
//! Two layers of errors exist:
//!
//! - [`ClassifiedError`]: every failure of a REST call, decoded **once** at the
//!   HTTP adapter boundary into a closed taxonomy. Store actions turn it into a
//!   slice-level message with [`ClassifiedError::user_message`]; views never
//!   inspect raw status codes or payloads.
//! - [`AppError`]: failures outside the request/response path (configuration,
//!   durable storage, upload validation, the socket), plus any
//!   `ClassifiedError` that bubbles through them.
//!
//! ## Taxonomy
//!
//! | Variant       | Trigger                      | Code                 |
//! |---------------|------------------------------|----------------------|
//! | `Auth`        | 401                          | `UNAUTHORIZED`       |
//! | `Forbidden`   | 403                          | `FORBIDDEN`          |
//! | `NotFound`    | 404                          | `NOT_FOUND`          |
//! | `Validation`  | 422                          | `VALIDATION_ERROR`   |
//! | `Rejected`    | refused before sending       | `VALIDATION_ERROR`   |
//! | `RateLimited` | 429                          | `TOO_MANY_REQUESTS`  |
//! | `Server`      | 5xx                          | `SERVER_ERROR`       |
//! | `Network`     | no response reached us       | `NETWORK_ERROR`      |
//! | `Unknown`     | anything else                | server code or `UNKNOWN_ERROR` |
//!
//! ## Usage Pattern
//!
//! ```rust
//! use toagro_client::core::error::{classify, ClassifiedError};
//!
//! let err = classify(422, br#"{"message":"Bad email","errors":{"email":"taken"}}"#);
//! assert_eq!(err.code(), "VALIDATION_ERROR");
//! assert_eq!(err.user_message(), "Bad email");
//! ```

use std::collections::BTreeMap;

use shared::ErrorResponse;
use thiserror::Error;

/// A REST failure, classified independently of the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    /// 401: the credential is missing, expired or revoked. Triggers the
    /// global logout side effect in the adapter.
    #[error("unauthorized")]
    Auth,

    /// 403: authenticated, but not allowed to do this.
    #[error("forbidden")]
    Forbidden,

    /// 404
    #[error("not found")]
    NotFound,

    /// 422: the server rejected the payload. `fields` holds per-field
    /// messages when the payload carried them.
    #[error("validation failed: {}", .message.as_deref().unwrap_or("no details"))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, String>,
    },

    /// Input refused locally; no request was sent.
    #[error("rejected before sending: {message}")]
    Rejected {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// 429
    #[error("rate limited")]
    RateLimited,

    /// Any 5xx.
    #[error("server error ({status})")]
    Server { status: u16 },

    /// The request never produced a response (DNS, refused, timeout, TLS).
    #[error("network error: {detail}")]
    Network { detail: String },

    /// Everything else, including undecodable success bodies.
    #[error("unexpected error{}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Unknown {
        status: Option<u16>,
        code: Option<String>,
        message: Option<String>,
    },
}

impl ClassifiedError {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &str {
        match self {
            ClassifiedError::Auth => "UNAUTHORIZED",
            ClassifiedError::Forbidden => "FORBIDDEN",
            ClassifiedError::NotFound => "NOT_FOUND",
            ClassifiedError::Validation { .. } | ClassifiedError::Rejected { .. } => "VALIDATION_ERROR",
            ClassifiedError::RateLimited => "TOO_MANY_REQUESTS",
            ClassifiedError::Server { .. } => "SERVER_ERROR",
            ClassifiedError::Network { .. } => "NETWORK_ERROR",
            ClassifiedError::Unknown { code, .. } => code.as_deref().unwrap_or("UNKNOWN_ERROR"),
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClassifiedError::Auth => Some(401),
            ClassifiedError::Forbidden => Some(403),
            ClassifiedError::NotFound => Some(404),
            ClassifiedError::Validation { .. } => Some(422),
            ClassifiedError::RateLimited => Some(429),
            ClassifiedError::Server { status } => Some(*status),
            ClassifiedError::Rejected { .. } | ClassifiedError::Network { .. } => None,
            ClassifiedError::Unknown { status, .. } => *status,
        }
    }

    /// Localized text to render in an inline alert.
    pub fn user_message(&self) -> String {
        match self {
            ClassifiedError::Auth => "Сеанс закінчився. Будь ласка, увійдіть знову.".to_string(),
            ClassifiedError::Forbidden => "У вас немає прав для виконання цієї дії.".to_string(),
            ClassifiedError::NotFound => "Ресурс не знайдено.".to_string(),
            ClassifiedError::Validation { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Помилка валідації.".to_string()),
            ClassifiedError::Rejected { message, .. } => message.clone(),
            ClassifiedError::RateLimited => "Занадто багато запитів. Спробуйте пізніше.".to_string(),
            ClassifiedError::Server { .. } => "Серверна помилка. Спробуйте пізніше.".to_string(),
            ClassifiedError::Network { .. } => {
                "Немає відповіді від сервера. Перевірте підключення до Інтернету.".to_string()
            }
            ClassifiedError::Unknown { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Сталася помилка.".to_string()),
        }
    }

    /// Field-level messages of a validation failure; empty otherwise.
    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        static EMPTY: BTreeMap<String, String> = BTreeMap::new();
        match self {
            ClassifiedError::Validation { fields, .. } | ClassifiedError::Rejected { fields, .. } => fields,
            _ => &EMPTY,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClassifiedError::Auth)
    }
}

impl From<reqwest::Error> for ClassifiedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClassifiedError::Unknown {
                status: err.status().map(|s| s.as_u16()),
                code: None,
                message: None,
            };
        }
        match err.status() {
            Some(status) => classify(status.as_u16(), &[]),
            None => ClassifiedError::Network {
                detail: err.to_string(),
            },
        }
    }
}

/// Decode a non-success response into the taxonomy. `body` is the raw
/// response body; it is only inspected for `message`, `code` and `errors`.
pub fn classify(status: u16, body: &[u8]) -> ClassifiedError {
    let payload: ErrorResponse = serde_json::from_slice(body).unwrap_or_default();
    match status {
        401 => ClassifiedError::Auth,
        403 => ClassifiedError::Forbidden,
        404 => ClassifiedError::NotFound,
        422 => ClassifiedError::Validation {
            message: payload.message,
            fields: payload.errors.map(|e| e.into_map()).unwrap_or_default(),
        },
        429 => ClassifiedError::RateLimited,
        500..=599 => ClassifiedError::Server { status },
        _ => ClassifiedError::Unknown {
            status: Some(status),
            code: payload.code,
            message: payload.message,
        },
    }
}

/// Convenience alias used by every domain API function.
pub type ApiResult<T> = std::result::Result<T, ClassifiedError>;

/// Application-wide error type for everything outside a single REST call.
///
/// Each variant includes a descriptive message for context. The `#[error]`
/// attribute from `thiserror` provides `Display` and `Error`.
#[derive(Debug, Error)]
pub enum AppError {
    /// A classified REST failure.
    #[error("API error: {0}")]
    Api(#[from] ClassifiedError),

    /// Invalid configuration value (socket URL, environment name, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input rejected before reaching the network (upload limits, forms).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Real-time channel failure.
    #[error("Socket error: {0}")]
    Socket(String),
}

impl AppError {
    /// Text suitable for an inline alert.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(err) => err.user_message(),
            AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
