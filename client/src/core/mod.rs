//! # Core Module
//!
//! Error taxonomy and the service trait the store depends on.

pub mod error;
pub mod service;

pub use error::{classify, ApiResult, AppError, ClassifiedError, Result};
pub use service::ApiService;
