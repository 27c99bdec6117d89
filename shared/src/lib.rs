//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the marketplace front-end and the
//! backend API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API and socket communication
//!   - **[`dto::auth`]**: Sessions, login, registration, profile
//!   - **[`dto::listing`]**: Listings and listing search
//!   - **[`dto::category`]**: Category tree
//!   - **[`dto::chat`]**: Direct messages
//!   - **[`dto::notification`]**: Notifications and notification settings
//!   - **[`dto::payment`]**: Payments
//!   - **[`dto::pagination`]**: Page metadata
//!   - **[`dto::realtime`]**: WebSocket envelope
//! - **[`utils`]**: Locale-aware display helpers
//!
//! ## Wire Format
//!
//! - Field names are **camelCase** on the wire, **snake_case** in Rust
//! - Optional request fields are omitted when `None`
//! - Enums use the backend's UPPERCASE names (`PENDING`, `ADMIN`, ...)
//!
//! ## Usage
//!
//! ```ignore
//! use shared::dto::auth::{LoginRequest, AuthResponse};
//!
//! # async fn demo() -> Result<(), reqwest::Error> {
//! let request = LoginRequest {
//!     email: "a@b.com".to_string(),
//!     password: "Abcd1234".to_string(),
//! };
//!
//! let response: AuthResponse = reqwest::Client::new()
//!     .post("http://localhost:3000/api/auth/login")
//!     .json(&request)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! # Ok(()) }
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
