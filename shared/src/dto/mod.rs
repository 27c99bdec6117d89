//! # Data Transfer Objects (DTOs)
//!
//! Wire types for every REST resource and the WebSocket envelope.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration, password flows, profile
//! - [`listing`] - Listings, filters, image upload result
//! - [`category`] - Categories and the category tree
//! - [`chat`] - Messages and conversations
//! - [`notification`] - Notifications, settings, preferences
//! - [`payment`] - Payments and their status machine
//! - [`pagination`] - Page metadata shared by list endpoints
//! - [`realtime`] - Socket envelope and event names
//!
//! ## Serialization Format
//!
//! The backend speaks camelCase JSON, so structs carry
//! `#[serde(rename_all = "camelCase")]`. Optional request fields are omitted
//! when `None`; optional response fields default when missing.

pub mod auth;
pub mod category;
pub mod chat;
pub mod listing;
pub mod notification;
pub mod pagination;
pub mod payment;
pub mod realtime;

pub use auth::*;
pub use category::*;
pub use chat::*;
pub use listing::*;
pub use notification::*;
pub use pagination::*;
pub use payment::*;
pub use realtime::*;
