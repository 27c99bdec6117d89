//! # Backend API Client Module
//!
//! HTTP client for the marketplace REST API.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs           - Module exports
//! ├── client.rs        - ApiClient: credential, error classification, 401 logout
//! ├── upload.rs        - In-memory images and upload limits
//! ├── auth.rs          - /auth/*
//! ├── listings.rs      - /listings*
//! ├── categories.rs    - /categories*
//! ├── chat.rs          - /chat/*
//! ├── notifications.rs - /notifications/*
//! └── payments.rs      - /transactions*
//! ```

pub mod auth;
pub mod categories;
pub mod chat;
pub mod client;
pub mod listings;
pub mod notifications;
pub mod payments;
pub mod upload;

pub use client::ApiClient;
pub use upload::{validate_uploads, ImageUpload};
