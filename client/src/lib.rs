//! # ToAgro Client - Library Root
//!
//! Client-side data layer of the ToAgro agricultural marketplace: typed
//! access to the backend REST API, a normalized state store with async
//! actions, a reconnecting real-time channel and durable key-value storage.
//! A view layer sits on top of this crate and only reads state and calls
//! actions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 view layer (not here)                │
//! └───────────────┬───────────────────────▲──────────────┘
//!        actions  │                       │ AppState / AppEvent
//! ┌───────────────▼───────────────────────┴──────────────┐
//! │  app::Store   slices + handlers + forms              │
//! ├──────────────────────────────────────────────────────┤
//! │  services::api       ApiClient (reqwest)             │
//! │  services::realtime  RealtimeChannel (tungstenite)   │
//! │  services::storage   ClientStorage (JSON file)       │
//! │  services::session   SessionHandle (watch channel)   │
//! └───────────────┬───────────────────────┬──────────────┘
//!                 │ HTTP                  │ WebSocket
//!                 ▼                       ▼
//!          backend REST API        socket broker
//! ```
//!
//! ## Module Structure
//!
//! - **[`app`]**: the store, its slices, async actions, form state
//! - **[`services`]**: HTTP adapter, socket channel, session, storage
//! - **[`core`]**: error taxonomy and the [`core::ApiService`] seam
//! - **[`routes`]**: route table and navigation gates
//! - **[`config`]**: environment configuration
//! - **[`debug`]**: tracing setup
//! - **[`utils`]**: validation and category-tree helpers
//!
//! ## Wiring
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use toagro_client::{ApiClient, ClientConfig, ClientStorage, SessionHandle, Store};
//!
//! # async fn demo() -> toagro_client::Result<()> {
//! let config = ClientConfig::from_env();
//! let session = SessionHandle::new();
//! let (events_tx, events_rx) = async_channel::unbounded();
//!
//! let api = ApiClient::new(&config, session.clone()).with_events(events_tx.clone());
//! let storage = ClientStorage::open(&config.storage_dir)?;
//! let store = Store::new(Arc::new(api), session, storage, events_tx);
//!
//! store.restore_session().await.ok();
//! while let Ok(event) = events_rx.recv().await {
//!     store.apply_event(&event);
//! }
//! # Ok(()) }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod routes;
pub mod services;
pub mod utils;

pub use app::{AppEvent, AppState, Store};
pub use config::ClientConfig;
pub use core::{ApiResult, AppError, ClassifiedError, Result};
pub use routes::{Navigation, Router, View};
pub use services::{ApiClient, ClientStorage, RealtimeChannel, Session, SessionHandle};
