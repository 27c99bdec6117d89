//! # Services Module
//!
//! Everything that talks to the outside world: the REST API, the socket,
//! durable storage, and the session they share.

pub mod api;
pub mod realtime;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use realtime::{ConnectionState, RealtimeChannel, SubscriberRegistry, Subscription};
pub use session::{Session, SessionHandle};
pub use storage::{ClientStorage, FileBackend, MemoryBackend, Storage, StorageBackend};
