//! # Real-Time Module
//!
//! Server-pushed events over a single reconnecting WebSocket.

pub mod channel;
pub mod registry;

pub use channel::{ConnectionState, RealtimeChannel};
pub use registry::{Handler, SubscriberRegistry, Subscription};
