//! # Application Events
//!
//! Events sent from the data layer to whoever drives the views. The HTTP
//! adapter and the real-time channel run inside async tasks and cannot touch
//! the view tree directly, so they publish here.

use crate::services::realtime::ConnectionState;

/// Path the client is sent to when the session ends.
pub const LOGIN_PATH: &str = "/login";
/// Path non-admins are sent to from admin routes.
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The server rejected the session credential (401); the session has
    /// already been cleared.
    SessionExpired,
    /// Navigate to the given path.
    Navigate(String),
    /// The real-time channel changed state.
    SocketStatus(ConnectionState),
}
