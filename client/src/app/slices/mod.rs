//! # State Slices
//!
//! One slice per domain area. Slices are plain data with synchronous
//! reducers; every network round trip lives in `app::handlers`.

pub mod auth;
pub mod categories;
pub mod chat;
pub mod listings;
pub mod notifications;
pub mod payments;
pub mod ui;

pub use auth::AuthSlice;
pub use categories::CategoriesSlice;
pub use chat::ChatSlice;
pub use listings::ListingsSlice;
pub use notifications::NotificationsSlice;
pub use payments::PaymentsSlice;
pub use ui::{Theme, Toast, ToastKind, UiSlice};
