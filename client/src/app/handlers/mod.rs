//! # Store Actions
//!
//! Async actions organized by domain. Each module adds an `impl Store`
//! block; the request-state lens of its slice lives next to it.

pub mod auth;
pub mod categories;
pub mod chat;
pub mod listings;
pub mod notifications;
pub mod payments;
pub mod realtime;
pub mod ui;

use super::{AppState, RequestState, Store};

/// Slice whose request error can be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Auth,
    Listings,
    Categories,
    Chat,
    Notifications,
    Payments,
}

impl SliceKind {
    fn request(self, state: &mut AppState) -> &mut RequestState {
        match self {
            SliceKind::Auth => &mut state.auth.request,
            SliceKind::Listings => &mut state.listings.request,
            SliceKind::Categories => &mut state.categories.request,
            SliceKind::Chat => &mut state.chat.request,
            SliceKind::Notifications => &mut state.notifications.request,
            SliceKind::Payments => &mut state.payments.request,
        }
    }
}

impl Store {
    /// Dismiss the inline error of one slice.
    pub fn clear_error(&self, slice: SliceKind) {
        self.update(|s| slice.request(s).clear_error());
    }
}
