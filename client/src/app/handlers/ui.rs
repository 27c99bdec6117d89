//! # UI Actions
//!
//! Synchronous reducers for the UI slice. Theme changes are persisted.

use crate::app::slices::ui::{Theme, ToastKind};
use crate::app::Store;

impl Store {
    pub fn toggle_theme(&self) -> Theme {
        let theme = self.update(|s| s.ui.toggle_theme());
        self.storage().set_theme(theme);
        theme
    }

    pub fn set_theme(&self, theme: Theme) {
        self.update(|s| s.ui.set_theme(theme));
        self.storage().set_theme(theme);
    }

    pub fn toggle_sidebar(&self) {
        self.update(|s| s.ui.toggle_sidebar());
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.update(|s| s.ui.set_sidebar_open(open));
    }

    pub fn push_toast(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        self.update(|s| s.ui.push_toast(kind, message))
    }

    pub fn dismiss_toast(&self, id: u64) -> bool {
        self.update(|s| s.ui.dismiss_toast(id))
    }

    /// Remember a search query; returns the updated history, newest first.
    pub fn record_search(&self, query: &str) -> Vec<String> {
        self.storage().add_recent_search(query)
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.storage().recent_searches()
    }

    pub fn clear_recent_searches(&self) {
        self.storage().clear_recent_searches();
    }
}
