//! Theme, sidebar, toast messages and socket status.

use serde::{Deserialize, Serialize};

use crate::services::realtime::ConnectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct UiSlice {
    pub theme: Theme,
    pub sidebar_open: bool,
    pub toasts: Vec<Toast>,
    /// Last known state of the real-time channel.
    pub socket: ConnectionState,
    next_toast_id: u64,
}

impl UiSlice {
    /// Light <-> dark. `System` resolves to light first.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark | Theme::System => Theme::Light,
        };
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn push_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss_toast(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_toggles_between_light_and_dark() {
        let mut ui = UiSlice::default();
        assert_eq!(ui.toggle_theme(), Theme::Dark);
        assert_eq!(ui.toggle_theme(), Theme::Light);
        ui.set_theme(Theme::System);
        assert_eq!(ui.toggle_theme(), Theme::Light);
    }

    #[test]
    fn toasts_have_unique_ids() {
        let mut ui = UiSlice::default();
        let a = ui.push_toast(ToastKind::Info, "a");
        let b = ui.push_toast(ToastKind::Error, "b");
        assert_ne!(a, b);
        assert!(ui.dismiss_toast(a));
        assert!(!ui.dismiss_toast(a));
        assert_eq!(ui.toasts.len(), 1);
    }
}
