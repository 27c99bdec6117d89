//! # Application State Types
//!
//! The whole client-side state tree and the request lifecycle every slice
//! shares.

use std::collections::HashMap;

use super::slices::{
    AuthSlice, CategoriesSlice, ChatSlice, ListingsSlice, NotificationsSlice, PaymentsSlice, UiSlice,
};

/// Lifecycle of the requests a slice issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Ticket handed out when a fetch starts. Only the newest ticket for the
/// same view of a slice may write its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    view: &'static str,
    seq: u64,
}

/// `idle -> loading -> {succeeded, failed}` with an in-flight counter, so
/// overlapping requests keep `loading` until the last one settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub status: RequestStatus,
    pub error: Option<String>,
    in_flight: u32,
    fetch_seq: HashMap<&'static str, u64>,
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// Start a mutation. Its result always applies.
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.status = RequestStatus::Loading;
        self.error = None;
    }

    /// Start a fetch for `view` and supersede every earlier fetch of it.
    pub fn begin_fetch(&mut self, view: &'static str) -> FetchTicket {
        self.begin();
        let seq = self.fetch_seq.entry(view).or_insert(0);
        *seq += 1;
        FetchTicket { view, seq: *seq }
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        self.fetch_seq.get(ticket.view) == Some(&ticket.seq)
    }

    pub fn succeed(&mut self) {
        self.error = None;
        self.settle(RequestStatus::Succeeded);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.settle(RequestStatus::Failed);
    }

    /// Settle a superseded fetch without touching the outcome of the newer one.
    pub fn discard(&mut self) {
        let outcome = if self.error.is_some() {
            RequestStatus::Failed
        } else {
            RequestStatus::Succeeded
        };
        self.settle(outcome);
    }

    /// A request abandoned by its caller. Nothing was learned, so a lone
    /// cancelled request leaves the slice idle.
    pub fn cancel(&mut self) {
        let outcome = if self.error.is_some() {
            RequestStatus::Failed
        } else {
            RequestStatus::Idle
        };
        self.settle(outcome);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        if self.status == RequestStatus::Failed {
            self.status = RequestStatus::Idle;
        }
    }

    fn settle(&mut self, outcome: RequestStatus) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.status = if self.in_flight == 0 {
            outcome
        } else {
            RequestStatus::Loading
        };
    }
}

/// Root of the client-side state tree.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub auth: AuthSlice,
    pub listings: ListingsSlice,
    pub categories: CategoriesSlice,
    pub chat: ChatSlice,
    pub notifications: NotificationsSlice,
    pub payments: PaymentsSlice,
    pub ui: UiSlice,
}

impl AppState {
    /// Drop everything tied to the signed-in user. Public data (listings,
    /// categories) and UI preferences stay.
    pub fn clear_user_data(&mut self) {
        self.auth = AuthSlice::default();
        self.listings.clear_user_listings();
        self.chat = ChatSlice::default();
        self.notifications = NotificationsSlice::default();
        self.payments = PaymentsSlice::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_requests_stay_loading_until_last_settles() {
        let mut request = RequestState::default();
        request.begin();
        request.begin();
        assert!(request.is_loading());

        request.succeed();
        assert_eq!(request.status, RequestStatus::Loading);

        request.fail("boom");
        assert_eq!(request.status, RequestStatus::Failed);
        assert_eq!(request.error.as_deref(), Some("boom"));
        assert!(!request.is_loading());
    }

    #[test]
    fn cancelled_request_releases_loading() {
        let mut request = RequestState::default();
        request.begin();
        request.begin();
        request.cancel();
        assert!(request.is_loading());

        request.cancel();
        assert!(!request.is_loading());
        assert_eq!(request.status, RequestStatus::Idle);
        assert_eq!(request.in_flight(), 0);
    }

    #[test]
    fn newer_fetch_supersedes_older() {
        let mut request = RequestState::default();
        let first = request.begin_fetch("search");
        let second = request.begin_fetch("search");
        let other = request.begin_fetch("mine");
        assert!(!request.is_latest(first));
        assert!(request.is_latest(second));
        assert!(request.is_latest(other));

        request.succeed();
        request.succeed();
        request.discard();
        assert_eq!(request.status, RequestStatus::Succeeded);
        assert_eq!(request.in_flight(), 0);
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut request = RequestState::default();
        request.begin();
        request.fail("bad");
        request.begin();
        assert!(request.error.is_none());
        request.succeed();
        assert_eq!(request.status, RequestStatus::Succeeded);
    }

    #[test]
    fn clear_error_resets_failed_status() {
        let mut request = RequestState::default();
        request.begin();
        request.fail("bad");
        request.clear_error();
        assert_eq!(request.status, RequestStatus::Idle);
        assert!(request.error.is_none());
    }
}
