//! # Application Store
//!
//! The single mutable state tree of the client and the actions that change
//! it. Views read through [`Store::read`] / [`Store::state`] and change
//! things only by calling actions; nothing else holds a write handle.
//!
//! ## Module Structure
//!
//! ```text
//! app/
//! ├── mod.rs       - Store and the shared fetch/mutate plumbing
//! ├── events.rs    - AppEvent published by the adapter and socket
//! ├── state.rs     - AppState and the request lifecycle
//! ├── form.rs      - Submission state for mutating forms
//! ├── slices/      - Per-domain data and synchronous reducers
//! └── handlers/    - Async actions, one per backend operation
//! ```
//!
//! Every action follows the same shape: mark the slice loading, await the
//! API, then either reduce the result into the slice or store the
//! classified error's message on it. Previously loaded data is kept on
//! failure. Fetches carry a ticket so that an older response arriving after
//! a newer one is dropped; mutations always apply.

pub mod events;
pub mod form;
pub mod handlers;
pub mod slices;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

pub use events::AppEvent;
pub use form::{FormPhase, FormState};
pub use handlers::SliceKind;
pub use state::{AppState, RequestState, RequestStatus};

use crate::core::error::{ApiResult, ClassifiedError};
use crate::core::service::ApiService;
use crate::services::session::SessionHandle;
use crate::services::storage::ClientStorage;

/// Selects one slice's request state.
pub(crate) type RequestLens = fn(&mut AppState) -> &mut RequestState;

/// Shared handle to application state plus everything actions need.
#[derive(Clone)]
pub struct Store {
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ApiService>,
    session: SessionHandle,
    storage: ClientStorage,
    events: Sender<AppEvent>,
}

impl Store {
    pub fn new(
        api: Arc<dyn ApiService>,
        session: SessionHandle,
        storage: ClientStorage,
        events: Sender<AppEvent>,
    ) -> Self {
        let mut state = AppState::default();
        if let Some(theme) = storage.theme() {
            state.ui.theme = theme;
        }
        Self {
            state: Arc::new(RwLock::new(state)),
            api,
            session,
            storage,
            events,
        }
    }

    /// Snapshot of the whole tree.
    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    /// Read without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.read())
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn storage(&self) -> &ClientStorage {
        &self.storage
    }

    pub fn api(&self) -> &Arc<dyn ApiService> {
        &self.api
    }

    pub fn events(&self) -> &Sender<AppEvent> {
        &self.events
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.state.write())
    }

    /// Run a fetch for `view`. The result is reduced only if no newer fetch
    /// of the same view started meanwhile.
    pub(crate) async fn fetch<T, Fut>(
        &self,
        lens: RequestLens,
        view: &'static str,
        call: Fut,
        apply: impl FnOnce(&mut AppState, T),
    ) -> ApiResult<()>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        let ticket = self.update(|s| lens(s).begin_fetch(view));
        let pending = Pending::new(&self.state, lens);
        let result = call.await;
        pending.disarm();

        let mut state = self.state.write();
        if !lens(&mut state).is_latest(ticket) {
            lens(&mut state).discard();
            tracing::debug!(view, "Dropping superseded fetch result");
            return result.map(|_| ());
        }
        match result {
            Ok(value) => {
                apply(&mut state, value);
                lens(&mut state).succeed();
                Ok(())
            }
            Err(err) => {
                self.record_failure(&mut state, lens, view, &err);
                Err(err)
            }
        }
    }

    /// Run a mutation. Confirmed writes: state changes only after success.
    pub(crate) async fn mutate<T, R, Fut>(
        &self,
        lens: RequestLens,
        op: &'static str,
        call: Fut,
        apply: impl FnOnce(&mut AppState, T) -> R,
    ) -> ApiResult<R>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        self.update(|s| lens(s).begin());
        let pending = Pending::new(&self.state, lens);
        let result = call.await;
        pending.disarm();

        let mut state = self.state.write();
        match result {
            Ok(value) => {
                let out = apply(&mut state, value);
                lens(&mut state).succeed();
                Ok(out)
            }
            Err(err) => {
                self.record_failure(&mut state, lens, op, &err);
                Err(err)
            }
        }
    }

    fn record_failure(&self, state: &mut AppState, lens: RequestLens, op: &'static str, err: &ClassifiedError) {
        tracing::warn!(op, code = err.code(), error = %err, "Action failed");
        lens(state).fail(err.user_message());
        // The adapter has already ended the session; drop what belonged to it.
        if err.is_auth() && !self.session.is_authenticated() && state.auth.is_authenticated {
            state.clear_user_data();
            self.storage.remove_token();
        }
    }
}

/// Settles a started request if its future is dropped before the response.
struct Pending<'a> {
    state: &'a RwLock<AppState>,
    lens: RequestLens,
    armed: bool,
}

impl<'a> Pending<'a> {
    fn new(state: &'a RwLock<AppState>, lens: RequestLens) -> Self {
        Self { state, lens, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.armed {
            (self.lens)(&mut self.state.write()).cancel();
            tracing::debug!("Request dropped before it settled");
        }
    }
}
