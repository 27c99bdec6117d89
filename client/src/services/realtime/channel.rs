//! # Real-Time Channel
//!
//! One WebSocket connection per session. Inbound `{event, data}` frames are
//! fanned out through a [`SubscriberRegistry`]; outbound frames use the same
//! envelope.
//!
//! The connection loop reconnects at a fixed interval for as long as the
//! session lasts. It stops on [`RealtimeChannel::disconnect`] or when the
//! session ends, and reconnects with the new credential when the session
//! token changes. Nothing is queued while disconnected: [`RealtimeChannel::send`]
//! drops the frame with a warning.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use shared::SocketEnvelope;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::registry::{SubscriberRegistry, Subscription};
use crate::app::events::AppEvent;
use crate::config::ClientConfig;
use crate::services::session::{Session, SessionHandle};

/// Connection state as seen by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Why a live connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// `disconnect()` or the session is gone: leave the loop.
    Stop,
    /// The token changed: reconnect right away with the new one.
    Reauthenticate,
    /// The server or network dropped us: wait, then reconnect.
    Dropped,
}

struct Inner {
    config: ClientConfig,
    namespace: String,
    session: SessionHandle,
    registry: SubscriberRegistry,
    events: Sender<AppEvent>,
    state: RwLock<ConnectionState>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
    // Bumped per connect(); a stale loop may not touch shared state.
    generation: AtomicU64,
}

/// Reconnecting socket shared by every subscriber in the app.
#[derive(Clone)]
pub struct RealtimeChannel {
    inner: Arc<Inner>,
}

impl RealtimeChannel {
    pub fn new(config: &ClientConfig, session: SessionHandle, events: Sender<AppEvent>) -> Self {
        Self::for_namespace(config, "", session, events)
    }

    /// Channel for `<ws_base><namespace>`.
    pub fn for_namespace(
        config: &ClientConfig,
        namespace: &str,
        session: SessionHandle,
        events: Sender<AppEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: config.clone(),
                namespace: namespace.to_string(),
                session,
                registry: SubscriberRegistry::new(),
                events,
                state: RwLock::new(ConnectionState::Disconnected),
                outbound: Mutex::new(None),
                shutdown: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Start the connection loop. Does nothing without a session or when the
    /// loop is already running. Returns whether a loop is running afterwards.
    pub fn connect(&self) -> bool {
        if !self.inner.session.is_authenticated() {
            warn!("Not connecting socket without a session");
            return false;
        }

        let mut shutdown = self.inner.shutdown.lock();
        if shutdown.is_some() {
            return true;
        }
        let (tx, rx) = watch::channel(false);
        *shutdown = Some(tx);
        drop(shutdown);

        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run(generation, rx).await;
        });
        true
    }

    /// Stop the loop and close the connection.
    pub fn disconnect(&self) {
        if let Some(tx) = self.inner.shutdown.lock().take() {
            let _ = tx.send(true);
            info!("Socket disconnect requested");
        }
        let generation = self.inner.generation.load(Ordering::Acquire);
        self.inner.set_outbound(generation, None);
        self.inner.set_state(generation, ConnectionState::Disconnected);
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.read()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Send `{event, data}` if connected. Returns `false` when the frame was
    /// dropped.
    pub fn send(&self, event: &str, data: Value) -> bool {
        let outbound = self.inner.outbound.lock().clone();
        let Some(tx) = outbound.filter(|_| self.is_connected()) else {
            warn!(event, "Socket not connected, dropping event");
            return false;
        };

        let frame = match serde_json::to_string(&SocketEnvelope::new(event, data)) {
            Ok(frame) => frame,
            Err(e) => {
                error!(event, error = %e, "Failed to encode socket frame");
                return false;
            }
        };
        if tx.send(frame).is_err() {
            warn!(event, "Socket closed while sending, dropping event");
            return false;
        }
        true
    }

    pub fn subscribe<F>(&self, event: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.inner.registry.subscribe(event, handler)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.inner.registry.unsubscribe(subscription)
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.inner.registry
    }
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    fn set_state(&self, generation: u64, next: ConnectionState) {
        if !self.is_current(generation) {
            return;
        }
        let changed = {
            let mut state = self.state.write();
            let changed = *state != next;
            *state = next;
            changed
        };
        if changed {
            debug!(state = ?next, "Socket state changed");
            let _ = self.events.try_send(AppEvent::SocketStatus(next));
        }
    }

    fn set_outbound(&self, generation: u64, tx: Option<mpsc::UnboundedSender<String>>) {
        if self.is_current(generation) {
            *self.outbound.lock() = tx;
        }
    }

    async fn run(self: Arc<Self>, generation: u64, mut shutdown: watch::Receiver<bool>) {
        let mut session_rx = self.session.subscribe();
        let mut attempt: u64 = 0;

        loop {
            if *shutdown.borrow() || !self.is_current(generation) {
                break;
            }
            let Some(token) = self.session.token() else {
                info!("Session ended, socket loop stopping");
                break;
            };

            let url = match self.config.ws_url_for(&self.namespace, Some(&token)) {
                Ok(url) => url,
                Err(e) => {
                    error!(error = %e, "Cannot build socket URL");
                    break;
                }
            };

            attempt += 1;
            self.set_state(generation, ConnectionState::Connecting);
            debug!(attempt, namespace = %self.namespace, "Connecting socket");

            let exit = match connect_async(url.as_str()).await {
                Ok((stream, response)) => {
                    info!(status = ?response.status(), attempt, "Socket connected");
                    attempt = 0;
                    self.pump(generation, stream, &token, &mut shutdown, &mut session_rx).await
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Socket connection failed");
                    Exit::Dropped
                }
            };
            self.set_outbound(generation, None);
            self.set_state(generation, ConnectionState::Disconnected);

            match exit {
                Exit::Stop => break,
                Exit::Reauthenticate => continue,
                Exit::Dropped => {}
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.reconnect_interval) => {}
                _ = shutdown.changed() => break,
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        self.set_state(generation, ConnectionState::Disconnected);
        // Let a later connect() start a fresh loop.
        if self.is_current(generation) {
            self.shutdown.lock().take();
        }
        debug!(generation, "Socket loop finished");
    }

    async fn pump<S>(
        &self,
        generation: u64,
        stream: S,
        token: &str,
        shutdown: &mut watch::Receiver<bool>,
        session_rx: &mut watch::Receiver<Option<Session>>,
    ) -> Exit
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin,
    {
        let (mut write, mut read) = stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        self.set_outbound(generation, Some(tx));
        self.set_state(generation, ConnectionState::Connected);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Exit::Stop;
                }
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        return Exit::Stop;
                    }
                    let current = session_rx.borrow_and_update().as_ref().map(|s| s.auth_token.clone());
                    match current {
                        Some(current) if current == token => {}
                        Some(_) => {
                            let _ = write.send(Message::Close(None)).await;
                            return Exit::Reauthenticate;
                        }
                        None => {
                            let _ = write.send(Message::Close(None)).await;
                            return Exit::Stop;
                        }
                    }
                }
                Some(frame) = rx.recv() => {
                    if let Err(e) = write.send(Message::Text(frame)).await {
                        warn!(error = %e, "Socket write failed");
                        return Exit::Dropped;
                    }
                }
                inbound = read.next() => match inbound {
                    Some(Ok(Message::Text(text))) => self.handle_frame(&text),
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "Socket closed by server");
                        return Exit::Dropped;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Socket read failed");
                        return Exit::Dropped;
                    }
                    None => return Exit::Dropped,
                }
            }
        }
    }

    fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<SocketEnvelope>(text) {
            Ok(envelope) => {
                let delivered = self.registry.dispatch(&envelope.event, &envelope.data);
                debug!(event = %envelope.event, delivered, "Socket event dispatched");
            }
            Err(e) => warn!(error = %e, length = text.len(), "Failed to parse socket frame"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (RealtimeChannel, SessionHandle, async_channel::Receiver<AppEvent>) {
        let session = SessionHandle::new();
        let (tx, rx) = async_channel::unbounded();
        let config = ClientConfig::with_api_base("http://127.0.0.1:9/api");
        (RealtimeChannel::new(&config, session.clone(), tx), session, rx)
    }

    #[tokio::test]
    async fn connect_requires_session() {
        let (channel, _session, _rx) = channel();
        assert!(!channel.connect());
        assert_eq!(channel.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn send_while_disconnected_is_dropped() {
        let (channel, _session, _rx) = channel();
        assert!(!channel.send("send_message", serde_json::json!({"content": "hi"})));
    }

    #[test]
    fn inbound_frames_reach_subscribers() {
        let (channel, _session, _rx) = channel();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        channel.subscribe("unread_count", move |data| sink.lock().push(data.clone()));

        channel.inner.handle_frame(r#"{"event":"unread_count","data":{"count":3}}"#);
        channel.inner.handle_frame("not json");

        assert_eq!(*seen.lock(), vec![serde_json::json!({"count": 3})]);
    }
}
