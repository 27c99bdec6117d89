//! # Subscriber Registry
//!
//! Maps a server event name to an ordered list of handlers. Each handler is
//! registered under its own id and can be removed on its own; delivery is a
//! synchronous walk over a snapshot of the list.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// Callback invoked with the `data` part of an inbound frame.
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by [`SubscriberRegistry::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: String,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }
}

struct Entry {
    id: u64,
    // Cleared on unsubscribe so an in-progress dispatch skips the handler.
    active: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    handlers: RwLock<HashMap<String, Vec<Entry>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`. Handlers run in registration order.
    pub fn subscribe<F>(&self, event: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.write().entry(event.to_string()).or_default().push(Entry {
            id,
            active: Arc::new(AtomicBool::new(true)),
            handler: Arc::new(handler),
        });
        tracing::trace!(event, id, "Subscribed");
        Subscription {
            event: event.to_string(),
            id,
        }
    }

    /// Remove one handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut handlers = self.handlers.write();
        let Some(entries) = handlers.get_mut(&subscription.event) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|e| e.id == subscription.id) else {
            return false;
        };
        let entry = entries.remove(pos);
        entry.active.store(false, Ordering::Release);
        if entries.is_empty() {
            handlers.remove(&subscription.event);
        }
        true
    }

    /// Deliver `data` to every handler of `event`. Handlers added during the
    /// walk are not called; handlers removed during the walk are skipped.
    /// Returns the number of handlers called.
    pub fn dispatch(&self, event: &str, data: &Value) -> usize {
        let snapshot: Vec<(Arc<AtomicBool>, Handler)> = match self.handlers.read().get(event) {
            Some(entries) => entries
                .iter()
                .map(|e| (Arc::clone(&e.active), Arc::clone(&e.handler)))
                .collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for (active, handler) in snapshot {
            if active.load(Ordering::Acquire) {
                handler(data);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.handlers.read().get(event).map_or(0, Vec::len)
    }

    pub fn clear(&self) {
        let mut handlers = self.handlers.write();
        for entry in handlers.values().flatten() {
            entry.active.store(false, Ordering::Release);
        }
        handlers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&'static str) -> Box<dyn Fn(&Value) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |tag: &'static str| {
            let sink = Arc::clone(&sink);
            Box::new(move |data: &Value| sink.lock().push(format!("{tag}:{data}"))) as Box<dyn Fn(&Value) + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn delivers_in_registration_order() {
        let registry = SubscriberRegistry::new();
        let (log, make) = recorder();
        registry.subscribe("new_message", make("a"));
        registry.subscribe("new_message", make("b"));
        registry.subscribe("notification", make("c"));

        assert_eq!(registry.dispatch("new_message", &json!(1)), 2);
        assert_eq!(*log.lock(), vec!["a:1".to_string(), "b:1".to_string()]);
    }

    #[test]
    fn unsubscribed_handler_gets_nothing() {
        let registry = SubscriberRegistry::new();
        let (log, make) = recorder();
        let first = registry.subscribe("notification", make("a"));
        registry.subscribe("notification", make("b"));

        assert!(registry.unsubscribe(&first));
        assert!(!registry.unsubscribe(&first));
        registry.dispatch("notification", &json!("x"));

        assert_eq!(*log.lock(), vec!["b:\"x\"".to_string()]);
        assert_eq!(registry.subscriber_count("notification"), 1);
    }

    #[test]
    fn unknown_event_is_ignored() {
        let registry = SubscriberRegistry::new();
        assert_eq!(registry.dispatch("nothing", &Value::Null), 0);
    }

    #[test]
    fn handler_removed_mid_dispatch_is_skipped() {
        let registry = Arc::new(SubscriberRegistry::new());
        let (log, make) = recorder();
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let reg = Arc::clone(&registry);
        let target = Arc::clone(&victim);
        registry.subscribe("e", move |_| {
            if let Some(sub) = target.lock().take() {
                reg.unsubscribe(&sub);
            }
        });
        *victim.lock() = Some(registry.subscribe("e", make("second")));

        assert_eq!(registry.dispatch("e", &json!(0)), 1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let registry = SubscriberRegistry::new();
        let (_log, make) = recorder();
        registry.subscribe("a", make("a"));
        registry.subscribe("b", make("b"));
        registry.clear();
        assert_eq!(registry.subscriber_count("a"), 0);
        assert_eq!(registry.dispatch("b", &json!(null)), 0);
    }
}
