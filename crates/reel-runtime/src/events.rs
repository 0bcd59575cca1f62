//! Global keyboard events.
//!
//! Views subscribe for the lifetime of whatever they render; the returned
//! [`Subscription`] unsubscribes when dropped, so every exit path releases it.

use std::sync::{Arc, Mutex, Weak};

use crate::lock;

/// Keys the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Closes the open movie details.
    Escape,
    /// Focuses the search input.
    Enter,
}

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Key, Handler)>,
}

/// Fan-out of key presses to subscribed handlers.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `key` until the returned subscription is dropped.
    pub fn subscribe(
        &self,
        key: Key,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Subscription {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.handlers.push((id, key, Arc::new(handler)));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Deliver a key press. Returns how many handlers ran.
    pub fn dispatch(&self, key: Key) -> usize {
        // Handlers may unsubscribe themselves, so run them outside the lock.
        let handlers: Vec<Handler> = lock(&self.registry)
            .handlers
            .iter()
            .filter(|(_, k, _)| *k == key)
            .map(|(_, _, h)| h.clone())
            .collect();

        tracing::debug!(?key, handlers = handlers.len(), "Key pressed");
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, key: Key) -> usize {
        lock(&self.registry)
            .handlers
            .iter()
            .filter(|(_, k, _)| *k == key)
            .count()
    }
}

/// Live registration on an [`EventBus`]. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.retain(|(id, _, _)| *id != self.id);
        }
    }
}
