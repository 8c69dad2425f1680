// Keystate Event Dispatch
// Fans one raw key event out to many subscribers, innermost first

use std::fmt;
use std::sync::Arc;

use crate::engine::SharedEngine;
use crate::input::KeyEvent;

/// A subscriber callback
pub type Handler = Box<dyn FnMut(&mut KeyEvent) + Send>;

/// Returned by [`KeyEventDispatcher::subscribe`]; pass it back to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered subscriber registry.
///
/// Subscribers registered later are treated as nested deeper and see each
/// event first, so they can mark it default-prevented before outer
/// subscribers look at it.
#[derive(Default)]
pub struct KeyEventDispatcher {
    subscribers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl KeyEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler
    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&mut KeyEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        log::trace!("subscribed {:?} ({} total)", id, self.subscribers.len());
        id
    }

    /// Subscribe an engine; every dispatched event is fed to it
    pub fn attach(&mut self, engine: &SharedEngine) -> SubscriptionId {
        let engine = Arc::clone(engine);
        self.subscribe(move |event| {
            engine.lock().handle_event(event);
        })
    }

    /// Remove a handler and drop it. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        let removed = self.subscribers.len() != before;
        if removed {
            log::trace!("unsubscribed {:?}", id);
        }
        removed
    }

    /// Deliver an event to every subscriber exactly once, most recent first.
    /// Returns how many handlers ran.
    pub fn dispatch(&mut self, event: &mut KeyEvent) -> usize {
        for (_, handler) in self.subscribers.iter_mut().rev() {
            handler(event);
        }
        self.subscribers.len()
    }

    /// Get the number of subscribers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for KeyEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<SubscriptionId> = self.subscribers.iter().map(|(id, _)| *id).collect();
        f.debug_struct("KeyEventDispatcher")
            .field("subscribers", &ids)
            .finish()
    }
}
