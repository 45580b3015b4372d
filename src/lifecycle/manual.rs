use std::cell::{Cell, RefCell};

use crate::lifecycle::{Listener, PageEvent, PageLifecycle, Subscription};

/// A lifecycle source whose events are emitted by hand.
///
/// Hosts that already observe their own page lifecycle can forward it through
/// [ManualLifecycle::emit]. Tests use it to play out hide/show/unload sequences.
#[derive(Default)]
pub struct ManualLifecycle {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(Subscription, Listener)>>,
    emitting: Cell<bool>,
    // unsubscribed while their listener was out being called by `emit`
    pending_removals: RefCell<Vec<Subscription>>,
}

impl ManualLifecycle {
    /// Creates a lifecycle source with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener, in the order they subscribed
    pub fn emit(&self, event: PageEvent) {
        let mut listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        let was_emitting = self.emitting.replace(true);
        for (_, listener) in listeners.iter_mut() {
            listener(event);
        }
        self.emitting.set(was_emitting);

        let removed = std::mem::take(&mut *self.pending_removals.borrow_mut());
        listeners.retain(|(s, _)| !removed.contains(s));

        // keep any listener that subscribed while we were emitting
        let mut current = self.listeners.borrow_mut();
        listeners.append(&mut current);
        *current = listeners;
    }

    /// Returns the number of subscribed listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl PageLifecycle for ManualLifecycle {
    fn subscribe(&self, listener: Listener) -> Subscription {
        let subscription = Subscription(self.next_id.get());
        self.next_id.set(subscription.0 + 1);
        self.listeners.borrow_mut().push((subscription, listener));
        subscription
    }

    fn unsubscribe(&self, subscription: Subscription) {
        let mut listeners = self.listeners.borrow_mut();
        let len = listeners.len();
        listeners.retain(|(s, _)| *s != subscription);

        if listeners.len() == len && self.emitting.get() {
            self.pending_removals.borrow_mut().push(subscription);
        }
    }
}
