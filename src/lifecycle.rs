//! Sources of page lifecycle events, which trigger the backups and restores.

pub use manual::ManualLifecycle;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::BrowserLifecycle;

mod manual;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

/// A transition in the life of the hosting page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// The page lost visibility, e.g. the user switched tabs
    Hidden,
    /// The page became visible again
    Visible,
    /// The page is about to be unloaded or reloaded
    Unload,
}

/// A callback receiving page events
pub type Listener = Box<dyn FnMut(PageEvent)>;

/// The handle returned when subscribing, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);

/// Something that emits [PageEvent]s to subscribed listeners.
///
/// Events are delivered synchronously on the host's single thread, one at a time.
pub trait PageLifecycle {
    /// Registers `listener` for every page event from now on
    fn subscribe(&self, listener: Listener) -> Subscription;

    /// Stops delivering events to the listener behind `subscription`.
    /// Unknown subscriptions are ignored.
    fn unsubscribe(&self, subscription: Subscription);
}
