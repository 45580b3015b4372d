use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::lifecycle::{Listener, PageEvent, PageLifecycle, Subscription};

const VISIBILITY_CHANGE: &str = "visibilitychange";
const BEFORE_UNLOAD: &str = "beforeunload";

/// The DOM callbacks registered on behalf of one listener
struct Registration {
    on_visibility_change: Closure<dyn FnMut()>,
    on_before_unload: Closure<dyn FnMut()>,
}

/// Page events taken from the browser.
///
/// `visibilitychange` on the document becomes [PageEvent::Hidden] or
/// [PageEvent::Visible] depending on `document.hidden`, and `beforeunload` on
/// the window becomes [PageEvent::Unload].
pub struct BrowserLifecycle {
    window: Window,
    document: Document,
    next_id: Cell<u64>,
    registrations: RefCell<HashMap<Subscription, Registration>>,
}

impl BrowserLifecycle {
    /// Binds to the current window and its document, if there are any
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;

        Some(Self {
            window,
            document,
            next_id: Cell::new(0),
            registrations: Default::default(),
        })
    }
}

impl PageLifecycle for BrowserLifecycle {
    fn subscribe(&self, listener: Listener) -> Subscription {
        let listener = Rc::new(RefCell::new(listener));

        let document = self.document.clone();
        let on_visibility = Rc::clone(&listener);
        let on_visibility_change = Closure::wrap(Box::new(move || {
            let event = if document.hidden() {
                PageEvent::Hidden
            } else {
                PageEvent::Visible
            };
            (on_visibility.borrow_mut())(event);
        }) as Box<dyn FnMut()>);

        let on_unload = listener;
        let on_before_unload = Closure::wrap(Box::new(move || {
            (on_unload.borrow_mut())(PageEvent::Unload);
        }) as Box<dyn FnMut()>);

        if let Err(e) = self.document.add_event_listener_with_callback(
            VISIBILITY_CHANGE,
            on_visibility_change.as_ref().unchecked_ref(),
        ) {
            tracing::warn!(error = ?e, "failed to listen for visibilitychange");
        }
        if let Err(e) = self.window.add_event_listener_with_callback(
            BEFORE_UNLOAD,
            on_before_unload.as_ref().unchecked_ref(),
        ) {
            tracing::warn!(error = ?e, "failed to listen for beforeunload");
        }

        let subscription = Subscription(self.next_id.get());
        self.next_id.set(subscription.0 + 1);
        self.registrations.borrow_mut().insert(
            subscription,
            Registration {
                on_visibility_change,
                on_before_unload,
            },
        );
        subscription
    }

    fn unsubscribe(&self, subscription: Subscription) {
        let registration = match self.registrations.borrow_mut().remove(&subscription) {
            Some(registration) => registration,
            None => return,
        };

        if let Err(e) = self.document.remove_event_listener_with_callback(
            VISIBILITY_CHANGE,
            registration.on_visibility_change.as_ref().unchecked_ref(),
        ) {
            tracing::warn!(error = ?e, "failed to stop listening for visibilitychange");
        }
        if let Err(e) = self.window.remove_event_listener_with_callback(
            BEFORE_UNLOAD,
            registration.on_before_unload.as_ref().unchecked_ref(),
        ) {
            tracing::warn!(error = ?e, "failed to stop listening for beforeunload");
        }
    }
}
