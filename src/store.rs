use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::durable::DurableStorage;
use crate::error::StorageError;
use crate::internal::{self, try_borrow_mut, Entries, Snapshot, DEFAULT_BACKUP_KEY};
use crate::lifecycle::{PageEvent, PageLifecycle, Subscription};

/// An in-memory key-value store that only touches durable storage while the page is hidden.
///
/// Cloning gives another handle to the same store.
#[derive(Clone)]
pub struct InMemStorage {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    entries: Entries,
    size: usize,
    is_initialized: bool,
    is_logged_out: bool,
    backup_key: String,
    durable: Box<dyn DurableStorage>,
    lifecycle: Rc<dyn PageLifecycle>,
    subscription: Option<Subscription>,
}

impl InMemStorage {
    /// Creates a new, uninitialized store that backs up into `durable` under
    /// `backup_key` whenever `lifecycle` reports the page hidden or unloading.
    ///
    /// `backup_key` defaults to [DEFAULT_BACKUP_KEY]. Nothing is read or
    /// registered until [InMemStorage::initialize] is called.
    pub fn new<D>(
        durable: D,
        lifecycle: Rc<dyn PageLifecycle>,
        backup_key: Option<&str>,
    ) -> Self
    where
        D: DurableStorage + 'static,
    {
        let backup_key = backup_key.unwrap_or(DEFAULT_BACKUP_KEY).to_string();
        let inner = Inner {
            entries: Entries::default(),
            size: 0,
            is_initialized: false,
            is_logged_out: false,
            backup_key,
            durable: Box::new(durable),
            lifecycle,
            subscription: None,
        };

        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Restores any backup left in durable storage (e.g. by a reload), erases it
    /// and starts listening to the page lifecycle.
    ///
    /// A missing or malformed backup just leaves the store empty.
    ///
    /// # Errors
    /// Reports [StorageError::AlreadyInitialized] if the store is already
    /// initialized, in which case neither its data nor its listener is touched.
    pub fn initialize(&self) -> Result<(), StorageError> {
        let is_initialized = self.inner.borrow().is_initialized;
        let result = match is_initialized {
            true => Err(StorageError::AlreadyInitialized),
            false => {
                self.init();
                Ok(())
            }
        };

        self.inner.borrow_mut().recalculate_size();
        report(result, "initialize")
    }

    fn init(&self) {
        let (lifecycle, stale_subscription) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let raw = inner.durable.read(&inner.backup_key);
            let backup = internal::decode(Snapshot::from(raw.as_deref()), &inner.backup_key);
            inner.entries = internal::decode(Snapshot::Decoded(backup), &inner.backup_key);
            (Rc::clone(&inner.lifecycle), inner.subscription.take())
        };

        // a listener left registered by `clear` is replaced, never doubled
        if let Some(subscription) = stale_subscription {
            lifecycle.unsubscribe(subscription);
        }
        let store = Rc::downgrade(&self.inner);
        let subscription =
            lifecycle.subscribe(Box::new(move |event| on_page_event(&store, event)));

        let mut inner = self.inner.borrow_mut();
        inner.subscription = Some(subscription);
        inner.delete_backup();
        inner.is_initialized = true;
        inner.is_logged_out = false;
    }

    /// Returns the value stored under `key`
    pub fn get_item(&self, key: &str) -> Option<Value> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Returns the value stored under `key` deserialized as `T`, or `None`
    /// if there is no such key or the value has a different shape
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_item(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(error = %e, key, "stored value has a different shape");
                None
            }
        }
    }

    /// Stores `value` under `key` as is, replacing any previous value.
    ///
    /// # Errors
    /// Reports [StorageError::InvalidKey] if `key` is not a string, leaving the
    /// store unchanged.
    pub fn set_item<K, V>(&self, key: K, value: V) -> Result<(), StorageError>
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let value = value.into();
        let mut inner = self.inner.borrow_mut();
        let result = match key.into() {
            Value::String(key) => {
                inner.entries.insert(key, value);
                Ok(())
            }
            other => Err(StorageError::InvalidKey(other.to_string())),
        };

        inner.recalculate_size();
        drop(inner);
        report(result, "set_item")
    }

    /// Serializes `value` and stores it under `key`.
    ///
    /// # Errors
    /// Reports [StorageError::Serialization] if `value` cannot be represented
    /// as JSON, leaving the store unchanged.
    pub fn set_typed<T>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => self.set_item(key, value),
            Err(source) => {
                let err = StorageError::Serialization {
                    key: key.to_string(),
                    source,
                };
                report(Err(err), "set_typed")
            }
        }
    }

    /// Removes `key` from the store, if it is there
    pub fn remove_item(&self, key: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.remove(key);
        inner.recalculate_size();
    }

    /// Empties the store and stops backing it up.
    ///
    /// Backups stay off until the next [InMemStorage::initialize] or
    /// [InMemStorage::logout], so a logged-out session leaves nothing behind.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.is_logged_out = true;
        inner.entries.clear();
        inner.is_initialized = false;
        inner.recalculate_size();
    }

    /// Lets backups happen again after a [InMemStorage::clear]
    pub fn logout(&self) {
        self.logout_with(|| {});
    }

    /// Runs `callback` for the caller's own cleanup, then lets backups happen again.
    ///
    /// Note this does not suppress backups by itself; only [InMemStorage::clear] does.
    pub fn logout_with<F: FnOnce()>(&self, callback: F) {
        callback();
        self.inner.borrow_mut().is_logged_out = false;
    }

    /// Stops listening to the page lifecycle, keeping the data in memory.
    ///
    /// The store can be initialized again afterwards.
    pub fn detach(&self) {
        let (lifecycle, subscription) = {
            let mut inner = self.inner.borrow_mut();
            inner.is_initialized = false;
            (Rc::clone(&inner.lifecycle), inner.subscription.take())
        };

        if let Some(subscription) = subscription {
            lifecycle.unsubscribe(subscription);
        }
    }

    /// Returns the number of key-value pairs in the store
    pub fn size(&self) -> usize {
        self.inner.borrow().size
    }

    /// Returns true if the store holds no key-value pairs
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns a copy of everything in the store
    pub fn in_mem_storage(&self) -> serde_json::Map<String, Value> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns true if the store is listening to the page lifecycle
    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().is_initialized
    }

    /// Returns true if backups are currently suppressed
    pub fn is_logged_out(&self) -> bool {
        self.inner.borrow().is_logged_out
    }

    /// Returns the durable storage key backups are written under
    pub fn backup_key(&self) -> String {
        self.inner.borrow().backup_key.clone()
    }
}

impl Inner {
    fn recalculate_size(&mut self) {
        self.size = self.entries.len();
    }

    fn write_backup(&mut self) {
        let encoded = match internal::encode(&self.entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode backup");
                return;
            }
        };

        match self.durable.write(&self.backup_key, &encoded) {
            Ok(()) => tracing::debug!(entries = self.size, "backup written"),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.backup_key, "failed to write backup")
            }
        }
    }

    /// Replaces the entries with the backup; no backup at all means no entries
    fn restore_backup(&mut self) {
        let raw = self.durable.read(&self.backup_key);
        self.entries = internal::decode(Snapshot::from(raw.as_deref()), &self.backup_key);
        self.recalculate_size();
        self.delete_backup();
        tracing::debug!(entries = self.size, "backup restored");
    }

    fn delete_backup(&mut self) {
        if let Err(e) = self.durable.delete(&self.backup_key) {
            tracing::warn!(error = %e, key = %self.backup_key, "failed to delete backup");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.lifecycle.unsubscribe(subscription);
        }
    }
}

/// Backs up on hide or unload and restores on show, unless logged out
fn on_page_event(store: &Weak<RefCell<Inner>>, event: PageEvent) {
    let store = match store.upgrade() {
        Some(store) => store,
        None => return,
    };
    let mut inner = match try_borrow_mut!(store, "page event") {
        Some(inner) => inner,
        None => return,
    };

    if inner.is_logged_out {
        tracing::debug!(?event, "logged out, ignoring page event");
        return;
    }

    match event {
        PageEvent::Hidden | PageEvent::Unload => inner.write_backup(),
        PageEvent::Visible => inner.restore_backup(),
    }
}

/// Logs the error of a failed operation before handing it back to the caller
fn report(result: Result<(), StorageError>, operation: &'static str) -> Result<(), StorageError> {
    if let Err(e) = &result {
        tracing::error!(error = %e, operation, "in-memory storage operation failed");
    }
    result
}
