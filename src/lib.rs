/*!
An in-memory key-value store for browser apps, with a "localStorage-like" API.

In front-end web development, [localStorage](https://developer.mozilla.org/en-US/docs/Web/API/Window/localStorage)
is the convenient place to keep data around across tab switches and reloads. It is also a place where
anything written stays in plaintext on disk for as long as nobody removes it, which is a poor fit for
session data, tokens, or anything personal.

inmem-storage keeps the data in process memory instead, with the same simple API i.e.

- `get_item()`
- `set_item()`
- `remove_item()`
- `clear()`

and makes up for the volatility with a *transient backup*:

- When the page becomes hidden or is about to unload, the whole store is written, as JSON,
  under a single reserved key of a durable storage.
- When the page becomes visible again (or is reloaded and the store initialized),
  the store is restored from that key and the key is erased.
- After `clear()`, e.g. on logout, no backup is written at all, so nothing is left behind.

The durable storage and the source of page events are both traits, [DurableStorage] and
[PageLifecycle]. With the `web` feature on `wasm32`, `WebLocalStorage` and `BrowserLifecycle`
bind them to `window.localStorage` and the DOM's `visibilitychange`/`beforeunload` events.
[MemoryStorage], [FileStorage] and [ManualLifecycle] work anywhere.

# Usage

First add `inmem-storage` to your dependencies in your project's `Cargo.toml`.

```toml
[dependencies]
inmem-storage = "0.1.0" # or any available version you wish to use
```

Next:

```rust
use std::rc::Rc;

use inmem_storage::{DurableStorage, InMemStorage, ManualLifecycle, MemoryStorage, PageEvent};
use serde_json::json;

# fn main() -> Result<(), inmem_storage::StorageError> {
    // In a browser these would be `WebLocalStorage` and `BrowserLifecycle`
    let durable = MemoryStorage::new();
    let lifecycle = Rc::new(ManualLifecycle::new());

    // Create the store. `None` means backups go under the default "backup" key.
    let store = InMemStorage::new(durable.clone(), lifecycle.clone(), None);

    // Restore whatever a reload left behind, and start listening to the page
    store.initialize()?;

    // Insert key-value pairs; any JSON value will do
    store.set_item("name", "Obiora N.C")?;
    store.set_item("technologies", vec!["Reactjs", "VueJs"])?;
    assert_eq!(store.size(), 2);

    // Keys must be strings
    assert!(store.set_item(123, "x").is_err());

    // Getting the values back
    assert_eq!(store.get_item("name"), Some(json!("Obiora N.C")));

    // The page gets hidden: the store is backed up
    lifecycle.emit(PageEvent::Hidden);
    # assert!(durable.read("backup").is_some());

    // ...and visible again: the store is restored and the backup erased
    lifecycle.emit(PageEvent::Visible);
    assert_eq!(durable.read("backup"), None);

    // Delete a key-value pair
    store.remove_item("technologies");
    assert_eq!(store.get_item("technologies"), None);

    // On logout, clear everything. No backup happens from now on.
    store.clear();
    lifecycle.emit(PageEvent::Unload);
    assert_eq!(durable.read("backup"), None);
    # Ok(())
# }
```
 */

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub use durable::{DurableStorage, FileStorage, MemoryStorage};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use durable::WebLocalStorage;
pub use error::StorageError;
pub use internal::DEFAULT_BACKUP_KEY;
pub use lifecycle::{Listener, ManualLifecycle, PageEvent, PageLifecycle, Subscription};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use lifecycle::BrowserLifecycle;
pub use store::InMemStorage;

pub mod durable;
mod error;
mod internal;
pub mod lifecycle;
mod store;
