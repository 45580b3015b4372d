//! Durable key-value slots that backups are written to while the page is hidden.

use std::io;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebLocalStorage;

mod file;
mod memory;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

/// A string-to-string store that outlives a page reload, like `window.localStorage`.
///
/// The in-memory storage only ever touches the one key it reserves for its
/// backups, so an implementation may be shared with the rest of the host
/// application as long as nothing else writes that key.
pub trait DurableStorage {
    /// Returns the value stored under `key`, if any
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing whatever was there
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;

    /// Removes `key`. Removing a key that is not there is not an error.
    fn delete(&mut self, key: &str) -> io::Result<()>;
}
