use std::io;

use wasm_bindgen::JsValue;

use crate::durable::DurableStorage;

/// Durable storage backed by the page's `window.localStorage`
#[derive(Debug, Clone)]
pub struct WebLocalStorage {
    storage: web_sys::Storage,
}

impl WebLocalStorage {
    /// Opens the local storage of the current window.
    ///
    /// # Errors
    /// Fails when there is no window (e.g. in a worker) or when the browser
    /// denies access to localStorage, as it may in private or third-party contexts.
    pub fn new() -> io::Result<Self> {
        let window = web_sys::window().ok_or_else(|| to_io_error("no global window"))?;
        let storage = window
            .local_storage()
            .map_err(js_to_io_error)?
            .ok_or_else(|| to_io_error("localStorage unavailable"))?;

        Ok(Self { storage })
    }
}

impl DurableStorage for WebLocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = ?e, key, "localStorage getItem failed");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.storage.set_item(key, value).map_err(js_to_io_error)
    }

    fn delete(&mut self, key: &str) -> io::Result<()> {
        self.storage.remove_item(key).map_err(js_to_io_error)
    }
}

fn to_io_error(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, message.to_string())
}

fn js_to_io_error(e: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("localStorage error: {:?}", e))
}
