use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use crate::durable::DurableStorage;

/// Durable storage kept in process memory.
///
/// Clones share the same map, the way every script on a page sees the same
/// `localStorage`. Useful for tests, and for hosts that persist the map
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates a new, empty memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys stored
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if no key is stored
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> io::Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_and_delete() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.read("backup"), None);

        storage.write("backup", "{}").expect("write backup");
        storage.write("theme", "dark").expect("write theme");
        assert_eq!(storage.read("backup"), Some("{}".to_string()));
        assert_eq!(storage.len(), 2);

        storage.write("backup", "{\"a\":1}").expect("overwrite backup");
        assert_eq!(storage.read("backup"), Some("{\"a\":1}".to_string()));
        assert_eq!(storage.len(), 2);

        storage.delete("backup").expect("delete backup");
        storage.delete("backup").expect("delete missing backup");
        assert_eq!(storage.read("backup"), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.write("backup", "[]").expect("write backup");

        assert_eq!(observer.read("backup"), Some("[]".to_string()));
    }
}
