use thiserror::Error;

/// The conditions an [InMemStorage](crate::InMemStorage) reports to its caller.
///
/// None of these is fatal: the store logs each one and carries on, leaving
/// its data as it was before the call.
#[derive(Debug, Error)]
pub enum StorageError {
    /// `initialize` was called on a store whose listener is already registered
    #[error("in-memory storage has already been initialized")]
    AlreadyInitialized,
    /// `set_item` was called with a key that is not a string
    #[error("the key passed to set_item must be a string, got: {0}")]
    InvalidKey(String),
    /// A typed value could not be turned into JSON
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialization {
        /// The key the value was meant for
        key: String,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = StorageError::InvalidKey("123455".to_string());
        assert_eq!(
            err.to_string(),
            "the key passed to set_item must be a string, got: 123455"
        );
        assert_eq!(
            StorageError::AlreadyInitialized.to_string(),
            "in-memory storage has already been initialized"
        );
    }
}
