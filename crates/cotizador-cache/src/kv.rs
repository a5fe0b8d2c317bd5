//! Typed key-value wrapper with automatic serialization.

use crate::backend::Backend;
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over a [`Backend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<B> {
    backend: B,
}

impl<B: Backend> Cache<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<PersistedQuote> = cache.get("cotizador-quote")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        count: u32,
    }

    #[test]
    fn test_typed_roundtrip() {
        let cache = Cache::new(MemoryBackend::new());
        let entry = Entry {
            name: "perno".to_string(),
            count: 3,
        };

        cache.set("entry", &entry).unwrap();
        let restored: Option<Entry> = cache.get("entry").unwrap();
        assert_eq!(restored, Some(entry));
    }

    #[test]
    fn test_missing_key() {
        let cache = Cache::new(MemoryBackend::new());
        let value: Option<Entry> = cache.get("missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_corrupt_value_is_error() {
        let backend = MemoryBackend::new();
        backend.set("entry", b"{not json").unwrap();

        let cache = Cache::new(backend);
        let result: Result<Option<Entry>, _> = cache.get("entry");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }
}
