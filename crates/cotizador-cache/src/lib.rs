//! Type-safe key-value storage for Cotizador.
//!
//! Provides a small, ergonomic API for keeping client-side state (the quote
//! cart) in a durable key-value store with automatic JSON serialization.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryBackend`]: an in-process map, shared between clones.
//! - [`FileBackend`]: one JSON file per key inside a directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use cotizador_cache::{Cache, FileBackend};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Persisted {
//!     items: Vec<QuoteItem>,
//! }
//!
//! let cache = Cache::new(FileBackend::open(".cotizador")?);
//!
//! // Store a value
//! cache.set("cotizador-quote", &persisted)?;
//!
//! // Retrieve a value
//! let restored: Option<Persisted> = cache.get("cotizador-quote")?;
//!
//! // Delete a value
//! cache.delete("cotizador-quote")?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{validate_key, Backend, FileBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Backend, Cache, CacheError, FileBackend, MemoryBackend};
}
