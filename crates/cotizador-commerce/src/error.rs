//! Commerce error types.
//!
//! Routine states (unknown product ids, unresolvable category slugs,
//! quantities below one) are not errors; the store and query engine treat
//! them as no-ops. These variants cover the genuinely fallible edges.

use thiserror::Error;

/// Errors that can occur in catalog and quote operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The quote has no items to submit.
    #[error("Quote has no items")]
    EmptyQuote,

    /// Required request fields were left blank.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Email address is not plausible.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Unknown delivery region code.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Unknown availability mode.
    #[error("Unknown availability mode: {0}")]
    UnknownAvailability(String),

    /// Unknown urgency value.
    #[error("Unknown urgency: {0}")]
    UnknownUrgency(String),

    /// Malformed quote reference code.
    #[error("Invalid quote reference: {0}")]
    InvalidReference(String),

    /// Invalid quote flow transition.
    #[error("Invalid quote transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Catalog data could not be loaded.
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] cotizador_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
