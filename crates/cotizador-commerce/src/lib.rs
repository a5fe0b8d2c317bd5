//! Catalog and quote-request domain for the Cotizador storefront.
//!
//! The storefront sells industrial mill spare parts on a request-for-quote
//! basis: there is no pricing or payment, only a list of parts the customer
//! wants a formal quote for.
//!
//! - **Catalog**: products, categories, and the repository traits over them
//! - **Search**: the catalog query engine (text, category, availability)
//! - **Quote**: the persisted quote cart store, request assembly, and the
//!   cart → form → success flow
//!
//! # Example
//!
//! ```rust,ignore
//! use cotizador_commerce::prelude::*;
//! use cotizador_cache::{Cache, MemoryBackend};
//!
//! let catalog = Catalog::builtin();
//!
//! // In-stock liners only
//! let visible = CatalogQuery::new()
//!     .with_text("revestimiento")
//!     .with_availability(Availability::InStock)
//!     .execute(&catalog);
//!
//! // Put the first hit in the quote cart
//! let mut store = QuoteStore::open(Cache::new(MemoryBackend::new()));
//! store.add_item(visible[0], 2);
//! assert_eq!(store.total_items(), 2);
//! ```

pub mod error;
pub mod ids;

pub mod catalog;
pub mod quote;
pub mod search;

pub use error::CommerceError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{
        Catalog, Category, CategoryRepository, Product, ProductRepository, TechnicalSpecs,
    };

    // Search
    pub use crate::search::{
        filter_by_availability, filter_by_category, search_by_text, Availability, CatalogQuery,
        Filter,
    };

    // Quote
    pub use crate::quote::{
        ClientInfo, DeliveryInfo, Hydration, QuoteConfirmation, QuoteFlow, QuoteItem,
        QuoteReference, QuoteRequest, QuoteStep, QuoteStore, QuoteSummary, Region,
        SubscriptionId, Urgency, QUOTE_STORAGE_KEY,
    };
}
