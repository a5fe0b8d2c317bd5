//! Catalog query engine.
//!
//! Pure functions over a product collection: text search, category and
//! availability facets, and the composed [`CatalogQuery`].

mod filter;
mod query;

pub use filter::{
    filter_by_availability, filter_by_category, search_by_text, Availability, Filter,
};
pub use query::CatalogQuery;
