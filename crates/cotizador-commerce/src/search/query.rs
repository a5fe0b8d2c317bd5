//! Catalog query builder.

use crate::catalog::{CategoryRepository, Product, ProductRepository};
use crate::search::{Availability, Filter};
use serde::{Deserialize, Serialize};

/// The catalog page's filter state: free text, category slug, and
/// availability facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search.
    #[serde(default)]
    pub text: String,
    /// Category slug; empty means all categories.
    #[serde(default)]
    pub category: String,
    /// Availability facet.
    #[serde(default)]
    pub availability: Availability,
}

impl CatalogQuery {
    /// Create an empty query (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `search`, `category`, and `availability` from a URL query
    /// string. Unknown keys and unparseable availability values are ignored.
    pub fn from_query_string(qs: &str) -> Self {
        let mut query = Self::new();

        for pair in qs.trim_start_matches('?').split('&') {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = urlencoding_decode(parts.next().unwrap_or(""));

            match key {
                "search" => query.text = value,
                "category" => query.category = value,
                "availability" => query.availability = value.parse().unwrap_or_default(),
                _ => {}
            }
        }

        query
    }

    /// Set the text query.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the category slug.
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = slug.into();
        self
    }

    /// Set the availability facet.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Whether any filter is set. Blank text counts as a set filter, the
    /// way the catalog's "clear filters" control treats it.
    pub fn has_filters(&self) -> bool {
        !self.text.is_empty() || !self.category.is_empty() || self.availability != Availability::All
    }

    /// Reset every filter.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Resolve into independent predicates.
    ///
    /// A blank text query, an empty or unknown category slug, and
    /// [`Availability::All`] contribute no predicate.
    pub fn filters<C>(&self, categories: &C) -> Vec<Filter>
    where
        C: CategoryRepository + ?Sized,
    {
        let category = if self.category.is_empty() {
            None
        } else {
            let resolved = Filter::category(&self.category, categories);
            if resolved.is_none() {
                tracing::debug!(slug = %self.category, "unknown category slug, ignoring");
            }
            resolved
        };

        [
            Filter::text(&self.text),
            category,
            Filter::availability(self.availability),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Run the query over a product slice, preserving its order.
    pub fn apply<'a, C>(&self, categories: &C, products: &'a [Product]) -> Vec<&'a Product>
    where
        C: CategoryRepository + ?Sized,
    {
        let filters = self.filters(categories);
        products
            .iter()
            .filter(|p| filters.iter().all(|f| f.matches(p)))
            .collect()
    }

    /// Run the query over a full catalog.
    pub fn execute<'a, R>(&self, catalog: &'a R) -> Vec<&'a Product>
    where
        R: ProductRepository + CategoryRepository,
    {
        let products = ProductRepository::list_all(catalog);
        let results = self.apply(catalog, products);
        tracing::debug!(
            text = %self.text,
            category = %self.category,
            availability = self.availability.as_str(),
            matched = results.len(),
            total = products.len(),
            "catalog query"
        );
        results
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Simple URL decoding (`+` and `%XX`), tolerant of malformed escapes.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
