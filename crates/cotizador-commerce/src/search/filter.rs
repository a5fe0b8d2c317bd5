//! Catalog filter predicates.
//!
//! Each filter is a pure predicate over one product field. Filters never
//! depend on each other, so any set of them can be ANDed in any order.

use std::str::FromStr;

use crate::catalog::{CategoryRepository, Product};
use crate::error::CommerceError;
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// Availability facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    /// No availability constraint.
    #[default]
    All,
    /// Ships from stock.
    InStock,
    /// Made to order.
    OnOrder,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::All => "all",
            Availability::InStock => "inStock",
            Availability::OnOrder => "onOrder",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Availability::All => "Todos",
            Availability::InStock => "En stock",
            Availability::OnOrder => "Bajo pedido",
        }
    }

    /// Check whether a product passes this facet.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Availability::All => true,
            Availability::InStock => product.in_stock,
            Availability::OnOrder => !product.in_stock,
        }
    }
}

impl FromStr for Availability {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "" => Ok(Availability::All),
            "inStock" | "in-stock" | "in_stock" => Ok(Availability::InStock),
            "onOrder" | "on-order" | "on_order" => Ok(Availability::OnOrder),
            other => Err(CommerceError::UnknownAvailability(other.to_string())),
        }
    }
}

/// A resolved catalog filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Case-insensitive substring over name, SKU, and description.
    /// Holds the lowercased needle.
    Text(String),
    /// Products in one category.
    Category(CategoryId),
    /// Availability facet.
    Availability(Availability),
}

impl Filter {
    /// Create a text filter, or `None` for a blank query.
    pub fn text(query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            None
        } else {
            Some(Filter::Text(query.to_lowercase()))
        }
    }

    /// Resolve a category slug, or `None` if the slug is unknown.
    pub fn category<C>(slug: &str, categories: &C) -> Option<Self>
    where
        C: CategoryRepository + ?Sized,
    {
        categories
            .find_by_slug(slug)
            .map(|category| Filter::Category(category.id))
    }

    /// Create an availability filter, or `None` for [`Availability::All`].
    pub fn availability(mode: Availability) -> Option<Self> {
        match mode {
            Availability::All => None,
            mode => Some(Filter::Availability(mode)),
        }
    }

    /// Check whether a product passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Text(needle) => product.contains_text(needle),
            Filter::Category(id) => product.category_id == *id,
            Filter::Availability(mode) => mode.matches(product),
        }
    }
}

/// Products whose name, SKU, or description contains `query`, ignoring
/// case. A blank query returns the input unchanged.
pub fn search_by_text<'a, I>(query: &str, products: I) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    retain(Filter::text(query), products)
}

/// Products in the category named by `slug`. An unknown slug returns the
/// input unchanged.
pub fn filter_by_category<'a, C, I>(slug: &str, categories: &C, products: I) -> Vec<&'a Product>
where
    C: CategoryRepository + ?Sized,
    I: IntoIterator<Item = &'a Product>,
{
    let filter = Filter::category(slug, categories);
    if filter.is_none() {
        tracing::debug!(slug, "unknown category slug, skipping category filter");
    }
    retain(filter, products)
}

/// Products passing the availability facet.
pub fn filter_by_availability<'a, I>(mode: Availability, products: I) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    retain(Filter::availability(mode), products)
}

fn retain<'a, I>(filter: Option<Filter>, products: I) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    match filter {
        Some(filter) => products.into_iter().filter(|p| filter.matches(p)).collect(),
        None => products.into_iter().collect(),
    }
}
