//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(default)]
    pub description: String,
    /// Category image URL.
    #[serde(default)]
    pub image: String,
    /// Number of products in this category, as published by the dataset.
    ///
    /// Not recomputed from the product list; it can disagree with the
    /// actual membership.
    #[serde(default)]
    pub product_count: u32,
}

impl Category {
    /// Create a new category.
    pub fn new(id: CategoryId, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            image: String::new(),
            product_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_product_count(mut self, count: u32) -> Self {
        self.product_count = count;
        self
    }

    /// Check whether the slug is URL-safe (lowercase ASCII, digits, dashes).
    pub fn has_valid_slug(&self) -> bool {
        !self.slug.is_empty()
            && !self.slug.starts_with('-')
            && !self.slug.ends_with('-')
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}
