//! Read-only repositories over the catalog.

use std::collections::HashSet;

use crate::catalog::{dataset, Category, Product};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

/// Source of products, in load order.
pub trait ProductRepository {
    /// All products, in repository order.
    fn list_all(&self) -> &[Product];

    /// Look up a product by id.
    fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.list_all().iter().find(|p| p.id == id)
    }
}

/// Source of categories, in load order.
pub trait CategoryRepository {
    /// All categories, in repository order.
    fn list_all(&self) -> &[Category];

    /// Look up a category by slug.
    fn find_by_slug(&self, slug: &str) -> Option<&Category> {
        self.list_all().iter().find(|c| c.slug == slug)
    }
}

/// In-memory catalog backing both repositories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from already-loaded data.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// The built-in mill spare parts dataset.
    pub fn builtin() -> Self {
        Self::new(dataset::categories(), dataset::products())
    }

    /// Load a catalog from a JSON document of the form
    /// `{ "categories": [...], "products": [...] }`.
    ///
    /// Rejects documents with duplicate product ids, SKUs, category ids,
    /// or slugs.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CommerceError::CatalogLoad(e.to_string()))?;
        catalog.check_unique()?;
        tracing::debug!(
            categories = catalog.categories.len(),
            products = catalog.products.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    fn check_unique(&self) -> Result<(), CommerceError> {
        let mut product_ids = HashSet::new();
        let mut skus = HashSet::new();
        for product in &self.products {
            if !product_ids.insert(product.id) {
                return Err(CommerceError::CatalogLoad(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            if !skus.insert(product.sku.as_str()) {
                return Err(CommerceError::CatalogLoad(format!(
                    "duplicate SKU {}",
                    product.sku
                )));
            }
        }

        let mut category_ids = HashSet::new();
        let mut slugs = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id) || !slugs.insert(category.slug.as_str()) {
                return Err(CommerceError::CatalogLoad(format!(
                    "duplicate category {} ({})",
                    category.id, category.slug
                )));
            }
        }
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    pub fn find_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Products belonging to a category, in repository order.
    pub fn products_in_category(&self, id: CategoryId) -> Vec<&Product> {
        self.products.iter().filter(|p| p.category_id == id).collect()
    }

    /// The first `n` products, as featured on the storefront home page.
    pub fn featured(&self, n: usize) -> &[Product] {
        &self.products[..n.min(self.products.len())]
    }
}

impl ProductRepository for Catalog {
    fn list_all(&self) -> &[Product] {
        &self.products
    }
}

impl CategoryRepository for Catalog {
    fn list_all(&self) -> &[Category] {
        &self.categories
    }
}
