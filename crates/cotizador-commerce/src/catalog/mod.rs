//! Product catalog module.
//!
//! Contains products, categories, the repository traits, and the built-in
//! dataset.

mod category;
mod dataset;
mod product;
mod repository;

pub use category::Category;
pub use product::{Product, TechnicalSpecs};
pub use repository::{Catalog, CategoryRepository, ProductRepository};
