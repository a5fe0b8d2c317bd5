//! Product types.

use crate::catalog::Category;
use crate::ids::{CategoryId, ProductId};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A spare part in the catalog.
///
/// Products are created once when the catalog loads and never mutated
/// afterwards. Field names serialize in camelCase so persisted carts and
/// catalog files share one shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Stock keeping unit (unique, shown to customers).
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Category name (denormalized for display).
    #[serde(default)]
    pub category_name: String,
    /// Image URLs, primary first.
    #[serde(default)]
    pub images: Vec<String>,
    /// Technical specifications in display order.
    #[serde(default)]
    pub technical_specs: TechnicalSpecs,
    /// Equipment models this part fits.
    #[serde(default)]
    pub compatible_models: Vec<String>,
    /// Whether the part can be requested for a quote.
    #[serde(default = "default_true")]
    pub available_for_quote: bool,
    /// Whether the part ships from stock (otherwise made to order).
    #[serde(default)]
    pub in_stock: bool,
    /// Estimated delivery time in days.
    #[serde(default)]
    pub estimated_delivery_days: u32,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new in-stock product in `category`.
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        category: &Category,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            description: String::new(),
            category_id: category.id,
            category_name: category.name.clone(),
            images: Vec::new(),
            technical_specs: TechnicalSpecs::new(),
            compatible_models: Vec::new(),
            available_for_quote: true,
            in_stock: true,
            estimated_delivery_days: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn with_spec(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.technical_specs.insert(label, value);
        self
    }

    pub fn with_compatible_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compatible_models.extend(models.into_iter().map(Into::into));
        self
    }

    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn with_delivery_days(mut self, days: u32) -> Self {
        self.estimated_delivery_days = days;
        self
    }

    /// Check whether a lowercased needle occurs in the name, SKU, or
    /// description.
    pub fn contains_text(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.sku.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }

    /// Check if the product is made to order.
    pub fn is_on_order(&self) -> bool {
        !self.in_stock
    }

    /// Customer-facing availability label.
    pub fn availability_label(&self) -> &'static str {
        if self.in_stock {
            "En stock"
        } else {
            "Bajo pedido"
        }
    }

    /// First image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Ordered label → value specification table.
///
/// Serializes as a JSON object; entry order is preserved in both
/// directions. Inserting an existing label replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicalSpecs(Vec<(String, String)>);

impl TechnicalSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a specification.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.0.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TechnicalSpecs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut specs = Self::new();
        for (label, value) in iter {
            specs.insert(label, value);
        }
        specs
    }
}

impl Serialize for TechnicalSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TechnicalSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecsVisitor;

        impl<'de> Visitor<'de> for SpecsVisitor {
            type Value = TechnicalSpecs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of specification labels to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut specs = TechnicalSpecs::new();
                while let Some((label, value)) = access.next_entry::<String, String>()? {
                    specs.insert(label, value);
                }
                Ok(specs)
            }
        }

        deserializer.deserialize_map(SpecsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category::new(CategoryId::new(2), "pernos-fijaciones", "Pernos y Fijaciones")
    }

    #[test]
    fn test_product_creation() {
        let product = Product::new(ProductId::new(4), "PERNO-M36-001", "Perno Liner", &category());
        assert_eq!(product.category_id, CategoryId::new(2));
        assert_eq!(product.category_name, "Pernos y Fijaciones");
        assert!(product.in_stock);
        assert!(product.available_for_quote);
    }

    #[test]
    fn test_contains_text_checks_all_fields() {
        let product = Product::new(ProductId::new(4), "PERNO-M36-001", "Perno Liner", &category())
            .with_description("Grado 10.9 con tuerca");

        assert!(product.contains_text("liner"));
        assert!(product.contains_text("m36"));
        assert!(product.contains_text("tuerca"));
        assert!(!product.contains_text("lifter"));
    }

    #[test]
    fn test_specs_preserve_order() {
        let specs: TechnicalSpecs = [("Material", "Acero"), ("Dureza", "220 HB"), ("Peso", "450 kg")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&specs).unwrap();
        assert_eq!(json, r#"{"Material":"Acero","Dureza":"220 HB","Peso":"450 kg"}"#);

        let back: TechnicalSpecs =
            serde_json::from_str(r#"{"Peso":"1 kg","Ancho":"2 mm","Alto":"3 mm"}"#).unwrap();
        let labels: Vec<&str> = back.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Peso", "Ancho", "Alto"]);
    }

    #[test]
    fn test_specs_insert_replaces_in_place() {
        let mut specs = TechnicalSpecs::new();
        specs.insert("Grado", "10.9");
        specs.insert("Largo", "180 mm");
        specs.insert("Grado", "12.9");

        assert_eq!(specs.len(), 2);
        assert_eq!(specs.get("Grado"), Some("12.9"));
        assert_eq!(specs.iter().next(), Some(("Grado", "12.9")));
    }

    #[test]
    fn test_product_json_shape() {
        let product = Product::new(ProductId::new(1), "SKU", "Name", &category()).with_stock(false);
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["categoryId"], 2);
        assert_eq!(value["inStock"], false);
        assert_eq!(value["estimatedDeliveryDays"], 0);
    }
}
