//! Quote line items.

use std::fmt;
use std::str::FromStr;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// How urgently the customer needs a line quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Urgency::Normal => "Normal",
            Urgency::Urgent => "Urgente",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Urgency::Normal),
            "urgent" | "urgente" => Ok(Urgency::Urgent),
            other => Err(CommerceError::UnknownUrgency(other.to_string())),
        }
    }
}

/// One line in the quote cart.
///
/// Holds its own copy of the product taken when the line was created, so
/// the cart never depends on the catalog staying unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    /// Product snapshot.
    pub product: Product,
    /// Requested units.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Free-text notes for the sales team.
    #[serde(default)]
    pub notes: String,
    /// Urgency flag.
    #[serde(default)]
    pub urgency: Urgency,
}

fn default_quantity() -> u32 {
    1
}

impl QuoteItem {
    /// Create a line with empty notes and normal urgency.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            notes: String::new(),
            urgency: Urgency::Normal,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    pub fn is_urgent(&self) -> bool {
        self.urgency == Urgency::Urgent
    }
}
