//! Quote request assembly and validation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use cotizador_cache::Backend;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::quote::{QuoteItem, QuoteStore};

/// Chilean administrative regions offered for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "I")]
    Tarapaca,
    #[serde(rename = "II")]
    Antofagasta,
    #[serde(rename = "III")]
    Atacama,
    #[serde(rename = "IV")]
    Coquimbo,
    #[serde(rename = "V")]
    Valparaiso,
    #[serde(rename = "RM")]
    Metropolitana,
    #[serde(rename = "VI")]
    OHiggins,
    #[serde(rename = "VII")]
    Maule,
    #[serde(rename = "VIII")]
    Biobio,
    #[serde(rename = "IX")]
    Araucania,
    #[serde(rename = "X")]
    LosLagos,
    #[serde(rename = "XI")]
    Aysen,
    #[serde(rename = "XII")]
    Magallanes,
}

impl Region {
    /// Every region, north to south.
    pub const ALL: [Region; 13] = [
        Region::Tarapaca,
        Region::Antofagasta,
        Region::Atacama,
        Region::Coquimbo,
        Region::Valparaiso,
        Region::Metropolitana,
        Region::OHiggins,
        Region::Maule,
        Region::Biobio,
        Region::Araucania,
        Region::LosLagos,
        Region::Aysen,
        Region::Magallanes,
    ];

    /// Roman-numeral code ("RM" for the capital region).
    pub fn code(&self) -> &'static str {
        match self {
            Region::Tarapaca => "I",
            Region::Antofagasta => "II",
            Region::Atacama => "III",
            Region::Coquimbo => "IV",
            Region::Valparaiso => "V",
            Region::Metropolitana => "RM",
            Region::OHiggins => "VI",
            Region::Maule => "VII",
            Region::Biobio => "VIII",
            Region::Araucania => "IX",
            Region::LosLagos => "X",
            Region::Aysen => "XI",
            Region::Magallanes => "XII",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Tarapaca => "Tarapacá",
            Region::Antofagasta => "Antofagasta",
            Region::Atacama => "Atacama",
            Region::Coquimbo => "Coquimbo",
            Region::Valparaiso => "Valparaíso",
            Region::Metropolitana => "Metropolitana",
            Region::OHiggins => "O'Higgins",
            Region::Maule => "Maule",
            Region::Biobio => "Biobío",
            Region::Araucania => "Araucanía",
            Region::LosLagos => "Los Lagos",
            Region::Aysen => "Aysén",
            Region::Magallanes => "Magallanes",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.display_name())
    }
}

impl FromStr for Region {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Region::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| CommerceError::UnknownRegion(s.trim().to_string()))
    }
}

/// Who is asking for the quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub company: String,
    /// Chilean tax id (RUT). Optional.
    #[serde(rename = "rut", default)]
    pub tax_id: String,
    #[serde(default)]
    pub position: String,
    pub email: String,
    pub phone: String,
}

/// Where the parts should go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub address: String,
    pub city: String,
    pub region: Option<Region>,
    /// Date the customer needs the parts by.
    #[serde(default)]
    pub requested_date: Option<NaiveDate>,
}

impl DeliveryInfo {
    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address.clone(), self.city.clone()];
        if let Some(region) = self.region {
            parts.push(region.display_name().to_string());
        }
        parts.retain(|p| !p.trim().is_empty());
        parts.join(", ")
    }
}

/// A complete request for quote: cart lines plus contact and delivery data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub items: Vec<QuoteItem>,
    pub client: ClientInfo,
    pub delivery: DeliveryInfo,
    /// General remarks for the whole request.
    #[serde(default)]
    pub observations: String,
}

impl QuoteRequest {
    pub fn new(items: Vec<QuoteItem>, client: ClientInfo, delivery: DeliveryInfo) -> Self {
        Self {
            items,
            client,
            delivery,
            observations: String::new(),
        }
    }

    /// Snapshot the store's current lines into a request.
    pub fn from_store<B: Backend>(
        store: &QuoteStore<B>,
        client: ClientInfo,
        delivery: DeliveryInfo,
    ) -> Self {
        Self::new(store.items().to_vec(), client, delivery)
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = observations.into();
        self
    }

    /// Sum of quantities across all lines.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Names of required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let required = [
            ("name", &self.client.name),
            ("company", &self.client.company),
            ("email", &self.client.email),
            ("phone", &self.client.phone),
            ("address", &self.delivery.address),
            ("city", &self.delivery.city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if self.delivery.region.is_none() {
            missing.push("region");
        }
        missing
    }

    /// Check the request can be sent.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.items.is_empty() {
            return Err(CommerceError::EmptyQuote);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::MissingFields(missing));
        }

        if !is_plausible_email(self.client.email.trim()) {
            return Err(CommerceError::InvalidEmail(self.client.email.clone()));
        }

        Ok(())
    }
}

/// One `@`, a non-empty local part, and a dotted domain.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn client() -> ClientInfo {
        ClientInfo {
            name: "Ana Rojas".to_string(),
            company: "Minera Los Andes".to_string(),
            tax_id: "76.123.456-7".to_string(),
            position: "Jefa de mantención".to_string(),
            email: "ana.rojas@losandes.cl".to_string(),
            phone: "+56 9 1234 5678".to_string(),
        }
    }

    fn delivery() -> DeliveryInfo {
        DeliveryInfo {
            address: "Camino a la mina km 12".to_string(),
            city: "Calama".to_string(),
            region: Some(Region::Antofagasta),
            requested_date: NaiveDate::from_ymd_opt(2026, 11, 30),
        }
    }

    fn request() -> QuoteRequest {
        let product = Catalog::builtin().products()[0].clone();
        QuoteRequest::new(vec![QuoteItem::new(product, 2)], client(), delivery())
    }

    #[test]
    fn test_region_codes() {
        assert_eq!("rm".parse::<Region>().unwrap(), Region::Metropolitana);
        assert_eq!(" VIII ".parse::<Region>().unwrap(), Region::Biobio);
        assert!("XIV".parse::<Region>().is_err());
        assert_eq!(Region::ALL.len(), 13);
        assert_eq!(serde_json::to_string(&Region::OHiggins).unwrap(), r#""VI""#);
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
        assert_eq!(request().total_units(), 2);
    }

    #[test]
    fn test_empty_quote_checked_first() {
        let mut req = request();
        req.items.clear();
        req.client = ClientInfo::default();
        assert!(matches!(req.validate(), Err(CommerceError::EmptyQuote)));
    }

    #[test]
    fn test_missing_fields_in_form_order() {
        let mut req = request();
        req.client.company = "  ".to_string();
        req.client.phone.clear();
        req.delivery.region = None;
        // Optional fields never count.
        req.client.tax_id.clear();
        req.client.position.clear();

        match req.validate() {
            Err(CommerceError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["company", "phone", "region"])
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_email() {
        for bad in ["ana", "ana@", "@losandes.cl", "ana@losandes", "ana @x.cl", "a@b@c.cl"] {
            let mut req = request();
            req.client.email = bad.to_string();
            assert!(
                matches!(req.validate(), Err(CommerceError::InvalidEmail(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_client_serializes_rut() {
        let json = serde_json::to_value(client()).unwrap();
        assert_eq!(json["rut"], "76.123.456-7");
        assert!(json.get("taxId").is_none());
    }

    #[test]
    fn test_delivery_one_line() {
        assert_eq!(
            delivery().one_line(),
            "Camino a la mina km 12, Calama, Antofagasta"
        );
    }
}
