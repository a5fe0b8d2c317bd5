//! Human-facing quote reference codes (`COT-2026-10-0042`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommerceError;

const PREFIX: &str = "COT";

/// Exclusive upper bound of the random serial.
const SERIAL_RANGE: u16 = 9999;

/// Reference code shown to the customer after submitting a request.
///
/// Codes are not guaranteed unique; the serial is random within the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuoteReference {
    year: i32,
    month: u32,
    serial: u16,
}

impl QuoteReference {
    /// Generate a code for the current local month.
    pub fn generate() -> Self {
        let now = Local::now();
        let serial = rand::rng().random_range(0..SERIAL_RANGE);
        Self {
            year: now.year(),
            month: now.month(),
            serial,
        }
    }

    /// Build a code from its parts.
    pub fn from_parts(year: i32, month: u32, serial: u16) -> Result<Self, CommerceError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) || serial > 9999 {
            return Err(CommerceError::InvalidReference(format!(
                "{PREFIX}-{year}-{month:02}-{serial:04}"
            )));
        }
        Ok(Self { year, month, serial })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn serial(&self) -> u16 {
        self.serial
    }
}

impl fmt::Display for QuoteReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}-{:04}-{:02}-{:04}",
            self.year, self.month, self.serial
        )
    }
}

impl FromStr for QuoteReference {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CommerceError::InvalidReference(s.to_string());

        let parts: Vec<&str> = s.trim().split('-').collect();
        let [prefix, year, month, serial] = parts.as_slice() else {
            return Err(invalid());
        };
        if *prefix != PREFIX
            || year.len() != 4
            || month.len() != 2
            || serial.len() != 4
            || ![year, month, serial]
                .iter()
                .all(|p| p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(invalid());
        }

        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        let serial = serial.parse().map_err(|_| invalid())?;
        Self::from_parts(year, month, serial).map_err(|_| invalid())
    }
}

impl Serialize for QuoteReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuoteReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads() {
        let reference = QuoteReference::from_parts(2026, 3, 42).unwrap();
        assert_eq!(reference.to_string(), "COT-2026-03-0042");
    }

    #[test]
    fn test_generate_matches_format() {
        let now = Local::now();
        for _ in 0..50 {
            let reference = QuoteReference::generate();
            let text = reference.to_string();
            assert_eq!(text.len(), 16);
            assert!(text.starts_with(&format!("COT-{:04}-{:02}-", now.year(), now.month())));
            assert!(reference.serial() < 9999);
            assert_eq!(text.parse::<QuoteReference>().unwrap(), reference);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "COT-2026-10",
            "QTE-2026-10-0001",
            "COT-2026-13-0001",
            "COT-2026-1-0001",
            "COT-2026-10-001",
            "COT-2026-10-00a1",
            "COT-2026-10-0001-9",
        ] {
            assert!(bad.parse::<QuoteReference>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let reference = QuoteReference::from_parts(2025, 12, 7).unwrap();
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, r#""COT-2025-12-0007""#);
        let back: QuoteReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }
}
