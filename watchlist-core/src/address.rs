//! Mailing and crypto addresses.

use serde::{Deserialize, Serialize};

/// A structured mailing address with optional country.
///
/// List data ships addresses as single comma-joined strings
/// (`"57 B. Polyanka ul., Moscow, 119180, RU"`); [`Address::parse`] splits
/// them positionally. The structured form only feeds scoring, which
/// compares canonical joined text, so the split is a heuristic rather than
/// full postal parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub line1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    /// Parse a single comma-joined address string.
    ///
    /// Segments are assigned positionally: street, city, then postal code
    /// or region. A trailing two-letter uppercase segment is taken as the
    /// country code.
    pub fn parse(input: &str) -> Address {
        let mut segments: Vec<&str> = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut addr = Address::default();

        if let Some(last) = segments.last() {
            if last.len() == 2 && last.chars().all(|c| c.is_ascii_uppercase()) {
                addr.country = Some((*last).to_string());
                segments.pop();
            }
        }

        let mut segments = segments.into_iter();
        if let Some(line1) = segments.next() {
            addr.line1 = line1.to_string();
        }
        if let Some(city) = segments.next() {
            addr.city = city.to_string();
        }
        for rest in segments {
            // Numeric-looking segments are postal codes, the rest is region
            if rest.chars().all(|c| c.is_ascii_digit() || c == '-') {
                addr.postal_code = rest.to_string();
            } else if addr.state.is_empty() {
                addr.state = rest.to_string();
            }
        }

        addr
    }

    /// All populated segments joined with single spaces, for scoring.
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for part in [
            self.line1.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_deref().unwrap_or(""),
        ] {
            if part.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(part);
        }
        out
    }

    /// Whether no segment is populated.
    pub fn is_empty(&self) -> bool {
        self.line1.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.postal_code.is_empty()
            && self.country.is_none()
    }
}

/// A cryptocurrency address: currency code plus address string.
///
/// Matching is exact on both components. Some currencies have
/// case-insensitive address spaces; a per-currency policy would slot in
/// here, but exact comparison is the safe default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAddress {
    pub currency: String,
    pub address: String,
}

impl CryptoAddress {
    pub fn new(currency: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            address: address.into(),
        }
    }

    /// Exact match on currency and address.
    pub fn matches(&self, other: &CryptoAddress) -> bool {
        self.currency == other.currency && self.address == other.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_address() {
        let addr = Address::parse("57 B. Polyanka ul., Moscow, 119180, RU");
        assert_eq!(addr.line1, "57 B. Polyanka ul.");
        assert_eq!(addr.city, "Moscow");
        assert_eq!(addr.postal_code, "119180");
        assert_eq!(addr.country.as_deref(), Some("RU"));
    }

    #[test]
    fn test_parse_city_country() {
        let addr = Address::parse("Beijing, CN");
        assert_eq!(addr.line1, "Beijing");
        assert_eq!(addr.country.as_deref(), Some("CN"));
        assert!(addr.city.is_empty());
    }

    #[test]
    fn test_parse_with_region() {
        let addr = Address::parse("No. 34 Mansour Street, Tehran, Tehran Province, IR");
        assert_eq!(addr.line1, "No. 34 Mansour Street");
        assert_eq!(addr.city, "Tehran");
        assert_eq!(addr.state, "Tehran Province");
        assert_eq!(addr.country.as_deref(), Some("IR"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(Address::parse("").is_empty());
        assert!(Address::parse(" , , ").is_empty());
    }

    #[test]
    fn test_joined_skips_empty_segments() {
        let addr = Address::parse("Beijing, CN");
        assert_eq!(addr.joined(), "Beijing CN");
    }

    #[test]
    fn test_crypto_exact_match() {
        let a = CryptoAddress::new("XBT", "x123456");
        assert!(a.matches(&CryptoAddress::new("XBT", "x123456")));
        assert!(!a.matches(&CryptoAddress::new("XBT", "X123456")));
        assert!(!a.matches(&CryptoAddress::new("ETH", "x123456")));
    }
}
