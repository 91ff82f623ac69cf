// Value Objects - currency codes and postal addresses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KernelError, Result};
use crate::urn::require_non_blank;

// ============================================================================
// CURRENCY
// ============================================================================

/// ISO 4217 codes accepted by the platform.
const SUPPORTED_CURRENCIES: [&str; 18] = [
    "CAD", "USD", "EUR", "GBP", "JPY", "AUD", "CHF", "CNY", "HKD", "NZD", "SEK", "KRW", "SGD",
    "NOK", "MXN", "INR", "BRL", "ZAR",
];

/// A supported ISO 4217 currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency {
    code: &'static str,
}

impl Currency {
    pub const CAD: Currency = Currency { code: "CAD" };
    pub const USD: Currency = Currency { code: "USD" };
    pub const EUR: Currency = Currency { code: "EUR" };
    pub const GBP: Currency = Currency { code: "GBP" };

    /// Checks run in order: blank, length, case, letters, membership.
    pub fn of(code: &str) -> Result<Self> {
        require_non_blank(code, "Currency code")?;

        let length = code.chars().count();
        if length != 3 {
            return Err(KernelError::format(format!(
                "Currency code must be exactly 3 characters, got: {length}"
            )));
        }
        if code != code.to_uppercase() {
            return Err(KernelError::format(format!(
                "Currency code must be uppercase, got: {code}"
            )));
        }
        if !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(KernelError::format(format!(
                "Currency code must contain only uppercase letters, got: {code}"
            )));
        }

        SUPPORTED_CURRENCIES
            .into_iter()
            .find(|supported| *supported == code)
            .map(|code| Currency { code })
            .ok_or_else(|| KernelError::format(format!("Invalid ISO 4217 currency code: {code}")))
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Currency {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = KernelError;

    fn try_from(value: String) -> Result<Self> {
        Self::of(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.code.to_string()
    }
}

// ============================================================================
// ADDRESS
// ============================================================================

/// Postal address. A blank second line is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AddressFields")]
pub struct Address {
    address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line2: Option<String>,
    city: String,
    state_province: String,
    zip_postal_code: String,
    country_code: String,
}

/// Unvalidated wire shape of [`Address`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressFields {
    address_line1: String,
    #[serde(default)]
    address_line2: Option<String>,
    city: String,
    state_province: String,
    zip_postal_code: String,
    country_code: String,
}

impl TryFrom<AddressFields> for Address {
    type Error = KernelError;

    fn try_from(fields: AddressFields) -> Result<Self> {
        Address::new(
            &fields.address_line1,
            fields.address_line2.as_deref(),
            &fields.city,
            &fields.state_province,
            &fields.zip_postal_code,
            &fields.country_code,
        )
    }
}

impl Address {
    pub fn new(
        address_line1: &str,
        address_line2: Option<&str>,
        city: &str,
        state_province: &str,
        zip_postal_code: &str,
        country_code: &str,
    ) -> Result<Self> {
        require_non_blank(address_line1, "Address line 1")?;
        require_non_blank(city, "City")?;
        require_non_blank(state_province, "State/Province")?;
        require_non_blank(zip_postal_code, "Zip/Postal code")?;

        let country_ok =
            country_code.len() == 2 && country_code.bytes().all(|b| b.is_ascii_uppercase());
        if !country_ok {
            return Err(KernelError::format(
                "Country code must be exactly 2 uppercase letters (ISO 3166-1 alpha-2)",
            ));
        }

        Ok(Address {
            address_line1: address_line1.to_string(),
            address_line2: address_line2
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
            city: city.to_string(),
            state_province: state_province.to_string(),
            zip_postal_code: zip_postal_code.to_string(),
            country_code: country_code.to_string(),
        })
    }

    pub fn address_line1(&self) -> &str {
        &self.address_line1
    }

    pub fn address_line2(&self) -> Option<&str> {
        self.address_line2.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state_province(&self) -> &str {
        &self.state_province
    }

    pub fn zip_postal_code(&self) -> &str {
        &self.zip_postal_code
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Multi-line mailing label.
    pub fn formatted(&self) -> String {
        let mut lines = vec![self.address_line1.clone()];
        if let Some(line2) = &self.address_line2 {
            lines.push(line2.clone());
        }
        lines.push(format!(
            "{}, {} {}",
            self.city, self.state_province, self.zip_postal_code
        ));
        lines.push(self.country_code.clone());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toronto(line2: Option<&str>) -> Result<Address> {
        Address::new("100 King St W", line2, "Toronto", "ON", "M5X 1A9", "CA")
    }

    #[test]
    fn test_currency_of_supported_code() {
        assert_eq!(Currency::of("CAD").unwrap(), Currency::CAD);
        assert_eq!(Currency::of("JPY").unwrap().code(), "JPY");
        assert_eq!("GBP".parse::<Currency>().unwrap(), Currency::GBP);
    }

    #[test]
    fn test_currency_checks_in_order() {
        let cases = [
            ("  ", "Currency code cannot be null or blank"),
            ("CA", "Currency code must be exactly 3 characters, got: 2"),
            ("CADX", "Currency code must be exactly 3 characters, got: 4"),
            ("cad", "Currency code must be uppercase, got: cad"),
            ("C4D", "Currency code must contain only uppercase letters, got: C4D"),
            ("XYZ", "Invalid ISO 4217 currency code: XYZ"),
        ];
        for (code, message) in cases {
            assert_eq!(Currency::of(code).unwrap_err().to_string(), message, "{code}");
        }
    }

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&Currency::USD).unwrap(), "\"USD\"");
        let eur: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(eur, Currency::EUR);
        assert!(serde_json::from_str::<Currency>("\"usd\"").is_err());
    }

    #[test]
    fn test_address_normalizes_blank_second_line() {
        assert_eq!(toronto(Some("   ")).unwrap().address_line2(), None);
        assert_eq!(toronto(None).unwrap(), toronto(Some("")).unwrap());
        assert_eq!(toronto(Some("Suite 5")).unwrap().address_line2(), Some("Suite 5"));
    }

    #[test]
    fn test_address_required_fields() {
        let err = Address::new(" ", None, "Toronto", "ON", "M5X", "CA").unwrap_err();
        assert_eq!(err.to_string(), "Address line 1 cannot be null or blank");
        let err = Address::new("1 Main", None, "", "ON", "M5X", "CA").unwrap_err();
        assert_eq!(err.to_string(), "City cannot be null or blank");
        let err = Address::new("1 Main", None, "Toronto", "", "M5X", "CA").unwrap_err();
        assert_eq!(err.to_string(), "State/Province cannot be null or blank");
        let err = Address::new("1 Main", None, "Toronto", "ON", " ", "CA").unwrap_err();
        assert_eq!(err.to_string(), "Zip/Postal code cannot be null or blank");
    }

    #[test]
    fn test_address_country_code() {
        for bad in ["ca", "CAN", "C", "C1", ""] {
            let err = Address::new("1 Main", None, "Toronto", "ON", "M5X", bad).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Country code must be exactly 2 uppercase letters (ISO 3166-1 alpha-2)"
            );
        }
    }

    #[test]
    fn test_address_formatted() {
        assert_eq!(
            toronto(None).unwrap().formatted(),
            "100 King St W\nToronto, ON M5X 1A9\nCA"
        );
        assert_eq!(
            toronto(Some("Floor 3")).unwrap().formatted(),
            "100 King St W\nFloor 3\nToronto, ON M5X 1A9\nCA"
        );
    }

    #[test]
    fn test_address_serde_validates_on_input() {
        let address = toronto(Some("Floor 3")).unwrap();
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["addressLine1"], "100 King St W");
        assert_eq!(json["countryCode"], "CA");
        let back: Address = serde_json::from_value(json).unwrap();
        assert_eq!(back, address);

        let invalid = serde_json::json!({
            "addressLine1": "1 Main",
            "city": "Toronto",
            "stateProvince": "ON",
            "zipPostalCode": "M5X",
            "countryCode": "ca"
        });
        assert!(serde_json::from_value::<Address>(invalid).is_err());
    }
}
