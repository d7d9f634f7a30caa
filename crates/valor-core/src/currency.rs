//! # Currency
//!
//! Closed set of ISO-4217 codes accepted by [`Money`](crate::Money).
//!
//! `Currency::Empty` is the zero value: it is what a NULL column or a
//! `Default` produces, and it is never accepted by `Money::new`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sql::{SqlValue, Scanner, Valuer};

/// An ISO-4217 currency code from the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// Uninitialized sentinel.
    #[default]
    Empty,
    Brl,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Chf,
    Cad,
    Aud,
    Cny,
    Ars,
    Clp,
    Mxn,
}

impl Currency {
    /// Every valid (non-empty) currency.
    pub const ALL: [Currency; 12] = [
        Currency::Brl,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Chf,
        Currency::Cad,
        Currency::Aud,
        Currency::Cny,
        Currency::Ars,
        Currency::Clp,
        Currency::Mxn,
    ];

    /// Parses a currency code (case-insensitive, surrounding whitespace ignored).
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Currency;
    ///
    /// assert_eq!(Currency::new("brl").unwrap(), Currency::Brl);
    /// assert!(Currency::new("XYZ").is_err());
    /// ```
    pub fn new(code: &str) -> Result<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == normalized)
            .ok_or_else(|| Error::invalid("unknown currency code").with_context("input", code))
    }

    /// The three-letter code, or `""` for [`Currency::Empty`].
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Empty => "",
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Cny => "CNY",
            Currency::Ars => "ARS",
            Currency::Clp => "CLP",
            Currency::Mxn => "MXN",
        }
    }

    /// Digits of the minor unit (2 for cents, 0 for JPY and CLP).
    pub const fn decimals(&self) -> u32 {
        match self {
            Currency::Jpy | Currency::Clp | Currency::Empty => 0,
            _ => 2,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Currency::Empty)
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Currency::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Currency::new(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl Valuer for Currency {
    fn to_sql(&self) -> SqlValue {
        if self.is_empty() {
            SqlValue::Null
        } else {
            SqlValue::Text(self.code().to_string())
        }
    }
}

impl Scanner for Currency {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_text("Currency")? {
            None => Ok(Currency::Empty),
            Some(code) => Currency::new(&code),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(Currency::new("BRL").unwrap(), Currency::Brl);
        assert_eq!(Currency::new(" usd ").unwrap(), Currency::Usd);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        for currency in Currency::ALL {
            assert_eq!(Currency::new(currency.code()).unwrap(), currency);
        }
    }

    #[test]
    fn test_unknown_code_is_invalid() {
        let err = Currency::new("XYZ").unwrap_err();
        assert!(err.is_invalid());
        assert_eq!(err.context_value("input").unwrap(), "XYZ");
        assert!(Currency::new("").is_err());
    }

    #[test]
    fn test_empty_sentinel() {
        let empty = Currency::default();
        assert!(empty.is_empty());
        assert!(!empty.is_valid());
        assert_eq!(empty.to_string(), "");
        assert!(Currency::Brl.is_valid());
    }

    #[test]
    fn test_decimals() {
        assert_eq!(Currency::Brl.decimals(), 2);
        assert_eq!(Currency::Jpy.decimals(), 0);
        assert_eq!(Currency::Clp.decimals(), 0);
    }

    #[test]
    fn test_json() {
        assert_eq!(serde_json::to_string(&Currency::Brl).unwrap(), "\"BRL\"");
        let parsed: Currency = serde_json::from_str("\"usd\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
        assert!(serde_json::from_str::<Currency>("\"XYZ\"").is_err());
    }

    #[test]
    fn test_sql() {
        assert_eq!(Currency::Eur.to_sql(), SqlValue::Text("EUR".into()));
        assert_eq!(Currency::scan(SqlValue::Text("EUR".into())).unwrap(), Currency::Eur);
        assert_eq!(Currency::scan(SqlValue::Null).unwrap(), Currency::Empty);
        let err = Currency::scan(SqlValue::Integer(1)).unwrap_err();
        assert_eq!(err.context_value("received_type").unwrap(), "integer");
    }
}
