//! # Percentage
//!
//! A fraction stored as an integer scaled by 10 000 (four decimal places of
//! the fraction, i.e. hundredths of a percent).
//!
//! ```text
//! fraction 0.1     → scaled 1000  → "10.00%"
//! fraction 0.0825  → scaled  825  → "8.25%"
//! fraction 0.00015 → scaled    2  (half-even on the decimal text)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decimal::{apply_scaled, format_scaled, scale_f64, scaled_to_f64};
use crate::error::{Error, Result};
use crate::money::Money;
use crate::sql::{SqlValue, Scanner, Valuer};

/// Number of fractional digits kept by [`Percentage`].
const DIGITS: u32 = 4;

/// A non-negative fraction with four-decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(i64);

impl Percentage {
    /// Scale factor between the fraction and the stored integer.
    pub const SCALE: i64 = 10_000;

    /// Zero percent.
    pub const ZERO: Percentage = Percentage(0);

    /// Creates a percentage from a fraction (`0.1` is 10%).
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Percentage;
    ///
    /// let rate = Percentage::from_f64(0.0825).unwrap();
    /// assert_eq!(rate.scaled(), 825);
    /// assert_eq!(rate.to_string(), "8.25%");
    /// assert!(Percentage::from_f64(-0.1).is_err());
    /// ```
    pub fn from_f64(fraction: f64) -> Result<Self> {
        if fraction < 0.0 {
            return Err(Error::invalid("percentage cannot be negative").with_context("input", fraction));
        }
        scale_f64(fraction, DIGITS).map(Percentage)
    }

    /// Creates a percentage from its stored integer form (`825` is 8.25%).
    pub fn from_scaled(scaled: i64) -> Result<Self> {
        if scaled < 0 {
            return Err(Error::invalid("percentage cannot be negative").with_context("input", scaled));
        }
        Ok(Percentage(scaled))
    }

    #[inline]
    pub const fn scaled(&self) -> i64 {
        self.0
    }

    /// The fraction as a float (display/serialization only).
    pub fn to_f64(&self) -> f64 {
        scaled_to_f64(self.0, DIGITS)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Always false for values built through this API; kept for callers
    /// that branch on sign.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies the percentage to an amount with banker's rounding.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money, Percentage};
    ///
    /// let price = Money::new(10000, Currency::Brl).unwrap();
    /// let tenth = Percentage::from_f64(0.1).unwrap().apply_to(&price).unwrap();
    /// assert_eq!(tenth.to_string(), "BRL 10.00");
    /// ```
    pub fn apply_to(&self, money: &Money) -> Result<Money> {
        if self.is_zero() || money.is_zero() {
            return Ok(Money::zero(money.currency()));
        }
        let amount = apply_scaled(money.amount(), self.0, DIGITS).ok_or_else(|| {
            Error::domain_violation("arithmetic overflow")
                .with_context("operation", "apply_percentage")
                .with_context("amount", money.amount())
        })?;
        Money::new(amount, money.currency())
    }

    /// Sum of two percentages.
    pub fn add(&self, other: &Percentage) -> Result<Percentage> {
        self.0
            .checked_add(other.0)
            .map(Percentage)
            .ok_or_else(|| Error::domain_violation("arithmetic overflow").with_context("operation", "add"))
    }

    /// Difference of two percentages; a negative result is refused.
    pub fn subtract(&self, other: &Percentage) -> Result<Percentage> {
        if other.0 > self.0 {
            return Err(Error::domain_violation("percentage cannot become negative")
                .with_context("left", self.0)
                .with_context("right", other.0));
        }
        Ok(Percentage(self.0 - other.0))
    }
}

/// Percent with two decimals, e.g. `"12.34%"`.
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format_scaled(self.0, 2))
    }
}

impl TryFrom<f64> for Percentage {
    type Error = Error;

    fn try_from(fraction: f64) -> Result<Self> {
        Percentage::from_f64(fraction)
    }
}

impl From<Percentage> for f64 {
    fn from(percentage: Percentage) -> Self {
        percentage.to_f64()
    }
}

impl Valuer for Percentage {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(self.0)
    }
}

impl Scanner for Percentage {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_integer("Percentage")? {
            None => Ok(Percentage::ZERO),
            Some(scaled) => Percentage::from_scaled(scaled),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::error::ErrorCode;

    #[test]
    fn test_from_f64_rounds_half_even() {
        assert_eq!(Percentage::from_f64(0.00005).unwrap().scaled(), 0);
        assert_eq!(Percentage::from_f64(0.00015).unwrap().scaled(), 2);
        assert_eq!(Percentage::from_f64(0.00025).unwrap().scaled(), 2);
        assert_eq!(Percentage::from_f64(0.00035).unwrap().scaled(), 4);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert_eq!(Percentage::from_f64(-0.01).unwrap_err().code(), ErrorCode::Invalid);
        assert_eq!(Percentage::from_f64(f64::NAN).unwrap_err().code(), ErrorCode::Invalid);
        assert_eq!(Percentage::from_scaled(-1).unwrap_err().code(), ErrorCode::Invalid);
    }

    #[test]
    fn test_display_and_float() {
        let rate = Percentage::from_f64(0.1234).unwrap();
        assert_eq!(rate.to_string(), "12.34%");
        assert!((rate.to_f64() - 0.1234).abs() < 1e-12);
        assert_eq!(Percentage::from_f64(1.5).unwrap().to_string(), "150.00%");
        assert!(Percentage::ZERO.is_zero());
        assert!(!rate.is_negative());
    }

    #[test]
    fn test_apply_to_money() {
        let price = Money::new(10000, Currency::Brl).unwrap();
        let tax = Percentage::from_f64(0.1).unwrap().apply_to(&price).unwrap();
        assert_eq!(tax, Money::new(1000, Currency::Brl).unwrap());
        assert_eq!(tax.to_string(), "BRL 10.00");
    }

    #[test]
    fn test_apply_to_rounds_half_even() {
        // 10.00 × 8.25% = 0.825 → 0.82
        let tax = Percentage::from_scaled(825)
            .unwrap()
            .apply_to(&Money::new(1000, Currency::Brl).unwrap())
            .unwrap();
        assert_eq!(tax.amount(), 82);

        // 0.30 × 5% = 0.015 → 0.02
        let tax = Percentage::from_scaled(500)
            .unwrap()
            .apply_to(&Money::new(30, Currency::Brl).unwrap())
            .unwrap();
        assert_eq!(tax.amount(), 2);
    }

    #[test]
    fn test_apply_to_zero_short_circuits() {
        let zero = Money::zero(Currency::Usd);
        let applied = Percentage::from_f64(0.5).unwrap().apply_to(&zero).unwrap();
        assert_eq!(applied, zero);

        let price = Money::new(999, Currency::Eur).unwrap();
        assert_eq!(Percentage::ZERO.apply_to(&price).unwrap(), Money::zero(Currency::Eur));
    }

    #[test]
    fn test_add_and_subtract() {
        let a = Percentage::from_scaled(1500).unwrap();
        let b = Percentage::from_scaled(500).unwrap();
        assert_eq!(a.add(&b).unwrap().scaled(), 2000);
        assert_eq!(a.subtract(&b).unwrap().scaled(), 1000);
        assert_eq!(b.subtract(&a).unwrap_err().code(), ErrorCode::DomainViolation);
        assert_eq!(a.scaled(), 1500);
    }

    #[test]
    fn test_json_and_sql() {
        let rate = Percentage::from_f64(0.1).unwrap();
        assert_eq!(serde_json::to_string(&rate).unwrap(), "0.1");
        assert_eq!(serde_json::from_str::<Percentage>("0.1").unwrap(), rate);
        assert!(serde_json::from_str::<Percentage>("-0.5").is_err());

        assert_eq!(rate.to_sql(), SqlValue::Integer(1000));
        assert_eq!(Percentage::scan(SqlValue::Integer(1000)).unwrap(), rate);
        assert_eq!(Percentage::scan(SqlValue::Null).unwrap(), Percentage::ZERO);
        let err = Percentage::scan(SqlValue::Text("10%".into())).unwrap_err();
        assert_eq!(err.context_value("received_type").unwrap(), "text");
    }
}
