//! # Quantity
//!
//! A non-negative decimal amount of a registered unit.
//!
//! ```text
//! precision = 3, unit KG registered
//!
//! Quantity::new(1.57, "kg") → { value: 1570, unit: KG, precision: 3 } → "1.570 KG"
//!
//! × BRL 10.31 (1031)         → 1031 × 1.570 = 1618.67 → BRL 16.19
//! ```
//!
//! Precision is captured when the quantity is built; changing the registry's
//! default later does not touch existing values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decimal::{apply_scaled, format_scaled, fraction_digits, parse_scaled, scale_f64, scaled_to_f64};
use crate::dto::QuantityDto;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::sql::{SqlValue, Scanner, Valuer};
use crate::units::{self, Unit, UnitRegistry, MAX_PRECISION};

/// A quantity of a registered unit, scaled by `10^precision`.
///
/// `Quantity::default()` (zero, no unit) is the value a NULL column scans to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "QuantityDto", into = "QuantityDto")]
pub struct Quantity {
    value: i64,
    unit: Unit,
    precision: u8,
}

impl Quantity {
    /// Builds a quantity against the process-wide registry.
    ///
    /// ## Failures
    /// - `NotFound` when the unit is not registered
    /// - `Invalid` when `value` is negative or not finite
    pub fn new(value: f64, unit: &str) -> Result<Self> {
        Quantity::new_in(units::global(), value, unit)
    }

    /// Builds a quantity against an explicit registry.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Quantity, UnitRegistry};
    ///
    /// let registry = UnitRegistry::new();
    /// registry.register(["KG"]).unwrap();
    /// registry.set_default_precision(3).unwrap();
    ///
    /// let weight = Quantity::new_in(&registry, 1.57, "kg").unwrap();
    /// assert_eq!(weight.value(), 1570);
    /// assert_eq!(weight.to_string(), "1.570 KG");
    /// ```
    pub fn new_in(registry: &UnitRegistry, value: f64, unit: &str) -> Result<Self> {
        Quantity::scaled_in(registry, value, unit, registry.default_precision())
    }

    /// Decodes a serialized float without rounding away any of its digits:
    /// the precision is the registry default or the float's own fractional
    /// digits, whichever is larger.
    fn decode_in(registry: &UnitRegistry, value: f64, unit: &str) -> Result<Self> {
        let digits = fraction_digits(value)?.min(MAX_PRECISION as u32) as u8;
        Quantity::scaled_in(registry, value, unit, registry.default_precision().max(digits))
    }

    fn scaled_in(registry: &UnitRegistry, value: f64, unit: &str, precision: u8) -> Result<Self> {
        let unit = registry.resolve(unit)?;
        if value < 0.0 {
            return Err(Error::invalid("quantity cannot be negative")
                .with_context("input", value)
                .with_context("unit", unit.as_str()));
        }
        let value = scale_f64(value, precision as u32)?;
        Ok(Quantity { value, unit, precision })
    }

    /// Builds a quantity from its scaled integer form.
    ///
    /// ## Failures
    /// - `Invalid` when `value` is negative, `unit` is empty, or `precision`
    ///   exceeds [`MAX_PRECISION`]
    pub fn from_scaled(value: i64, unit: Unit, precision: u8) -> Result<Self> {
        if value < 0 {
            return Err(Error::invalid("quantity cannot be negative").with_context("input", value));
        }
        if unit.as_str().is_empty() {
            return Err(Error::invalid("quantity requires a unit").with_context("input", value));
        }
        if precision > MAX_PRECISION {
            return Err(Error::invalid("precision out of range").with_context("input", precision));
        }
        Ok(Quantity { value, unit, precision })
    }

    /// Parses the canonical text form (`"1.570 KG"`); the number of
    /// fractional digits becomes the precision.
    pub fn parse(text: &str) -> Result<Self> {
        Quantity::parse_in(units::global(), text)
    }

    /// [`Quantity::parse`] against an explicit registry.
    pub fn parse_in(registry: &UnitRegistry, text: &str) -> Result<Self> {
        let (number, symbol) = text
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::invalid("quantity must look like \"<number> <unit>\"").with_context("input", text))?;
        let unit = registry.resolve(symbol.trim())?;
        let (value, digits) = parse_scaled(number)?;
        Quantity::from_scaled(value, unit, digits as u8)
    }

    /// Scaled integer value.
    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Display/serialization only.
    pub fn to_f64(&self) -> f64 {
        scaled_to_f64(self.value, self.precision as u32)
    }

    pub fn add(&self, other: &Quantity) -> Result<Quantity> {
        self.ensure_compatible(other, "add")?;
        let value = self.value.checked_add(other.value).ok_or_else(|| {
            Error::domain_violation("arithmetic overflow").with_context("operation", "add")
        })?;
        Ok(Quantity { value, ..self.clone() })
    }

    /// Difference; a result below zero is a domain violation.
    pub fn subtract(&self, other: &Quantity) -> Result<Quantity> {
        self.ensure_compatible(other, "subtract")?;
        if other.value > self.value {
            return Err(Error::domain_violation("quantity cannot become negative")
                .with_context("left", self.to_string())
                .with_context("right", other.to_string()));
        }
        Ok(Quantity {
            value: self.value - other.value,
            ..self.clone()
        })
    }

    /// Price of this quantity at `unit_price`, rounded half to even.
    pub fn multiply_by_money(&self, unit_price: &Money) -> Result<Money> {
        if self.is_zero() || unit_price.is_zero() {
            return Ok(Money::zero(unit_price.currency()));
        }
        let amount = apply_scaled(unit_price.amount(), self.value, self.precision as u32).ok_or_else(|| {
            Error::domain_violation("arithmetic overflow")
                .with_context("operation", "multiply_by_money")
                .with_context("quantity", self.to_string())
        })?;
        Money::new(amount, unit_price.currency())
    }

    fn ensure_compatible(&self, other: &Quantity, operation: &str) -> Result<()> {
        if self.unit != other.unit {
            return Err(Error::domain_violation("unit mismatch")
                .with_context("operation", operation)
                .with_context("left", self.unit.as_str())
                .with_context("right", other.unit.as_str()));
        }
        if self.precision != other.precision {
            return Err(Error::domain_violation("precision mismatch")
                .with_context("operation", operation)
                .with_context("left", self.precision)
                .with_context("right", other.precision));
        }
        Ok(())
    }
}

/// `"<value with precision digits> <UNIT>"`, e.g. `"1.570 KG"`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            format_scaled(self.value, self.precision as u32),
            self.unit
        )
    }
}

impl TryFrom<QuantityDto> for Quantity {
    type Error = Error;

    fn try_from(dto: QuantityDto) -> Result<Self> {
        Quantity::decode_in(units::global(), dto.value, &dto.unit)
    }
}

impl From<Quantity> for QuantityDto {
    fn from(quantity: Quantity) -> Self {
        QuantityDto {
            value: quantity.to_f64(),
            unit: quantity.unit.into(),
        }
    }
}

impl Valuer for Quantity {
    fn to_sql(&self) -> SqlValue {
        if *self == Quantity::default() {
            SqlValue::Null
        } else {
            SqlValue::Text(self.to_string())
        }
    }
}

impl Scanner for Quantity {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_text("Quantity")? {
            None => Ok(Quantity::default()),
            Some(text) => Quantity::parse(&text),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
