//! # Money
//!
//! Currency-tagged amounts held as whole minor units (centavos, cents, yen).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Money { amount: 1050, currency: BRL }   →  "BRL 10.50"                 │
//! │  Money { amount: 100,  currency: JPY }   →  "JPY 100"                   │
//! │                                                                         │
//! │  split(BRL 100.00, 3) = [33.34, 33.33, 33.33]                           │
//! │    the leftover centavo goes to the first share, the sum is exact       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arithmetic never crosses currencies and never wraps: a mismatch or an
//! overflow is a `DomainViolation`.
//!
//! ## Usage
//! ```rust
//! use valor_core::{Currency, Money};
//!
//! let price = Money::new(1050, Currency::Brl).unwrap();
//! assert_eq!(price.to_string(), "BRL 10.50");
//!
//! let doubled = price.multiply(2).unwrap();
//! let total = doubled.add(&Money::new(500, Currency::Brl).unwrap()).unwrap();
//! assert_eq!(total.amount(), 2600);
//!
//! // Mixing currencies is a domain violation, not a silent conversion
//! let dollars = Money::new(100, Currency::Usd).unwrap();
//! assert!(price.add(&dollars).is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::decimal::{format_scaled, scaled_to_f64};
use crate::dto::MoneyDto;
use crate::error::{Error, Result};
use crate::sql::{SqlValue, Scanner, Valuer};

// =============================================================================
// Money Type
// =============================================================================

/// Upper bound for [`Money::split`]; each part is materialized.
pub const MAX_SPLIT_PARTS: i64 = 1_000_000;

/// A monetary value in the smallest unit of its currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative amounts represent debts and refunds
/// - **Currency tag**: arithmetic across currencies is refused
/// - **Default**: zero with [`Currency::Empty`], the value a NULL column scans to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "MoneyDto", into = "MoneyDto")]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Creates Money from minor units (cents for BRL).
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money};
    ///
    /// let debt = Money::new(-550, Currency::Brl).unwrap();
    /// assert_eq!(debt.to_string(), "BRL -5.50");
    /// assert!(Money::new(100, Currency::Empty).is_err());
    /// ```
    pub fn new(amount: i64, currency: Currency) -> Result<Self> {
        if currency.is_empty() {
            return Err(Error::invalid("money requires a currency").with_context("amount", amount));
        }
        Ok(Money { amount, currency })
    }

    /// Creates Money from whole major units (reais, dollars).
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money};
    ///
    /// assert_eq!(Money::from_major(10, Currency::Brl).unwrap().amount(), 1000);
    /// assert_eq!(Money::from_major(10, Currency::Jpy).unwrap().amount(), 10);
    /// ```
    pub fn from_major(major: i64, currency: Currency) -> Result<Self> {
        let factor = 10_i64.pow(currency.decimals());
        let amount = major.checked_mul(factor).ok_or_else(|| {
            Error::invalid("amount out of range")
                .with_context("major", major)
                .with_context("currency", currency.code())
        })?;
        Money::new(amount, currency)
    }

    /// Zero in the given currency.
    ///
    /// `Money::zero(Currency::Empty)` is `Money::default()`, the NULL zero
    /// value; it is the only `Money` without a currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money { amount: 0, currency }
    }

    /// Amount in minor units.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.amount > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Absolute value. `i64::MIN` saturates to `i64::MAX`.
    pub const fn abs(&self) -> Self {
        Money {
            amount: self.amount.saturating_abs(),
            currency: self.currency,
        }
    }

    /// Value in major units. Display and serialization only, never arithmetic.
    pub fn to_f64(&self) -> f64 {
        scaled_to_f64(self.amount, self.currency.decimals())
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Orders two amounts of the same currency.
    pub fn compare(&self, other: &Money) -> Result<Ordering> {
        self.ensure_same_currency(other, "compare")?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn greater_than(&self, other: &Money) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn less_than(&self, other: &Money) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn greater_or_equal(&self, other: &Money) -> Result<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    pub fn less_or_equal(&self, other: &Money) -> Result<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Sum of two amounts in the same currency.
    pub fn add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other, "add")?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| overflow("add", self.amount))?;
        Ok(Money { amount, currency: self.currency })
    }

    /// Difference of two amounts in the same currency. May go negative.
    pub fn subtract(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other, "subtract")?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| overflow("subtract", self.amount))?;
        Ok(Money { amount, currency: self.currency })
    }

    /// Multiplies by an integer factor (quantity of items, installments).
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money};
    ///
    /// let unit_price = Money::new(299, Currency::Brl).unwrap();
    /// assert_eq!(unit_price.multiply(3).unwrap().amount(), 897);
    /// ```
    pub fn multiply(&self, factor: i64) -> Result<Money> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| overflow("multiply", self.amount).with_context("factor", factor))?;
        Ok(Money { amount, currency: self.currency })
    }

    /// Splits the amount into `parts` values whose sum is exactly the original.
    ///
    /// ## Policy
    /// ```text
    /// q = amount / parts, r = amount % parts
    /// the first |r| parts get q + sign(amount), the rest get q
    ///
    /// BRL 100.00 / 3  → [33.34, 33.33, 33.33]
    /// BRL -100.00 / 3 → [-33.34, -33.33, -33.33]
    ///
    /// 1 ≤ parts ≤ MAX_SPLIT_PARTS, otherwise Invalid
    /// ```
    pub fn split(&self, parts: i64) -> Result<Vec<Money>> {
        if parts <= 0 {
            return Err(Error::invalid("split requires at least one part").with_context("parts", parts));
        }
        if parts > MAX_SPLIT_PARTS {
            return Err(Error::invalid("too many parts")
                .with_context("parts", parts)
                .with_context("max", MAX_SPLIT_PARTS));
        }
        let base = self.amount / parts;
        let remainder = (self.amount % parts).unsigned_abs();
        let bump = self.amount.signum();
        Ok((0..parts as u64)
            .map(|i| Money {
                amount: if i < remainder { base + bump } else { base },
                currency: self.currency,
            })
            .collect())
    }

    // =========================================================================
    // SQL (two columns)
    // =========================================================================

    /// Amount and companion currency column.
    pub fn to_sql_columns(&self) -> (SqlValue, SqlValue) {
        (self.to_sql(), self.currency.to_sql())
    }

    /// Rebuilds Money from its amount and currency columns.
    ///
    /// Both NULL yields `Money::default()`; a present amount without a valid
    /// currency is `Invalid`.
    pub fn scan_columns(amount: SqlValue, currency: SqlValue) -> Result<Money> {
        let amount = amount.into_integer("Money")?;
        let currency = Currency::scan(currency)?;
        match amount {
            None if currency.is_empty() => Ok(Money::default()),
            amount => Money::new(amount.unwrap_or(0), currency),
        }
    }

    fn ensure_same_currency(&self, other: &Money, operation: &str) -> Result<()> {
        if self.currency != other.currency {
            return Err(Error::domain_violation("currency mismatch")
                .with_context("operation", operation)
                .with_context("left", self.currency.code())
                .with_context("right", other.currency.code()));
        }
        Ok(())
    }
}

fn overflow(operation: &str, amount: i64) -> Error {
    Error::domain_violation("arithmetic overflow")
        .with_context("operation", operation)
        .with_context("amount", amount)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// `"<CODE> <amount with the currency's minor digits>"`, e.g. `"BRL 99.90"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.currency.code(),
            format_scaled(self.amount, self.currency.decimals())
        )
    }
}

impl TryFrom<MoneyDto> for Money {
    type Error = Error;

    fn try_from(dto: MoneyDto) -> Result<Self> {
        Money::new(dto.amount, Currency::new(&dto.currency)?)
    }
}

impl From<Money> for MoneyDto {
    fn from(money: Money) -> Self {
        MoneyDto {
            amount: money.amount,
            currency: money.currency.code().to_string(),
        }
    }
}

/// Single-column form: the amount. The currency travels in its own column,
/// see [`Money::to_sql_columns`].
impl Valuer for Money {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
