//! # Scaled Integer Helpers
//!
//! Every numeric value object stores an `i64` scaled by a power of ten.
//! This module is the single place where non-integer intermediates collapse
//! back into that integer.
//!
//! ## Bankers Rounding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  BANKERS ROUNDING (Round Half to Even)                              │
//! │                                                                     │
//! │    0.5 → 0, 1.5 → 2, 2.5 → 2, 3.5 → 4, -1.5 → -2                   │
//! │                                                                     │
//! │  Floats enter through their shortest decimal text ("0.00015"),     │
//! │  never through their binary expansion (1.4999999999999998e-4).     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Largest supported number of fractional digits.
pub const MAX_SCALE: u32 = 9;

/// 10^digits for `digits <= 18`.
pub(crate) const fn pow10(digits: u32) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < digits {
        result *= 10;
        i += 1;
    }
    result
}

/// Converts a finite float into an exact decimal using its shortest
/// round-trip representation.
pub(crate) fn decimal_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::invalid("value must be a finite number").with_context("input", value.to_string()));
    }
    Decimal::from_str(&value.to_string()).map_err(|e| {
        Error::invalid("value cannot be represented as a decimal")
            .with_context("input", value)
            .with_source(e)
    })
}

/// Scales `value` by `10^digits` and rounds half to even.
///
/// ## Example
/// ```text
/// scale_f64(0.00015, 4) == 2
/// scale_f64(1.57, 3)    == 1570
/// ```
pub(crate) fn scale_f64(value: f64, digits: u32) -> Result<i64> {
    let factor = Decimal::from(pow10(digits));
    decimal_from_f64(value)?
        .checked_mul(factor)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_i64())
        .ok_or_else(|| {
            Error::invalid("value out of range")
                .with_context("input", value)
                .with_context("scale", digits)
        })
}

/// Fractional digits in the shortest decimal text of `value`
/// (`1.575` → 3, `2.50` → 1, `3.0` → 0).
pub(crate) fn fraction_digits(value: f64) -> Result<u32> {
    Ok(decimal_from_f64(value)?.normalize().scale())
}

/// Divides with round-half-to-even. `divisor` must be positive.
pub(crate) fn div_round_half_even(numerator: i128, divisor: i128) -> i128 {
    let quotient = numerator / divisor;
    let twice_remainder = (numerator % divisor).abs() * 2;
    if twice_remainder > divisor || (twice_remainder == divisor && quotient % 2 != 0) {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

/// Computes `round_half_even(amount × scaled / 10^digits)` without
/// intermediate overflow. Returns `None` when the result leaves `i64`.
pub(crate) fn apply_scaled(amount: i64, scaled: i64, digits: u32) -> Option<i64> {
    let product = amount as i128 * scaled as i128;
    i64::try_from(div_round_half_even(product, pow10(digits) as i128)).ok()
}

/// Converts a scaled integer to `f64` (display/serialization only).
pub(crate) fn scaled_to_f64(value: i64, digits: u32) -> f64 {
    value as f64 / pow10(digits) as f64
}

/// Renders a scaled integer with exactly `digits` fractional digits.
pub(crate) fn format_scaled(value: i64, digits: u32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    if digits == 0 {
        return format!("{sign}{magnitude}");
    }
    let factor = pow10(digits) as u64;
    format!(
        "{sign}{}.{:0width$}",
        magnitude / factor,
        magnitude % factor,
        width = digits as usize
    )
}

/// Parses canonical decimal text (`"1.570"`) into `(scaled, digits)`,
/// keeping the number of fractional digits written.
pub(crate) fn parse_scaled(text: &str) -> Result<(i64, u32)> {
    let decimal = Decimal::from_str(text.trim()).map_err(|e| {
        Error::invalid("malformed decimal")
            .with_context("input", text)
            .with_source(e)
    })?;
    let digits = decimal.scale();
    if digits > MAX_SCALE {
        return Err(Error::invalid("too many fractional digits")
            .with_context("input", text)
            .with_context("max", MAX_SCALE));
    }
    let scaled = i64::try_from(decimal.mantissa())
        .map_err(|_| Error::invalid("value out of range").with_context("input", text))?;
    Ok((scaled, digits))
}

// =============================================================================
// Unit Tests
// =============================================================================
