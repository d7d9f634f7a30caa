//! # Check Digits
//!
//! Pure mod-11 check-digit functions for CPF (11 digits) and CNPJ
//! (14 digits).
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sum = Σ digit[i] × weight[i]                                          │
//! │  r   = sum mod 11                                                      │
//! │  d   = 0 if r < 2 else 11 − r                                          │
//! │                                                                         │
//! │  CPF   d1 weights 10..2 over 9 digits,  d2 weights 11..2 over 10       │
//! │  CNPJ  d1 weights 5 4 3 2 9 8 7 6 5 4 3 2                              │
//! │        d2 weights 6 5 4 3 2 9 8 7 6 5 4 3 2                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs are stripped of every non-digit character first, so
//! `"123.456.789-09"` and `"12345678909"` are the same CPF.

use crate::error::{Error, Result};

/// Weight tables and length for one identifier kind.
#[derive(Debug, Clone, Copy)]
pub struct Scheme {
    pub name: &'static str,
    pub length: usize,
    /// One weight vector per check digit; vector `n` covers the first
    /// `weights[n].len()` digits and produces the digit at that position.
    pub weights: [&'static [u32]; 2],
}

pub const CPF: Scheme = Scheme {
    name: "CPF",
    length: 11,
    weights: [&[10, 9, 8, 7, 6, 5, 4, 3, 2], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]],
};

pub const CNPJ: Scheme = Scheme {
    name: "CNPJ",
    length: 14,
    weights: [
        &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2],
        &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2],
    ],
};

/// Mod-11 check digit of `digits` under `weights` (same length).
pub fn mod11(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&digit, &weight)| digit as u32 * weight)
        .sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => (11 - r) as u8,
    }
}

/// Digit values of every ASCII digit in `input`, in order.
pub fn digits_of(input: &str) -> Vec<u8> {
    input
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

fn to_text(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

impl Scheme {
    /// Validates `input` and returns the canonical digit-only string.
    ///
    /// ## Failures (all `Invalid`)
    /// - wrong length: context `input`, `length`
    /// - all digits equal: context `input`
    /// - wrong check digit: context `input`, `check_digit` (1 or 2)
    pub fn validate(&self, input: &str) -> Result<String> {
        let digits = digits_of(input);

        if digits.len() != self.length {
            return Err(Error::invalid(format!("{} must have {} digits", self.name, self.length))
                .with_context("input", input)
                .with_context("length", digits.len()));
        }

        if digits.iter().all(|&d| d == digits[0]) {
            return Err(Error::invalid(format!("{} cannot repeat a single digit", self.name))
                .with_context("input", input));
        }

        for (index, weights) in self.weights.iter().enumerate() {
            let position = weights.len();
            if digits[position] != mod11(&digits[..position], weights) {
                return Err(Error::invalid(format!("{} check digit mismatch", self.name))
                    .with_context("check_digit", index + 1)
                    .with_context("input", input));
            }
        }

        Ok(to_text(&digits))
    }

    /// Appends both check digits to a base of `length - 2` digits.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::check_digit::CPF;
    ///
    /// assert_eq!(CPF.complete("123456789").unwrap(), "12345678909");
    /// ```
    pub fn complete(&self, base: &str) -> Result<String> {
        let mut digits = digits_of(base);
        if digits.len() != self.length - 2 {
            return Err(Error::invalid(format!("{} base must have {} digits", self.name, self.length - 2))
                .with_context("input", base)
                .with_context("length", digits.len()));
        }
        for weights in self.weights {
            digits.push(mod11(&digits, weights));
        }
        Ok(to_text(&digits))
    }

    /// True when `input` is a valid identifier of this kind.
    pub fn is_valid(&self, input: &str) -> bool {
        self.validate(input).is_ok()
    }
}

/// Shorthand for `CPF.validate(input)`.
pub fn validate_cpf(input: &str) -> Result<String> {
    CPF.validate(input)
}

/// Shorthand for `CNPJ.validate(input)`.
pub fn validate_cnpj(input: &str) -> Result<String> {
    CNPJ.validate(input)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod11_rule() {
        // sum 210 → r = 1 → 0
        assert_eq!(mod11(&[1, 2, 3, 4, 5, 6, 7, 8, 9], CPF.weights[0]), 0);
        // sum 255 → r = 2 → 9
        assert_eq!(mod11(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0], CPF.weights[1]), 9);
    }

    #[test]
    fn test_validate_cpf() {
        assert_eq!(validate_cpf("123.456.789-09").unwrap(), "12345678909");
        assert_eq!(validate_cpf("529.982.247-25").unwrap(), "52998224725");
    }

    #[test]
    fn test_validate_cnpj() {
        assert_eq!(validate_cnpj("11.222.333/0001-81").unwrap(), "11222333000181");
        assert_eq!(validate_cnpj("11444777000161").unwrap(), "11444777000161");
    }

    #[test]
    fn test_reports_which_check_digit_failed() {
        let err = validate_cpf("123.456.789-19").unwrap_err();
        assert_eq!(err.context_value("check_digit").unwrap(), 1);

        let err = validate_cpf("123.456.789-00").unwrap_err();
        assert_eq!(err.context_value("check_digit").unwrap(), 2);
        assert_eq!(err.context_value("input").unwrap(), "123.456.789-00");

        let err = validate_cnpj("11.222.333/0001-91").unwrap_err();
        assert_eq!(err.context_value("check_digit").unwrap(), 1);
        let err = validate_cnpj("11.222.333/0001-80").unwrap_err();
        assert_eq!(err.context_value("check_digit").unwrap(), 2);
    }

    #[test]
    fn test_rejects_length_and_repeats() {
        let err = validate_cpf("1234567890").unwrap_err();
        assert_eq!(err.context_value("length").unwrap(), 10);
        assert!(validate_cpf("000.000.000-00").is_err());
        assert!(validate_cpf("99999999999").is_err());
        assert!(validate_cnpj("00000000000000").is_err());
        assert!(validate_cnpj("").is_err());
    }

    #[test]
    fn test_complete() {
        assert_eq!(CPF.complete("529982247").unwrap(), "52998224725");
        assert_eq!(CNPJ.complete("112223330001").unwrap(), "11222333000181");
        assert!(CNPJ.complete("123").is_err());
    }
}
