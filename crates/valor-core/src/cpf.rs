//! # CPF
//!
//! Brazilian individual taxpayer identifier (Cadastro de Pessoas Físicas).
//!
//! ```text
//! input            canonical       formatted
//! 529.982.247-25 → 52998224725  → 529.982.247-25
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::check_digit::CPF;
use crate::error::Result;

/// A validated CPF, stored as its 11 canonical digits.
///
/// `Cpf::default()` is the empty zero value produced by a NULL column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Validates a CPF, formatted or not.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Cpf;
    ///
    /// let cpf = Cpf::new("529.982.247-25").unwrap();
    /// assert_eq!(cpf.as_str(), "52998224725");
    /// assert_eq!(cpf.to_string(), "529.982.247-25");
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        CPF.validate(input).map(Cpf)
    }

    /// A random valid CPF (fixtures, property tests).
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let base: String = (0..9).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect();
            if let Ok(cpf) = CPF.complete(&base).and_then(|digits| Cpf::new(&digits)) {
                return cpf;
            }
        }
    }

    /// Canonical digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `XXX.XXX.XXX-XX`
    pub fn formatted(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

text_value_object!(Cpf);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::sql::{Scanner, SqlValue, Valuer};

    #[test]
    fn test_accepts_formatted_and_bare() {
        let a = Cpf::new("123.456.789-09").unwrap();
        let b = Cpf::new("12345678909").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.formatted(), "123.456.789-09");
    }

    #[test]
    fn test_wrong_check_digit() {
        let err = Cpf::new("123.456.789-00").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
        assert_eq!(err.context_value("check_digit").unwrap(), 2);
        assert_eq!(err.context_value("input").unwrap(), "123.456.789-00");
    }

    #[test]
    fn test_rejects_repeated_digits() {
        for d in 0..10 {
            let input = d.to_string().repeat(11);
            assert!(Cpf::new(&input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_generate_is_valid() {
        for _ in 0..50 {
            let cpf = Cpf::generate();
            assert_eq!(Cpf::new(&cpf.formatted()).unwrap(), cpf);
        }
    }

    #[test]
    fn test_json_is_canonical() {
        let cpf = Cpf::new("529.982.247-25").unwrap();
        assert_eq!(serde_json::to_string(&cpf).unwrap(), "\"52998224725\"");
        assert_eq!(serde_json::from_str::<Cpf>("\"529.982.247-25\"").unwrap(), cpf);
        assert!(serde_json::from_str::<Cpf>("\"52998224724\"").is_err());
    }

    #[test]
    fn test_sql() {
        let cpf = Cpf::new("52998224725").unwrap();
        assert_eq!(cpf.to_sql(), SqlValue::Text("52998224725".into()));
        assert_eq!(Cpf::scan(cpf.to_sql()).unwrap(), cpf);
        assert!(Cpf::scan(SqlValue::Null).unwrap().is_empty());
        assert!(Cpf::scan(SqlValue::Integer(52998224725)).is_err());
    }
}
