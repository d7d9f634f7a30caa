//! # CNPJ
//!
//! Brazilian legal-entity identifier (Cadastro Nacional da Pessoa Jurídica).
//!
//! ```text
//! input                canonical         formatted
//! 11.222.333/0001-81 → 11222333000181 → 11.222.333/0001-81
//!                      ^^^^^^^^ ^^^^ ^^
//!                      root     branch check digits
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::check_digit::CNPJ;
use crate::error::Result;

/// A validated CNPJ, stored as its 14 canonical digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj(String);

impl Cnpj {
    /// Validates a CNPJ, formatted or not.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Cnpj;
    ///
    /// let cnpj = Cnpj::new("11222333000181").unwrap();
    /// assert_eq!(cnpj.to_string(), "11.222.333/0001-81");
    /// assert!(Cnpj::new("11.222.333/0001-82").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        CNPJ.validate(input).map(Cnpj)
    }

    /// A random valid CNPJ for the head office (branch `0001`).
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let root: String = (0..8).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect();
            let base = format!("{root}0001");
            if let Ok(cnpj) = CNPJ.complete(&base).and_then(|digits| Cnpj::new(&digits)) {
                return cnpj;
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

    /// First eight digits, shared by every branch of the company.
    pub fn root(&self) -> &str {
        self.0.get(0..8).unwrap_or("")
    }

    /// Four-digit branch number (`0001` is the head office).
    pub fn branch(&self) -> &str {
        self.0.get(8..12).unwrap_or("")
    }

    /// `XX.XXX.XXX/XXXX-XX`
    pub fn formatted(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let d = &self.0;
        format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

text_value_object!(Cnpj);

// =============================================================================
// Unit Tests
// =============================================================================
