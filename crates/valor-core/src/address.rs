//! # Address Value Objects
//!
//! [`Cep`] (postal code) and [`Uf`] (federative unit / state code).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::check_digit::digits_of;
use crate::error::{Error, Result};

// =============================================================================
// CEP
// =============================================================================

/// Brazilian postal code, stored as 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// ## Example
    /// ```rust
    /// use valor_core::Cep;
    ///
    /// let cep = Cep::new("01310-100").unwrap();
    /// assert_eq!(cep.as_str(), "01310100");
    /// assert_eq!(cep.to_string(), "01310-100");
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        if input.chars().any(|c| !c.is_ascii_digit() && !matches!(c, '-' | '.' | ' ')) {
            return Err(Error::invalid("CEP contains invalid characters").with_context("input", input));
        }
        let digits = digits_of(input);
        if digits.len() != 8 {
            return Err(Error::invalid("CEP must have 8 digits")
                .with_context("input", input)
                .with_context("length", digits.len()));
        }
        if digits.iter().all(|&d| d == 0) {
            return Err(Error::invalid("CEP cannot be all zeros").with_context("input", input));
        }
        Ok(Cep(digits.iter().map(|d| char::from(b'0' + d)).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `XXXXX-XXX`
    pub fn formatted(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

text_value_object!(Cep);

// =============================================================================
// UF
// =============================================================================

macro_rules! federative_units {
    ($($variant:ident => $code:literal, $name:literal;)+) => {
        /// One of the 27 Brazilian federative units.
        ///
        /// `Uf::Empty` is the zero value a NULL column scans to.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Uf {
            #[default]
            Empty,
            $($variant,)+
        }

        impl Uf {
            /// Every federative unit, alphabetical by code.
            pub const ALL: [Uf; 27] = [$(Uf::$variant,)+];

            /// Two-letter code, case-insensitive.
            pub fn new(input: &str) -> Result<Self> {
                match input.trim().to_uppercase().as_str() {
                    $($code => Ok(Uf::$variant),)+
                    _ => Err(Error::invalid("unknown federative unit").with_context("input", input)),
                }
            }

            /// Two-letter code; empty for `Uf::Empty`.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    Uf::Empty => "",
                    $(Uf::$variant => $code,)+
                }
            }

            /// Full state name.
            pub const fn name(&self) -> &'static str {
                match self {
                    Uf::Empty => "",
                    $(Uf::$variant => $name,)+
                }
            }
        }
    };
}

federative_units! {
    Ac => "AC", "Acre";
    Al => "AL", "Alagoas";
    Am => "AM", "Amazonas";
    Ap => "AP", "Amapá";
    Ba => "BA", "Bahia";
    Ce => "CE", "Ceará";
    Df => "DF", "Distrito Federal";
    Es => "ES", "Espírito Santo";
    Go => "GO", "Goiás";
    Ma => "MA", "Maranhão";
    Mg => "MG", "Minas Gerais";
    Ms => "MS", "Mato Grosso do Sul";
    Mt => "MT", "Mato Grosso";
    Pa => "PA", "Pará";
    Pb => "PB", "Paraíba";
    Pe => "PE", "Pernambuco";
    Pi => "PI", "Piauí";
    Pr => "PR", "Paraná";
    Rj => "RJ", "Rio de Janeiro";
    Rn => "RN", "Rio Grande do Norte";
    Ro => "RO", "Rondônia";
    Rr => "RR", "Roraima";
    Rs => "RS", "Rio Grande do Sul";
    Sc => "SC", "Santa Catarina";
    Se => "SE", "Sergipe";
    Sp => "SP", "São Paulo";
    To => "TO", "Tocantins";
}

impl Uf {
    pub const fn is_empty(&self) -> bool {
        matches!(self, Uf::Empty)
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

text_value_object!(Uf);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{Scanner, SqlValue, Valuer};

    #[test]
    fn test_cep() {
        assert_eq!(Cep::new("70040-010").unwrap().formatted(), "70040-010");
        assert_eq!(Cep::new("70.040-010").unwrap().as_str(), "70040010");
        assert!(Cep::new("7004001").is_err());
        assert!(Cep::new("00000-000").is_err());
        assert!(Cep::new("7004A-010").is_err());
    }

    #[test]
    fn test_cep_sql() {
        let cep = Cep::new("01310100").unwrap();
        assert_eq!(cep.to_sql(), SqlValue::Text("01310100".into()));
        assert_eq!(Cep::scan(SqlValue::Text("01310-100".into())).unwrap(), cep);
        assert_eq!(Cep::scan(SqlValue::Null).unwrap(), Cep::default());
    }

    #[test]
    fn test_uf() {
        assert_eq!(Uf::ALL.len(), 27);
        let sp = Uf::new(" sp ").unwrap();
        assert_eq!(sp, Uf::Sp);
        assert_eq!(sp.name(), "São Paulo");
        assert_eq!(sp.to_string(), "SP");
        assert!(Uf::new("XX").is_err());
        assert!(Uf::new("").is_err());
    }

    #[test]
    fn test_uf_json_and_sql() {
        assert_eq!(serde_json::to_string(&Uf::Rj).unwrap(), "\"RJ\"");
        assert_eq!(serde_json::from_str::<Uf>("\"mg\"").unwrap(), Uf::Mg);
        assert!(serde_json::from_str::<Uf>("\"ZZ\"").is_err());
        assert_eq!(Uf::Empty.to_sql(), SqlValue::Null);
        assert_eq!(Uf::scan(SqlValue::Null).unwrap(), Uf::Empty);
        for uf in Uf::ALL {
            assert_eq!(Uf::scan(uf.to_sql()).unwrap(), uf);
        }
    }
}
