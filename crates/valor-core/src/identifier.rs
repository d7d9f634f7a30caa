//! # Identifiers
//!
//! [`Uuid`] (time-ordered version 7 identifiers) and [`Slug`] (URL-safe
//! names).
//!
//! ## Why UUID v7?
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 48-bit unix millis │ ver │ rand_a │ var │      rand_b        │
//! └──────────────────────────────────────────────────────────────┘
//!   sorts by creation time → B-tree friendly primary keys
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sql::{Scanner, SqlValue, Valuer};

// =============================================================================
// UUID
// =============================================================================

/// A UUID; new identifiers are generated as version 7.
///
/// Any RFC 4122 UUID parses. The nil UUID is the zero value and maps to NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uuid(uuid::Uuid);

impl Uuid {
    /// A fresh time-ordered identifier.
    pub fn new_v7() -> Self {
        Uuid(uuid::Uuid::now_v7())
    }

    /// Parses the hyphenated, simple, braced or URN form.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Uuid;
    ///
    /// let id = Uuid::new("018f6d2e-8b3a-7cc1-9a7e-3f1d2c4b5a69").unwrap();
    /// assert_eq!(id.version(), 7);
    /// assert!(Uuid::new("not-a-uuid").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        uuid::Uuid::parse_str(input.trim()).map(Uuid).map_err(|e| {
            Error::invalid("invalid UUID")
                .with_context("input", input)
                .with_source(e)
        })
    }

    pub const fn nil() -> Self {
        Uuid(uuid::Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Version number (7 for generated identifiers, 0 for nil).
    pub fn version(&self) -> usize {
        self.0.get_version_num()
    }

    /// Creation time embedded in a version 7 (or 1/6) identifier.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let (secs, nanos) = self.0.get_timestamp()?.to_unix();
        DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl From<uuid::Uuid> for Uuid {
    fn from(value: uuid::Uuid) -> Self {
        Uuid(value)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Uuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::new(s)
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Uuid::new(&value)
    }
}

impl From<Uuid> for String {
    fn from(value: Uuid) -> Self {
        value.to_string()
    }
}

impl Valuer for Uuid {
    fn to_sql(&self) -> SqlValue {
        if self.is_nil() {
            SqlValue::Null
        } else {
            SqlValue::Text(self.to_string())
        }
    }
}

impl Scanner for Uuid {
    /// Accepts hyphenated text or the 16 raw bytes.
    fn scan(src: SqlValue) -> Result<Self> {
        match src {
            SqlValue::Null => Ok(Uuid::nil()),
            SqlValue::Blob(bytes) if bytes.len() == 16 => uuid::Uuid::from_slice(&bytes)
                .map(Uuid)
                .map_err(|e| Error::invalid("invalid UUID bytes").with_source(e)),
            SqlValue::Text(text) => Uuid::new(&text),
            other => Err(other.unsupported("Uuid")),
        }
    }
}

// =============================================================================
// Slug
// =============================================================================

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"));

const MAX_SLUG_LENGTH: usize = 100;

/// Lowercase ASCII words joined by single hyphens: `cafe-com-leite`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validates an existing slug without rewriting it.
    pub fn new(input: &str) -> Result<Self> {
        if input.len() > MAX_SLUG_LENGTH {
            return Err(Error::invalid("slug too long")
                .with_context("input", input)
                .with_context("max", MAX_SLUG_LENGTH));
        }
        if !SLUG_PATTERN.is_match(input) {
            return Err(Error::invalid("slug must be lowercase words joined by hyphens").with_context("input", input));
        }
        Ok(Slug(input.to_string()))
    }

    /// Derives a slug from free text, folding Portuguese accents.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Slug;
    ///
    /// assert_eq!(Slug::slugify("Pão de Queijo (500g)").unwrap().as_str(), "pao-de-queijo-500g");
    /// assert!(Slug::slugify("!!!").is_err());
    /// ```
    pub fn slugify(text: &str) -> Result<Self> {
        let mut slug = String::with_capacity(text.len());
        for c in text.chars().flat_map(char::to_lowercase).map(fold_accent) {
            if c.is_ascii_alphanumeric() {
                slug.push(c);
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.len() > MAX_SLUG_LENGTH {
            slug.truncate(MAX_SLUG_LENGTH);
            while slug.ends_with('-') {
                slug.pop();
            }
        }
        if slug.is_empty() {
            return Err(Error::invalid("text has nothing to slugify").with_context("input", text));
        }
        Slug::new(&slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

text_value_object!(Slug);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_carries_timestamp() {
        let a = Uuid::new_v7();
        let b = Uuid::new_v7();
        assert_eq!(a.version(), 7);
        assert_ne!(a, b);
        assert!(a.timestamp().is_some());
        assert!(a.timestamp() <= b.timestamp());
    }

    #[test]
    fn test_uuid_parse_and_format() {
        let id = Uuid::new("{018F6D2E-8B3A-7CC1-9A7E-3F1D2C4B5A69}").unwrap();
        assert_eq!(id.to_string(), "018f6d2e-8b3a-7cc1-9a7e-3f1d2c4b5a69");
        assert!(Uuid::new("018f6d2e-8b3a").unwrap_err().is_invalid());
    }

    #[test]
    fn test_uuid_sql() {
        let id = Uuid::new_v7();
        assert_eq!(Uuid::scan(id.to_sql()).unwrap(), id);
        assert_eq!(Uuid::scan(SqlValue::Blob(id.as_uuid().as_bytes().to_vec())).unwrap(), id);
        assert_eq!(Uuid::scan(SqlValue::Null).unwrap(), Uuid::nil());
        assert_eq!(Uuid::nil().to_sql(), SqlValue::Null);

        let err = Uuid::scan(SqlValue::Integer(7)).unwrap_err();
        assert_eq!(err.context_value("received_type").unwrap(), "integer");
    }

    #[test]
    fn test_uuid_json() {
        let id = Uuid::new_v7();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        assert_eq!(serde_json::from_str::<Uuid>(&json).unwrap(), id);
    }

    #[test]
    fn test_slug() {
        assert!(Slug::new("cafe-com-leite").is_ok());
        for bad in ["", "Cafe", "cafe--leite", "-cafe", "cafe-", "café"] {
            assert!(Slug::new(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(Slug::slugify("  Açaí  & Guaraná ").unwrap().as_str(), "acai-guarana");
        assert_eq!(Slug::slugify("São Paulo / SP").unwrap().as_str(), "sao-paulo-sp");
        let long = "a ".repeat(200);
        let slug = Slug::slugify(&long).unwrap();
        assert!(slug.as_str().len() <= MAX_SLUG_LENGTH);
        assert!(!slug.as_str().ends_with('-'));
    }
}
