//! # SQL Value Hooks
//!
//! Driver-neutral value/scan convention shared by every value object.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  value object ──Valuer::to_sql()──► SqlValue ──► driver bind param      │
//! │                                                                         │
//! │  driver column ──► SqlValue ──Scanner::scan()──► value object           │
//! │                                      │                                  │
//! │                                      ├── Null      → zero value         │
//! │                                      ├── canonical → validated value    │
//! │                                      └── other     → Invalid            │
//! │                                                   (received_type)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `sqlx` feature layers sqlx's `Type`/`Encode`/`Decode` on top of the
//! same canonical representations (see `sqlx_support`).

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// A scalar a SQL driver can bind or return.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(DateTime<Utc>),
}

/// Produces the canonical low-level representation of a value.
pub trait Valuer {
    fn to_sql(&self) -> SqlValue;
}

/// Rebuilds a value from a driver scalar, applying full validation.
pub trait Scanner: Sized {
    fn scan(src: SqlValue) -> Result<Self>;
}

impl SqlValue {
    /// Name of the variant, used as `received_type` in scan failures.
    pub const fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Failure for a scalar the target type does not accept.
    pub fn unsupported(&self, target: &str) -> Error {
        Error::invalid(format!("cannot scan {} into {target}", self.kind()))
            .with_context("received_type", self.kind())
            .with_context("target_type", target)
    }

    /// Text or UTF-8 bytes; `None` for NULL.
    pub fn into_text(self, target: &str) -> Result<Option<String>> {
        match self {
            SqlValue::Null => Ok(None),
            SqlValue::Text(text) => Ok(Some(text)),
            SqlValue::Blob(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                Error::invalid(format!("{target} bytes are not valid UTF-8"))
                    .with_context("received_type", "blob")
                    .with_source(e)
            }),
            other => Err(other.unsupported(target)),
        }
    }

    /// Integer; `None` for NULL.
    pub fn into_integer(self, target: &str) -> Result<Option<i64>> {
        match self {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(value) => Ok(Some(value)),
            other => Err(other.unsupported(target)),
        }
    }

    /// Timestamp, or RFC-3339 text; `None` for NULL.
    pub fn into_timestamp(self, target: &str) -> Result<Option<DateTime<Utc>>> {
        match self {
            SqlValue::Timestamp(at) => Ok(Some(at)),
            SqlValue::Text(_) | SqlValue::Blob(_) | SqlValue::Null => {
                match self.into_text(target)? {
                    None => Ok(None),
                    Some(text) => DateTime::parse_from_rfc3339(text.trim())
                        .map(|at| Some(at.with_timezone(&Utc)))
                        .map_err(|e| {
                            Error::invalid(format!("{target} is not an RFC 3339 timestamp"))
                                .with_context("input", text)
                                .with_source(e)
                        }),
                }
            }
            other => Err(other.unsupported(target)),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Scans a nullable column: NULL becomes `None` instead of the zero value.
pub fn scan_nullable<T: Scanner>(src: SqlValue) -> Result<Option<T>> {
    if src.is_null() {
        Ok(None)
    } else {
        T::scan(src).map(Some)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_text_accepts_blob() {
        let text = SqlValue::Blob(b"BRL".to_vec()).into_text("Currency").unwrap();
        assert_eq!(text.as_deref(), Some("BRL"));
        assert_eq!(SqlValue::Null.into_text("Currency").unwrap(), None);
    }

    #[test]
    fn test_unsupported_reports_received_type() {
        let err = SqlValue::Real(1.5).into_integer("Percentage").unwrap_err();
        assert!(err.is_invalid());
        assert_eq!(err.context_value("received_type").unwrap(), "real");
        assert_eq!(err.context_value("target_type").unwrap(), "Percentage");
    }

    #[test]
    fn test_into_timestamp_parses_text() {
        let at = SqlValue::Text("2024-01-02T03:04:05Z".into())
            .into_timestamp("CreatedAt")
            .unwrap()
            .unwrap();
        assert_eq!(at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert!(SqlValue::Integer(5).into_timestamp("CreatedAt").is_err());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(7_i64)), SqlValue::Integer(7));
    }
}
