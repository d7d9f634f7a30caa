//! # JSON Helpers
//!
//! serde_json entry points that report failures as [`Error`] with code
//! `Invalid`, so callers handle JSON and constructor failures the same way.
//!
//! ```rust
//! use valor_core::{json, ErrorCode, Money};
//!
//! let err = json::decode::<Money>(r#"{"amount":1000,"currency":"XYZ"}"#).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::Invalid);
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Serializes a value object to its canonical JSON text.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::invalid("value cannot be encoded as JSON").with_source(e))
}

/// Parses JSON text, running the target type's validation.
pub fn decode<T: DeserializeOwned>(input: &str) -> Result<T> {
    serde_json::from_str(input).map_err(|e| {
        Error::invalid("JSON does not describe a valid value")
            .with_context("type", std::any::type_name::<T>())
            .with_context("reason", e.to_string())
            .with_context("line", e.line())
            .with_context("column", e.column())
            .with_source(e)
    })
}

/// Decodes from an already-parsed `serde_json::Value`.
pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::invalid("JSON does not describe a valid value")
            .with_context("type", std::any::type_name::<T>())
            .with_context("reason", e.to_string())
            .with_source(e)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
