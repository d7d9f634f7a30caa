//! # Error Types
//!
//! The single structured failure type used by every value object.
//!
//! ## Error Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         valor_core::Error                               │
//! │                                                                         │
//! │  code     ── Invalid | DomainViolation | NotFound | Conflict           │
//! │  message  ── short, English, developer-facing                          │
//! │  context  ── { "input": "123.456.789-00", "check_digit": 2 }           │
//! │  source   ── optional wrapped cause (serde_json, parse errors, ...)    │
//! │                                                                         │
//! │  Flow: constructor / arithmetic ──► Error ──► caller matches on code   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for the derive (not manual impl)
//! 2. Callers discriminate on [`ErrorCode`], never on the message
//! 3. Context is a key-value map of scalars the caller can render
//! 4. No local recovery: errors flow back unchanged in code

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Boxed cause carried by [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// Error Code
// =============================================================================

/// Closed vocabulary of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input did not satisfy construction or decoding constraints.
    ///
    /// ## When This Occurs
    /// - Malformed text (bad CPF, unknown currency code)
    /// - Out-of-range numbers (precision 12, port 0)
    /// - Wrong scalar type handed to a SQL scanner
    Invalid,

    /// A well-formed operation the domain forbids.
    ///
    /// ## When This Occurs
    /// - Adding BRL to USD
    /// - Subtracting quantities with different units
    /// - A subtraction that would go negative
    DomainViolation,

    /// Reference to something that is not registered (unknown unit).
    NotFound,

    /// Registry already contains the symbol (strict registration only).
    Conflict,
}

impl ErrorCode {
    /// Stable snake_case name of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Invalid => "invalid",
            ErrorCode::DomainViolation => "domain_violation",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Error
// =============================================================================

/// Structured failure: code, message, context map and optional cause.
///
/// ## Example
/// ```rust
/// use valor_core::{Cpf, ErrorCode};
///
/// let err = Cpf::new("111.111.111-11").unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Invalid);
/// assert_eq!(err.context_value("input").unwrap(), "111.111.111-11");
/// ```
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    context: BTreeMap<String, Value>,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the given code and message and no context.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
            context: BTreeMap::new(),
            source: None,
        }
    }

    /// Shorthand for [`ErrorCode::Invalid`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::Invalid, message)
    }

    /// Shorthand for [`ErrorCode::DomainViolation`].
    pub fn domain_violation(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::DomainViolation, message)
    }

    /// Shorthand for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::NotFound, message)
    }

    /// Shorthand for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Error::new(ErrorCode::Conflict, message)
    }

    /// Attaches a context entry, replacing any previous value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Wraps an underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }

    /// Looks up a single context entry.
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// True when the code is [`ErrorCode::Invalid`].
    pub fn is_invalid(&self) -> bool {
        self.code == ErrorCode::Invalid
    }

    /// True when the code is [`ErrorCode::DomainViolation`].
    pub fn is_domain_violation(&self) -> bool {
        self.code == ErrorCode::DomainViolation
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Unit Tests
// =============================================================================
