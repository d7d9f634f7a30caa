//! # Audit Value Objects
//!
//! Record bookkeeping carried by every persisted aggregate.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┬───────────────────────┐
//! │ Column       │ Type                         │ Rule                  │
//! ├──────────────┼──────────────────────────────┼───────────────────────┤
//! │ version      │ Version                      │ >= 0, +1 per update   │
//! │ created_by   │ AuditUser                    │ email or "system"     │
//! │ created_at   │ CreatedAt                    │ set once              │
//! │ updated_at   │ UpdatedAt                    │ touch() on update     │
//! │ deleted_at   │ NullableTime                 │ NULL while alive      │
//! └──────────────┴──────────────────────────────┴───────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::contact::Email;
use crate::error::{Error, Result};
use crate::sql::{Scanner, SqlValue, Valuer};

// =============================================================================
// Version
// =============================================================================

/// Optimistic-locking counter. Starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Version(i64);

impl Version {
    pub fn new(version: i64) -> Result<Self> {
        if version < 0 {
            return Err(Error::invalid("version cannot be negative").with_context("input", version));
        }
        Ok(Version(version))
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The next version.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Version;
    ///
    /// let v = Version::default().increment().unwrap();
    /// assert_eq!(v.value(), 1);
    /// ```
    pub fn increment(&self) -> Result<Version> {
        self.0
            .checked_add(1)
            .map(Version)
            .ok_or_else(|| Error::domain_violation("version overflow").with_context("version", self.0))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Version::new(value)
    }
}

impl From<Version> for i64 {
    fn from(value: Version) -> Self {
        value.0
    }
}

impl Valuer for Version {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(self.0)
    }
}

impl Scanner for Version {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_integer("Version")? {
            None => Ok(Version::default()),
            Some(version) => Version::new(version),
        }
    }
}

// =============================================================================
// Audit User
// =============================================================================

const SYSTEM_USER: &str = "system";

/// Who made a change: a user's email, or `system` for automated jobs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuditUser(String);

impl AuditUser {
    /// ## Example
    /// ```rust
    /// use valor_core::AuditUser;
    ///
    /// assert!(AuditUser::new("SYSTEM").unwrap().is_system());
    /// assert_eq!(AuditUser::new("Ana@Example.com").unwrap().as_str(), "ana@example.com");
    /// assert!(AuditUser::new("ana").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        if input.trim().eq_ignore_ascii_case(SYSTEM_USER) {
            return Ok(AuditUser::system());
        }
        let email = Email::new(input).map_err(|e| {
            Error::invalid("audit user must be an email or \"system\"")
                .with_context("input", input)
                .with_source(e)
        })?;
        Ok(AuditUser(email.into()))
    }

    pub fn system() -> Self {
        AuditUser(SYSTEM_USER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_USER
    }

    /// The email address, unless this is the system user.
    pub fn email(&self) -> Option<Email> {
        if self.is_system() || self.is_empty() {
            None
        } else {
            Email::new(&self.0).ok()
        }
    }
}

impl From<Email> for AuditUser {
    fn from(email: Email) -> Self {
        AuditUser(email.into())
    }
}

impl fmt::Display for AuditUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

text_value_object!(AuditUser);

// =============================================================================
// Timestamps
// =============================================================================

fn to_rfc3339(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Timestamps are stored with microsecond precision, like most SQL engines.
fn truncate_micros(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(at.timestamp_micros()).unwrap_or(at)
}

macro_rules! timestamp_value_object {
    ($ty:ident, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Serializes as RFC 3339 with microseconds; the zero value is the
        /// Unix epoch.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(DateTime<Utc>);

        impl $ty {
            pub fn now() -> Self {
                $ty(truncate_micros(Utc::now()))
            }

            pub fn from_datetime(at: DateTime<Utc>) -> Self {
                $ty(truncate_micros(at))
            }

            pub fn parse(input: &str) -> Result<Self> {
                DateTime::parse_from_rfc3339(input.trim())
                    .map(|at| $ty::from_datetime(at.with_timezone(&Utc)))
                    .map_err(|e| {
                        Error::invalid(concat!(stringify!($ty), " must be an RFC 3339 timestamp"))
                            .with_context("input", input)
                            .with_source(e)
                    })
            }

            pub fn time(&self) -> DateTime<Utc> {
                self.0
            }
        }

        impl From<DateTime<Utc>> for $ty {
            fn from(at: DateTime<Utc>) -> Self {
                $ty::from_datetime(at)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&to_rfc3339(&self.0))
            }
        }

        impl Valuer for $ty {
            fn to_sql(&self) -> SqlValue {
                SqlValue::Timestamp(self.0)
            }
        }

        impl Scanner for $ty {
            fn scan(src: SqlValue) -> Result<Self> {
                Ok(src
                    .into_timestamp(stringify!($ty))?
                    .map($ty::from_datetime)
                    .unwrap_or_default())
            }
        }
    };
}

timestamp_value_object!(CreatedAt, "When a record was created.");
timestamp_value_object!(UpdatedAt, "When a record was last modified.");

impl UpdatedAt {
    /// A fresh stamp for the next modification.
    pub fn touch(&self) -> UpdatedAt {
        UpdatedAt::now().max(*self)
    }
}

/// A timestamp that may be absent (`deleted_at`, `approved_at`).
///
/// NULL ↔ `None`; JSON `null` ↔ `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NullableTime(Option<DateTime<Utc>>);

impl NullableTime {
    pub const fn null() -> Self {
        NullableTime(None)
    }

    pub fn now() -> Self {
        NullableTime(Some(truncate_micros(Utc::now())))
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        NullableTime(Some(truncate_micros(at)))
    }

    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub const fn time(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn set(&mut self, at: DateTime<Utc>) {
        self.0 = Some(truncate_micros(at));
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl From<Option<DateTime<Utc>>> for NullableTime {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        NullableTime(value.map(truncate_micros))
    }
}

impl fmt::Display for NullableTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(at) => f.write_str(&to_rfc3339(at)),
            None => f.write_str("null"),
        }
    }
}

impl Valuer for NullableTime {
    fn to_sql(&self) -> SqlValue {
        self.0.into()
    }
}

impl Scanner for NullableTime {
    fn scan(src: SqlValue) -> Result<Self> {
        Ok(NullableTime::from(src.into_timestamp("NullableTime")?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
