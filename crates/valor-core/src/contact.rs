//! # Contact Value Objects
//!
//! [`Email`] (mailbox address) and [`Phone`] (Brazilian number with DDD).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::check_digit::digits_of;
use crate::error::{Error, Result};

// =============================================================================
// Email
// =============================================================================

/// `local@domain` where the domain has at least one dot and each label is
/// alphanumeric with inner hyphens.
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email address pattern is valid")
});

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_LENGTH: usize = 64;

/// A mailbox address, stored lowercase.
///
/// Accepts a bare address (`ana@example.com`) or a named mailbox
/// (`Ana Souza <ana@example.com>`); only the address is kept.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// ## Example
    /// ```rust
    /// use valor_core::Email;
    ///
    /// let email = Email::new("Ana Souza <Ana@Example.com>").unwrap();
    /// assert_eq!(email.as_str(), "ana@example.com");
    /// assert_eq!(email.domain(), "example.com");
    /// assert!(Email::new("ana@localhost").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        let address = mailbox_address(input.trim());
        let invalid = |reason: &str| {
            Error::invalid("invalid email address")
                .with_context("input", input)
                .with_context("reason", reason)
        };

        if address.len() > MAX_EMAIL_LENGTH {
            return Err(invalid("too long"));
        }
        if !ADDRESS_PATTERN.is_match(address) {
            return Err(invalid("malformed address"));
        }
        let (local, _) = address.split_once('@').ok_or_else(|| invalid("missing @"))?;
        if local.len() > MAX_LOCAL_LENGTH {
            return Err(invalid("local part too long"));
        }
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err(invalid("misplaced dot in local part"));
        }
        Ok(Email(address.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Part before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

/// Strips an optional display name: `Name <addr>` → `addr`.
fn mailbox_address(input: &str) -> &str {
    match (input.rfind('<'), input.ends_with('>')) {
        (Some(open), true) => input[open + 1..input.len() - 1].trim(),
        _ => input,
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

text_value_object!(Email);

// =============================================================================
// Phone
// =============================================================================

/// A Brazilian phone number: two-digit DDD plus 8 (landline) or 9 (mobile)
/// subscriber digits, stored as digits only.
///
/// A leading `55` country code is accepted and dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// ## Example
    /// ```rust
    /// use valor_core::Phone;
    ///
    /// let phone = Phone::new("+55 (11) 98765-4321").unwrap();
    /// assert_eq!(phone.as_str(), "11987654321");
    /// assert!(phone.is_mobile());
    /// assert_eq!(phone.to_string(), "(11) 98765-4321");
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        let mut digits = digits_of(input);
        if matches!(digits.len(), 12 | 13) && digits.starts_with(&[5, 5]) {
            digits.drain(..2);
        }

        if !matches!(digits.len(), 10 | 11) {
            return Err(Error::invalid("phone must have 10 or 11 digits")
                .with_context("input", input)
                .with_context("length", digits.len()));
        }
        if digits[0] == 0 || digits[1] == 0 {
            return Err(Error::invalid("invalid area code (DDD)").with_context("input", input));
        }

        Ok(Phone(digits.iter().map(|d| char::from(b'0' + d)).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Two-digit area code.
    pub fn area_code(&self) -> &str {
        self.0.get(0..2).unwrap_or("")
    }

    /// Subscriber number without the area code.
    pub fn number(&self) -> &str {
        self.0.get(2..).unwrap_or("")
    }

    /// Mobile numbers have 11 digits and a `9` right after the DDD.
    pub fn is_mobile(&self) -> bool {
        self.0.len() == 11 && self.number().starts_with('9')
    }

    /// `(XX) XXXXX-XXXX` or `(XX) XXXX-XXXX`.
    pub fn formatted(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let number = self.number();
        let split = number.len() - 4;
        format!("({}) {}-{}", self.area_code(), &number[..split], &number[split..])
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

text_value_object!(Phone);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{Scanner, SqlValue, Valuer};

    #[test]
    fn test_email_valid() {
        let email = Email::new("  joao.silva+nf@Empresa.com.br ").unwrap();
        assert_eq!(email.as_str(), "joao.silva+nf@empresa.com.br");
        assert_eq!(email.local_part(), "joao.silva+nf");
        assert_eq!(email.domain(), "empresa.com.br");
    }

    #[test]
    fn test_email_named_mailbox() {
        let email = Email::new("\"Silva, João\" <joao@example.org>").unwrap();
        assert_eq!(email.as_str(), "joao@example.org");
    }

    #[test]
    fn test_email_invalid() {
        for input in [
            "",
            "plain",
            "@example.com",
            "ana@",
            "ana@example",
            "ana..souza@example.com",
            ".ana@example.com",
            "ana@-example.com",
            "ana souza@example.com",
        ] {
            let err = Email::new(input).unwrap_err();
            assert!(err.is_invalid(), "{input} should be invalid");
        }
    }

    #[test]
    fn test_email_json_and_sql() {
        let email = Email::new("ana@example.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"ana@example.com\"");
        assert_eq!(Email::scan(email.to_sql()).unwrap(), email);
        assert!(Email::scan(SqlValue::Null).unwrap().is_empty());
    }

    #[test]
    fn test_phone_mobile_and_landline() {
        let mobile = Phone::new("(21) 99876-5432").unwrap();
        assert!(mobile.is_mobile());
        assert_eq!(mobile.area_code(), "21");
        assert_eq!(mobile.formatted(), "(21) 99876-5432");

        let landline = Phone::new("1133334444").unwrap();
        assert!(!landline.is_mobile());
        assert_eq!(landline.formatted(), "(11) 3333-4444");

        let eleven_without_nine = Phone::new("11833334444").unwrap();
        assert!(!eleven_without_nine.is_mobile());
    }

    #[test]
    fn test_phone_invalid() {
        assert!(Phone::new("123").is_err());
        assert!(Phone::new("0198765432").is_err());
        assert!(Phone::new("119876543210").is_err());
    }

    #[test]
    fn test_phone_sql() {
        let phone = Phone::new("5511987654321").unwrap();
        assert_eq!(phone.to_sql(), SqlValue::Text("11987654321".into()));
        assert!(Phone::scan(SqlValue::Integer(11987654321)).is_err());
    }
}
