//! # Network Value Objects
//!
//! [`IpAddress`] (IPv4 or IPv6) and [`PortNumber`] (1..=65535).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sql::{Scanner, SqlValue, Valuer};

// =============================================================================
// IP Address
// =============================================================================

/// An IPv4 or IPv6 address in canonical text form.
///
/// The zero value is the unspecified IPv4 address `0.0.0.0`, which maps to
/// NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpAddress(IpAddr);

impl Default for IpAddress {
    fn default() -> Self {
        IpAddress(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

impl IpAddress {
    /// ## Example
    /// ```rust
    /// use valor_core::IpAddress;
    ///
    /// let ip = IpAddress::new("2001:DB8::1").unwrap();
    /// assert!(ip.is_ipv6());
    /// assert_eq!(ip.to_string(), "2001:db8::1");
    /// assert!(IpAddress::new("256.1.1.1").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        IpAddr::from_str(input.trim()).map(IpAddress).map_err(|e| {
            Error::invalid("invalid IP address")
                .with_context("input", input)
                .with_source(e)
        })
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }

    pub fn is_ipv4(&self) -> bool {
        self.0.is_ipv4()
    }

    pub fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }

    pub fn is_loopback(&self) -> bool {
        self.0.is_loopback()
    }

    pub fn is_unspecified(&self) -> bool {
        self.0.is_unspecified()
    }
}

impl From<IpAddr> for IpAddress {
    fn from(value: IpAddr) -> Self {
        IpAddress(value)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for IpAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IpAddress::new(s)
    }
}

impl TryFrom<String> for IpAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        IpAddress::new(&value)
    }
}

impl From<IpAddress> for String {
    fn from(value: IpAddress) -> Self {
        value.to_string()
    }
}

impl Valuer for IpAddress {
    fn to_sql(&self) -> SqlValue {
        if *self == IpAddress::default() {
            SqlValue::Null
        } else {
            SqlValue::Text(self.to_string())
        }
    }
}

impl Scanner for IpAddress {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_text("IpAddress")? {
            None => Ok(IpAddress::default()),
            Some(text) => IpAddress::new(&text),
        }
    }
}

// =============================================================================
// Port Number
// =============================================================================

/// A TCP/UDP port in `1..=65535`. `PortNumber::default()` (0) is the zero
/// value and maps to NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct PortNumber(u16);

impl PortNumber {
    pub fn new(port: i64) -> Result<Self> {
        match u16::try_from(port) {
            Ok(port) if port > 0 => Ok(PortNumber(port)),
            _ => Err(Error::invalid("port must be between 1 and 65535").with_context("input", port)),
        }
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Ports below 1024 need elevated privileges on most systems.
    pub fn is_well_known(&self) -> bool {
        (1..1024).contains(&self.0)
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PortNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let port = s
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::invalid("port is not a number").with_context("input", s).with_source(e))?;
        PortNumber::new(port)
    }
}

impl TryFrom<i64> for PortNumber {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        PortNumber::new(value)
    }
}

impl From<PortNumber> for u16 {
    fn from(value: PortNumber) -> Self {
        value.0
    }
}

impl Valuer for PortNumber {
    fn to_sql(&self) -> SqlValue {
        if self.0 == 0 {
            SqlValue::Null
        } else {
            SqlValue::Integer(i64::from(self.0))
        }
    }
}

impl Scanner for PortNumber {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_integer("PortNumber")? {
            None => Ok(PortNumber::default()),
            Some(port) => PortNumber::new(port),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_address() {
        let v4 = IpAddress::new(" 192.168.0.10 ").unwrap();
        assert!(v4.is_ipv4());
        assert_eq!(v4.to_string(), "192.168.0.10");
        assert!(IpAddress::new("::1").unwrap().is_loopback());
        assert!(IpAddress::new("192.168.0").unwrap_err().is_invalid());
    }

    #[test]
    fn test_ip_address_sql_and_json() {
        let ip = IpAddress::new("10.0.0.1").unwrap();
        assert_eq!(IpAddress::scan(ip.to_sql()).unwrap(), ip);
        assert_eq!(IpAddress::scan(SqlValue::Null).unwrap(), IpAddress::default());
        assert_eq!(IpAddress::default().to_sql(), SqlValue::Null);
        assert_eq!(serde_json::to_string(&ip).unwrap(), "\"10.0.0.1\"");
        assert!(serde_json::from_str::<IpAddress>("\"10.0.0.256\"").is_err());
    }

    #[test]
    fn test_port_range() {
        assert_eq!(PortNumber::new(443).unwrap().value(), 443);
        assert!(PortNumber::new(443).unwrap().is_well_known());
        assert!(!PortNumber::new(8080).unwrap().is_well_known());
        assert!(PortNumber::new(65535).is_ok());
        for bad in [0, -1, 65536] {
            assert!(PortNumber::new(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!("8080".parse::<PortNumber>().unwrap().value(), 8080);
        assert!("http".parse::<PortNumber>().is_err());
    }

    #[test]
    fn test_port_sql_and_json() {
        let port = PortNumber::new(5432).unwrap();
        assert_eq!(port.to_sql(), SqlValue::Integer(5432));
        assert_eq!(PortNumber::scan(SqlValue::Integer(5432)).unwrap(), port);
        assert_eq!(PortNumber::scan(SqlValue::Null).unwrap(), PortNumber::default());
        assert!(PortNumber::scan(SqlValue::Integer(70000)).is_err());
        assert!(PortNumber::scan(SqlValue::Text("5432".into())).is_err());

        assert_eq!(serde_json::to_string(&port).unwrap(), "5432");
        assert!(serde_json::from_str::<PortNumber>("0").is_err());
    }
}
