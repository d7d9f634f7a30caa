//! # valor-core: Value Objects for Brazilian Business Domains
//!
//! Small immutable types that validate on construction, so a value that
//! exists is a value that is correct.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Application code                                │
//! │     handlers, repositories, jobs  ──► build and pass value objects      │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ valor-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  cpf/cnpj │  │   units   │  │ periphery │  │   │
//! │  │   │   Money   │  │ mod-11    │  │ Registry  │  │ Email, CEP│  │   │
//! │  │   │ Percentage│  │ check dig.│  │ Quantity  │  │ Date, ... │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   serde (JSON) ◄──── every value ────► SqlValue (Valuer/Scanner) │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ feature "sqlx"                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          sqlx Encode/Decode for SQLite bind params and rows      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`], [`currency`], [`percentage`] - scaled-integer money
//! - [`check_digit`], [`cpf`], [`cnpj`] - tax identifiers
//! - [`units`], [`quantity`] - the unit registry and quantities
//! - [`sql`], [`json`] - persistence and wire hooks
//! - [`contact`], [`address`], [`identifier`], [`network`], [`file`],
//!   [`temporal`], [`audit`] - peripheral value objects
//! - [`config`] - process-wide settings
//! - [`error`] - the error type every operation returns
//!
//! ## Design Principles
//!
//! 1. **Validate on construction**: constructors and JSON decoding share one path
//! 2. **Integer money**: amounts are minor units (i64); floats are display-only
//! 3. **Banker's rounding**: every rounding step is half to even
//! 4. **Explicit errors**: failures carry a code, a message and context, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use valor_core::{Cpf, Currency, Money, Percentage};
//!
//! let price = Money::new(1000, Currency::Brl).unwrap();
//! let tax = Percentage::from_f64(0.0825).unwrap();
//! assert_eq!(tax.apply_to(&price).unwrap().amount(), 82);
//!
//! let shares = Money::new(10000, Currency::Brl).unwrap().split(3).unwrap();
//! let amounts: Vec<i64> = shares.iter().map(Money::amount).collect();
//! assert_eq!(amounts, vec![3334, 3333, 3333]);
//!
//! assert!(Cpf::new("123.456.789-09").is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

#[macro_use]
mod macros;

pub mod error;

pub mod decimal;
pub mod json;
pub mod sql;

pub mod currency;
pub mod dto;
pub mod money;
pub mod percentage;

pub mod check_digit;
pub mod cnpj;
pub mod cpf;

pub mod quantity;
pub mod units;

pub mod address;
pub mod audit;
pub mod contact;
pub mod file;
pub mod identifier;
pub mod network;
pub mod temporal;

pub mod config;

#[cfg(feature = "sqlx")]
mod sqlx_support;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use valor_core::Money` instead of
// `use valor_core::money::Money`

pub use error::{Error, ErrorCode, Result};
pub use sql::{Scanner, SqlValue, Valuer};

pub use currency::Currency;
pub use money::Money;
pub use percentage::Percentage;

pub use cnpj::Cnpj;
pub use cpf::Cpf;

pub use quantity::Quantity;
pub use units::{Unit, UnitRegistry};

pub use address::{Cep, Uf};
pub use audit::{AuditUser, CreatedAt, NullableTime, UpdatedAt, Version};
pub use contact::{Email, Phone};
pub use file::{FileExtension, MimeType};
pub use identifier::{Slug, Uuid};
pub use network::{IpAddress, PortNumber};
pub use temporal::{BirthDate, Date, DateRange, Day};

pub use config::Settings;
