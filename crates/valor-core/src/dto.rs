//! # Wire Shapes
//!
//! Plain structs for the value objects that encode as JSON objects rather
//! than scalars. The value objects convert to and from these through serde's
//! `try_from`/`into`, so decoding always runs constructor validation.
//!
//! TypeScript definitions are exported with `ts-rs` for API consumers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// `{"amount": 1050, "currency": "BRL"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoneyDto {
    /// Minor units (cents).
    pub amount: i64,
    /// ISO-4217 code.
    pub currency: String,
}

/// `{"value": 1.57, "unit": "KG"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityDto {
    pub value: f64,
    pub unit: String,
}

/// `{"start": "2024-01-01", "end": "2024-01-31"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRangeDto {
    pub start: String,
    pub end: String,
}
