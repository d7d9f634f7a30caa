//! # Unit Registry
//!
//! The set of admissible unit symbols for [`Quantity`](crate::Quantity) and
//! the default decimal precision new quantities are built with.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Application startup                                                   │
//! │    register_units(["KG", "L", "UN"])     ← writes (serialized)         │
//! │    set_default_precision(3)                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Request handling                                                      │
//! │    Quantity::new(1.57, "kg")             ← reads (concurrent)          │
//! │      └─► is_registered("KG") && default_precision() == 3               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! State sits behind a `RwLock`: readers run concurrently, writers are
//! exclusive, and a reader sees either the state before or after a write.
//! A poisoned lock is recovered because every write leaves the state
//! consistent.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::MAX_SCALE;
use crate::error::{Error, Result};

/// Precision used until `set_default_precision` is called.
pub const DEFAULT_PRECISION: u8 = 2;

/// Largest accepted precision.
pub const MAX_PRECISION: u8 = MAX_SCALE as u8;

#[derive(Debug)]
struct RegistryState {
    units: BTreeSet<String>,
    default_precision: u8,
}

/// Registered unit symbols plus the default quantity precision.
///
/// The process-wide instance backs the free functions of this module;
/// standalone instances are useful for tests and embedding.
#[derive(Debug)]
pub struct UnitRegistry {
    state: RwLock<RegistryState>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        UnitRegistry::new()
    }
}

impl UnitRegistry {
    /// Empty registry with [`DEFAULT_PRECISION`].
    pub fn new() -> Self {
        UnitRegistry {
            state: RwLock::new(RegistryState {
                units: BTreeSet::new(),
                default_precision: DEFAULT_PRECISION,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Uppercases and inserts every symbol. Re-registering is a no-op.
    ///
    /// Symbols are validated before anything is inserted, so a bad symbol
    /// leaves the registry untouched.
    pub fn register<I, S>(&self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = symbols
            .into_iter()
            .map(|s| normalize_symbol(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut state = self.write();
        for symbol in normalized {
            if state.units.insert(symbol.clone()) {
                debug!(unit = %symbol, "Registered unit");
            }
        }
        Ok(())
    }

    /// Inserts one symbol, failing with `Conflict` if it is already present.
    pub fn register_strict(&self, symbol: &str) -> Result<()> {
        let symbol = normalize_symbol(symbol)?;
        let mut state = self.write();
        if state.units.contains(&symbol) {
            return Err(Error::conflict("unit already registered").with_context("unit", symbol));
        }
        debug!(unit = %symbol, "Registered unit (strict)");
        state.units.insert(symbol);
        Ok(())
    }

    /// Case-insensitive membership test.
    pub fn is_registered(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        self.read().units.contains(&symbol)
    }

    /// Snapshot of the registered symbols, sorted.
    pub fn units(&self) -> Vec<String> {
        self.read().units.iter().cloned().collect()
    }

    /// Looks up a symbol, failing with `NotFound` when it is not registered.
    pub fn resolve(&self, symbol: &str) -> Result<Unit> {
        let normalized = symbol.trim().to_uppercase();
        if self.read().units.contains(&normalized) {
            Ok(Unit(normalized))
        } else {
            Err(Error::not_found("unit is not registered").with_context("unit", symbol))
        }
    }

    /// Sets the precision for quantities created from now on (0..=9).
    pub fn set_default_precision(&self, precision: u8) -> Result<()> {
        if precision > MAX_PRECISION {
            return Err(Error::invalid("precision out of range")
                .with_context("input", precision)
                .with_context("max", MAX_PRECISION));
        }
        let mut state = self.write();
        debug!(from = state.default_precision, to = precision, "Default precision changed");
        state.default_precision = precision;
        Ok(())
    }

    pub fn default_precision(&self) -> u8 {
        self.read().default_precision
    }
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let normalized = symbol.trim().to_uppercase();
    if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
        return Err(Error::invalid("unit symbol must be a single non-empty word").with_context("input", symbol));
    }
    Ok(normalized)
}

// =============================================================================
// Unit
// =============================================================================

/// A registered, uppercase unit symbol.
///
/// Only obtainable through a registry lookup, so a non-empty `Unit` was
/// registered when it was created. `Unit::default()` is the empty zero value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unit(String);

impl Unit {
    /// Resolves a symbol against the process-wide registry.
    pub fn new(symbol: &str) -> Result<Self> {
        global().resolve(symbol)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Unit {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Unit::new(&value)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}

// =============================================================================
// Process-wide Registry
// =============================================================================

static GLOBAL: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// The process-wide registry.
pub fn global() -> &'static UnitRegistry {
    &GLOBAL
}

/// Registers symbols in the process-wide registry.
///
/// ## Example
/// ```rust
/// use valor_core::units;
///
/// units::register_units(["kg", "L"]).unwrap();
/// assert!(units::is_registered("KG"));
/// ```
pub fn register_units<I, S>(symbols: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GLOBAL.register(symbols)
}

/// Strict registration in the process-wide registry (`Conflict` on duplicates).
pub fn register_unit_strict(symbol: &str) -> Result<()> {
    GLOBAL.register_strict(symbol)
}

pub fn is_registered(symbol: &str) -> bool {
    GLOBAL.is_registered(symbol)
}

pub fn registered_units() -> Vec<String> {
    GLOBAL.units()
}

pub fn set_default_precision(precision: u8) -> Result<()> {
    GLOBAL.set_default_precision(precision)
}

pub fn default_precision() -> u8 {
    GLOBAL.default_precision()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_register_uppercases_and_is_idempotent() {
        let registry = UnitRegistry::new();
        registry.register(["kg", "KG", " l "]).unwrap();
        assert!(registry.is_registered("KG"));
        assert!(registry.is_registered("kg"));
        assert!(registry.is_registered("L"));
        assert_eq!(registry.units(), vec!["KG".to_string(), "L".to_string()]);
    }

    #[test]
    fn test_register_rejects_blank_symbols_atomically() {
        let registry = UnitRegistry::new();
        let err = registry.register(["M", " "]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
        assert!(!registry.is_registered("M"));
        assert!(registry.register(["CUBIC METER"]).is_err());
    }

    #[test]
    fn test_strict_registration_conflicts() {
        let registry = UnitRegistry::new();
        registry.register_strict("un").unwrap();
        assert_eq!(registry.register_strict("UN").unwrap_err().code(), ErrorCode::Conflict);
    }

    #[test]
    fn test_resolve() {
        let registry = UnitRegistry::new();
        assert_eq!(registry.resolve("kg").unwrap_err().code(), ErrorCode::NotFound);
        registry.register(["KG"]).unwrap();
        assert_eq!(registry.resolve("kg").unwrap().as_str(), "KG");
    }

    #[test]
    fn test_default_precision() {
        let registry = UnitRegistry::new();
        assert_eq!(registry.default_precision(), DEFAULT_PRECISION);
        registry.set_default_precision(9).unwrap();
        assert_eq!(registry.default_precision(), 9);
        assert_eq!(registry.set_default_precision(10).unwrap_err().code(), ErrorCode::Invalid);
        assert_eq!(registry.default_precision(), 9);
    }

    #[test]
    fn test_concurrent_readers_see_writes() {
        let registry = Arc::new(UnitRegistry::new());
        registry.register(["KG"]).unwrap();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || (0..1000).all(|_| registry.is_registered("KG")))
            })
            .collect();
        registry.register(["L"]).unwrap();

        for reader in readers {
            assert!(reader.join().unwrap());
        }
        assert!(registry.is_registered("L"));
    }
}
