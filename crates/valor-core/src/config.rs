//! # Settings
//!
//! Process-wide knobs loaded once at startup.
//!
//! ## Sources (Priority Order)
//! 1. Environment variables (`VALOR_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! - `VALOR_DEFAULT_PRECISION`: quantity precision, `0..=9` (default 2)
//! - `VALOR_UNITS`: comma-separated unit symbols, e.g. `KG,L,UN`
//! - `VALOR_LEGAL_AGE`: age of majority in years (default 18)
//!
//! [`Settings::apply`] pushes the values into the unit registry and the
//! legal-age check. Nothing is applied implicitly.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::temporal::{self, DEFAULT_LEGAL_AGE};
use crate::units::{self, UnitRegistry, DEFAULT_PRECISION, MAX_PRECISION};

pub const ENV_DEFAULT_PRECISION: &str = "VALOR_DEFAULT_PRECISION";
pub const ENV_UNITS: &str = "VALOR_UNITS";
pub const ENV_LEGAL_AGE: &str = "VALOR_LEGAL_AGE";

/// Library settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Precision for quantities created after `apply`.
    pub default_precision: u8,

    /// Unit symbols to register.
    pub units: Vec<String>,

    /// Age checked by `BirthDate::is_legal_age`.
    pub legal_age: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_precision: DEFAULT_PRECISION,
            units: Vec::new(),
            legal_age: DEFAULT_LEGAL_AGE,
        }
    }
}

impl Settings {
    /// Defaults overridden by `VALOR_*` environment variables.
    ///
    /// Unlike unset variables, malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`Settings::from_env`] against an arbitrary key lookup.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::config::Settings;
    ///
    /// let settings = Settings::from_lookup(|key| match key {
    ///     "VALOR_UNITS" => Some("kg, l".to_string()),
    ///     "VALOR_DEFAULT_PRECISION" => Some("3".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(settings.units, vec!["KG", "L"]);
    /// assert_eq!(settings.default_precision, 3);
    /// assert_eq!(settings.legal_age, 18);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(ENV_DEFAULT_PRECISION) {
            settings.default_precision = parse_number(ENV_DEFAULT_PRECISION, &raw)?;
        }

        if let Some(raw) = lookup(ENV_UNITS) {
            settings.units = raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(raw) = lookup(ENV_LEGAL_AGE) {
            settings.legal_age = parse_number(ENV_LEGAL_AGE, &raw)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_precision > MAX_PRECISION {
            return Err(Error::invalid("default precision out of range")
                .with_context("input", self.default_precision)
                .with_context("max", MAX_PRECISION));
        }
        Ok(())
    }

    /// Installs the settings process-wide.
    pub fn apply(&self) -> Result<()> {
        self.apply_to(units::global())?;
        temporal::set_legal_age(self.legal_age);
        info!(
            default_precision = self.default_precision,
            units = ?self.units,
            legal_age = self.legal_age,
            "Settings applied"
        );
        Ok(())
    }

    /// Installs precision and units into an explicit registry. Legal age is
    /// process-wide and left alone.
    pub fn apply_to(&self, registry: &UnitRegistry) -> Result<()> {
        self.validate()?;
        registry.register(&self.units)?;
        registry.set_default_precision(self.default_precision)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse::<T>().map_err(|e| {
        Error::invalid(format!("{key} is not a valid number"))
            .with_context("variable", key)
            .with_context("input", raw)
            .with_source(e)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
