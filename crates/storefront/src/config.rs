//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GS_DATA_DIR` - Directory holding persisted cart state (default: `.genset-spares`)
//! - `GS_CATALOG_DIR` - Directory of catalog YAML files (default: `crates/storefront/catalogs`)
//! - `GS_CONTACT_PHONE` - Number that receives order messages, digits only
//!   with country code (default: 919911231643)
//! - `GS_TAX_RATE` - Tax rate as a fraction (default: 0.18)
//! - `GS_CURRENCY` - ISO 4217 currency code (default: INR)
//! - `GS_QUANTITY_POLICY` - `remove` to delete entries set below one,
//!   `floor` to keep them at one (default: remove)
//! - `GS_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use genset_spares_core::CurrencyCode;
use thiserror::Error;

use crate::cart::QuantityPolicy;
use crate::checkout::OrderSettings;
use crate::contact::PhoneNumber;
use crate::order::TaxRate;

const DEFAULT_DATA_DIR: &str = ".genset-spares";
const DEFAULT_CATALOG_DIR: &str = "crates/storefront/catalogs";
const DEFAULT_CONTACT_PHONE: &str = "919911231643";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format for the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for the persistent key-value store
    pub data_dir: PathBuf,
    /// Directory of catalog definitions
    pub catalog_dir: PathBuf,
    /// Number that receives order messages
    pub contact_phone: PhoneNumber,
    /// Flat tax applied to the subtotal
    pub tax_rate: TaxRate,
    /// Currency for displayed prices
    pub currency: CurrencyCode,
    /// Handling of quantities set below one
    pub quantity_policy: QuantityPolicy,
    /// Log output format
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_or_default(&lookup, "GS_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog_dir = PathBuf::from(get_or_default(
            &lookup,
            "GS_CATALOG_DIR",
            DEFAULT_CATALOG_DIR,
        ));
        let contact_phone = PhoneNumber::parse(&get_or_default(
            &lookup,
            "GS_CONTACT_PHONE",
            DEFAULT_CONTACT_PHONE,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("GS_CONTACT_PHONE".to_string(), e.to_string()))?;

        Ok(Self {
            data_dir,
            catalog_dir,
            contact_phone,
            tax_rate: parse_or_default(&lookup, "GS_TAX_RATE")?,
            currency: parse_or_default(&lookup, "GS_CURRENCY")?,
            quantity_policy: parse_or_default(&lookup, "GS_QUANTITY_POLICY")?,
            log_format: parse_or_default(&lookup, "GS_LOG_FORMAT")?,
        })
    }

    /// Pricing and contact settings used at checkout.
    #[must_use]
    pub fn order_settings(&self) -> OrderSettings {
        OrderSettings {
            tax_rate: self.tax_rate,
            currency: self.currency,
            contact_phone: self.contact_phone.clone(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to the type's default when unset.
fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<T, ConfigError>
where
    T: FromStr + Default,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(T::default()),
    }
}
