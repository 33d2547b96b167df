//! Fixtures
//!
//! YAML-backed menu and promo code data.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::promo_codes::PromoCodesFixture,
    promotions::source::InMemoryPromoSource,
};

pub mod menu;
pub mod promo_codes;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid timestamp format
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Invalid promo code data
    #[error("Invalid promo code {code}: {reason}")]
    InvalidPromoCode {
        /// Offending code
        code: String,

        /// What is wrong with it
        reason: &'static str,
    },

    /// Catalog validation error
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a fixture reader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture reader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load the catalog from `<base>/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails catalog validation.
    pub fn load_catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        Catalog::from_yaml_str(&self.read(name)?)
    }

    /// Load promo code records from `<base>/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a record is invalid.
    pub fn load_promo_codes(&self, name: &str) -> Result<InMemoryPromoSource, FixtureError> {
        let contents = self.read(name)?;

        PromoCodesFixture::from_yaml_str(&contents)?.try_into()
    }

    fn read(&self, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(format!("{name}.yml"));

        Ok(fs::read_to_string(&file_path)?)
    }
}

/// Parse a decimal price string (e.g. "12.99").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal number.
pub fn parse_price(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}

/// Parse an RFC 3339 timestamp string.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidTimestamp`] if the string cannot be parsed.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, FixtureError> {
    s.trim()
        .parse::<Timestamp>()
        .map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))
}
