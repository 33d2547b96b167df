//! Storefront configuration
//!
//! Command-line and environment settings, loaded with `clap` after `.env`
//! has been read.

use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::pricing::PricingConfig;

/// Configuration Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A rate or amount is outside its allowed range
    #[error("{name} must be {expected}, got {value}")]
    OutOfRange {
        /// Setting name
        name: &'static str,

        /// Allowed range
        expected: &'static str,

        /// Supplied value
        value: Decimal,
    },
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Store pricing settings.
#[derive(Debug, Clone, Args)]
pub struct PricingArgs {
    /// Sales tax rate as a fraction (0.08 = 8%)
    #[arg(long, env = "TAX_RATE", default_value = "0.08", global = true)]
    pub tax_rate: Decimal,

    /// Delivery fee charged below the free delivery threshold
    #[arg(long, env = "DELIVERY_FEE", default_value = "4.99", global = true)]
    pub delivery_fee: Decimal,

    /// Subtotal at or above which delivery is free
    #[arg(long, env = "FREE_DELIVERY_THRESHOLD", default_value = "30", global = true)]
    pub free_delivery_threshold: Decimal,

    /// ISO currency code for all prices
    #[arg(long, env = "CURRENCY", default_value = "USD", global = true)]
    pub currency: String,
}

impl Default for PricingArgs {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            delivery_fee: Decimal::new(4_99, 2),
            free_delivery_threshold: Decimal::new(30, 0),
            currency: "USD".to_string(),
        }
    }
}

impl TryFrom<&PricingArgs> for PricingConfig {
    type Error = ConfigError;

    fn try_from(args: &PricingArgs) -> Result<Self, Self::Error> {
        if args.tax_rate < Decimal::ZERO || args.tax_rate > Decimal::ONE {
            return Err(ConfigError::OutOfRange {
                name: "tax rate",
                expected: "between 0 and 1",
                value: args.tax_rate,
            });
        }

        if args.delivery_fee < Decimal::ZERO {
            return Err(ConfigError::OutOfRange {
                name: "delivery fee",
                expected: "non-negative",
                value: args.delivery_fee,
            });
        }

        if args.free_delivery_threshold < Decimal::ZERO {
            return Err(ConfigError::OutOfRange {
                name: "free delivery threshold",
                expected: "non-negative",
                value: args.free_delivery_threshold,
            });
        }

        Ok(PricingConfig {
            tax_rate: args.tax_rate,
            delivery_fee: args.delivery_fee,
            free_delivery_threshold: args.free_delivery_threshold,
            currency: parse_currency(&args.currency)?,
        })
    }
}

/// Where menu data, the cart, placed orders and promo usage live.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding `menu.yml` and `promo_codes.yml`
    #[arg(long, env = "PIZZERIA_FIXTURES", default_value = "./fixtures", global = true)]
    pub fixtures: PathBuf,

    /// File the cart is persisted to between commands
    #[arg(long, env = "PIZZERIA_CART_FILE", default_value = "./cart.json", global = true)]
    pub cart_file: PathBuf,

    /// File placed orders are recorded in
    #[arg(long, env = "PIZZERIA_ORDERS_FILE", default_value = "./orders.json", global = true)]
    pub orders_file: PathBuf,

    /// File promo code redemption counts are recorded in
    #[arg(
        long,
        env = "PIZZERIA_PROMO_USAGE_FILE",
        default_value = "./promo_usage.json",
        global = true
    )]
    pub promo_usage_file: PathBuf,
}

/// Resolve an ISO currency code.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] for codes the store does not price in.
pub fn parse_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code.trim().to_uppercase().as_str() {
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        "GBP" => Ok(iso::GBP),
        "CAD" => Ok(iso::CAD),
        "AUD" => Ok(iso::AUD),
        _ => Err(ConfigError::UnknownCurrency(code.to_string())),
    }
}
