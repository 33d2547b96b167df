//! Pricing
//!
//! Unit prices are derived from a pizza's base price and its configuration and
//! are kept unrounded. Order totals are rounded to whole cents using
//! [`RoundingStrategy::MidpointAwayFromZero`], component by component, and the
//! grand total is the sum of the rounded components so a printed receipt
//! always adds up.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::parse_currency,
    configuration::{Crust, PizzaConfiguration, Size},
};

/// Number of decimal places monetary values are rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur while calculating order totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An amount could not be represented in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    Computation(Decimal),

    /// A stored currency code is not one the store prices in.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// An order type name that is neither `delivery` nor `pickup`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order type: {0}")]
pub struct UnknownOrderType(pub String);

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Delivered to an address; may carry a delivery fee.
    #[default]
    Delivery,

    /// Collected from the store; never charged a delivery fee.
    Pickup,
}

impl OrderType {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }
}

impl FromStr for OrderType {
    type Err = UnknownOrderType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Delivery, Self::Pickup]
            .into_iter()
            .find(|order_type| order_type.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOrderType(s.to_string()))
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Store-wide pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    /// Sales tax rate applied to the subtotal, as a fraction.
    pub tax_rate: Decimal,

    /// Flat fee charged on delivery orders below the threshold.
    pub delivery_fee: Decimal,

    /// Subtotal at or above which delivery is free.
    pub free_delivery_threshold: Decimal,

    /// Currency all totals are expressed in.
    pub currency: &'static Currency,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            delivery_fee: Decimal::new(4_99, 2),
            free_delivery_threshold: Decimal::new(30, 0),
            currency: rusty_money::iso::USD,
        }
    }
}

impl PricingConfig {
    /// Delivery fee for a subtotal and order type.
    ///
    /// The threshold is compared against the subtotal rounded to cents.
    pub fn delivery_fee_for(&self, subtotal: Decimal, order_type: OrderType) -> Decimal {
        match order_type {
            OrderType::Pickup => Decimal::ZERO,
            OrderType::Delivery if round_cents(subtotal) >= self.free_delivery_threshold => {
                Decimal::ZERO
            }
            OrderType::Delivery => self.delivery_fee,
        }
    }
}

/// Price multiplier applied to the base price for each size.
pub fn size_multiplier(size: Size) -> Decimal {
    match size {
        Size::Small => Decimal::new(8, 1),
        Size::Medium => Decimal::ONE,
        Size::Large => Decimal::new(13, 1),
        Size::Xl => Decimal::new(16, 1),
    }
}

/// Flat surcharge for each crust type.
pub fn crust_surcharge(crust: Crust) -> Decimal {
    match crust {
        Crust::Thin | Crust::Regular => Decimal::ZERO,
        Crust::Thick => Decimal::new(1_50, 2),
        Crust::Stuffed => Decimal::new(3_00, 2),
    }
}

/// Calculates the unit price of a configured pizza.
///
/// `base_price * size multiplier + crust surcharge + sum of topping prices`,
/// unrounded. Sauce and cheese do not affect the price.
pub fn unit_price(base_price: Decimal, configuration: &PizzaConfiguration) -> Decimal {
    let toppings: Decimal = configuration.toppings.iter().map(|t| t.price).sum();

    base_price * size_multiplier(configuration.size) + crust_surcharge(configuration.crust) + toppings
}

/// Round an amount to whole cents.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an amount to whole cents and express it as money.
///
/// # Errors
///
/// Returns [`PricingError::Computation`] if the amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = round_cents(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .ok_or(PricingError::Computation(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Order-level totals, rounded to whole cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TotalsRecord", try_from = "TotalsRecord")]
pub struct OrderTotals {
    subtotal: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    delivery_fee: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
    currency: &'static Currency,
}

impl OrderTotals {
    /// Currency the totals are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of line items before tax, delivery and discount.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Sales tax.
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Delivery fee.
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.delivery_fee
    }

    /// Promotional discount.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Amount payable.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }
}

/// Stored form of [`OrderTotals`]: plain decimals plus the ISO currency code.
#[derive(Serialize, Deserialize)]
struct TotalsRecord {
    currency: String,
    subtotal: Decimal,
    tax: Decimal,
    delivery_fee: Decimal,
    discount: Decimal,
    total: Decimal,
}

impl From<OrderTotals> for TotalsRecord {
    fn from(totals: OrderTotals) -> Self {
        Self {
            currency: totals.currency.iso_alpha_code.to_string(),
            subtotal: *totals.subtotal.amount(),
            tax: *totals.tax.amount(),
            delivery_fee: *totals.delivery_fee.amount(),
            discount: *totals.discount.amount(),
            total: *totals.total.amount(),
        }
    }
}

impl TryFrom<TotalsRecord> for OrderTotals {
    type Error = PricingError;

    fn try_from(record: TotalsRecord) -> Result<Self, Self::Error> {
        let currency = parse_currency(&record.currency)
            .map_err(|_err| PricingError::UnknownCurrency(record.currency.clone()))?;

        Ok(Self {
            subtotal: to_money(record.subtotal, currency)?,
            tax: to_money(record.tax, currency)?,
            delivery_fee: to_money(record.delivery_fee, currency)?,
            discount: to_money(record.discount, currency)?,
            total: to_money(record.total, currency)?,
            currency,
        })
    }
}

/// Calculates tax, delivery fee and the grand total for an order.
///
/// Negative discounts are treated as zero and the total never drops below zero.
///
/// # Errors
///
/// Returns [`PricingError::Computation`] if an amount does not fit in minor units.
pub fn order_totals(
    subtotal: Decimal,
    order_type: OrderType,
    discount: Decimal,
    config: &PricingConfig,
) -> Result<OrderTotals, PricingError> {
    let subtotal_cents = round_cents(subtotal);
    let tax_cents = round_cents(subtotal * config.tax_rate);
    let delivery_cents = round_cents(config.delivery_fee_for(subtotal_cents, order_type));
    let discount_cents = round_cents(discount.max(Decimal::ZERO));

    let total_cents =
        (subtotal_cents + tax_cents + delivery_cents - discount_cents).max(Decimal::ZERO);

    Ok(OrderTotals {
        subtotal: to_money(subtotal_cents, config.currency)?,
        tax: to_money(tax_cents, config.currency)?,
        delivery_fee: to_money(delivery_cents, config.currency)?,
        discount: to_money(discount_cents, config.currency)?,
        total: to_money(total_cents, config.currency)?,
        currency: config.currency,
    })
}
