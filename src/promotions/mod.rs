//! Promotions
//!
//! Promo codes and the rules deciding whether one may be applied to an order.
//! A code being invalid is an ordinary outcome: [`validate`] reports it as a
//! [`PromoRejection`] value and never panics.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{pricing::round_cents, promotions::budget::UsageBudget};

pub mod budget;
pub mod source;

/// Why a promo code could not be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromoRejection {
    /// No active promo code matches.
    #[error("invalid promo code")]
    NotFound,

    /// The code is outside its validity window.
    #[error("promo code has expired")]
    Expired,

    /// The code has been redeemed as often as allowed.
    #[error("promo code usage limit reached")]
    UsageLimitReached,

    /// The order subtotal is below the code's minimum.
    #[error("minimum order amount of {minimum:.2} required")]
    BelowMinimum {
        /// Required minimum subtotal
        minimum: Decimal,
    },
}

/// How a promo code reduces the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// A percentage of the subtotal, optionally capped.
    Percentage {
        /// Percent points, e.g. `20` for 20%
        percent: Decimal,

        /// Largest discount this code can give
        max_discount: Option<Decimal>,
    },

    /// A fixed amount off the order.
    Fixed {
        /// Amount off
        amount: Decimal,
    },
}

impl DiscountKind {
    /// Discount for a subtotal, before rounding.
    pub fn amount_for(&self, subtotal: Decimal) -> Decimal {
        match *self {
            Self::Percentage {
                percent,
                max_discount,
            } => {
                let discount = Percentage::from(percent / Decimal::ONE_HUNDRED) * subtotal;

                match max_discount {
                    Some(cap) if discount > cap => cap,
                    _ => discount,
                }
            }
            Self::Fixed { amount } => amount,
        }
    }
}

/// A promo code record as held by the promo record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    /// Canonical (uppercase) code
    pub code: String,

    /// Inactive codes behave as if they did not exist
    pub active: bool,

    /// Discount rule
    pub discount: DiscountKind,

    /// Smallest subtotal the code applies to
    pub min_order_amount: Option<Decimal>,

    /// Start of the validity window (inclusive)
    pub valid_from: Timestamp,

    /// End of the validity window (inclusive)
    pub valid_until: Timestamp,

    /// Redemption limit and count
    pub usage: UsageBudget,
}

impl PromoCode {
    /// Whether `now` falls inside the validity window.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }
}

/// A promo code that passed validation, with the discount it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPromo {
    /// Canonical code
    pub code: String,

    /// Discount, rounded to whole cents
    pub discount: Decimal,
}

/// Canonical form of a user-entered code.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Checks a promo code against an order and computes its discount.
///
/// Checks run in order and stop at the first failure: existence and active
/// flag, validity window, usage limit, minimum order amount. The minimum is
/// compared against the subtotal in cents, as the customer sees it. Usage
/// counts are not touched.
///
/// # Errors
///
/// Returns the [`PromoRejection`] describing the first failed check.
pub fn validate(
    code: &str,
    order_subtotal: Decimal,
    record: Option<&PromoCode>,
    now: Timestamp,
) -> Result<AppliedPromo, PromoRejection> {
    let code = canonical_code(code);

    let record = record
        .filter(|record| record.active && canonical_code(&record.code) == code)
        .ok_or(PromoRejection::NotFound)?;

    if !record.is_valid_at(now) {
        return Err(PromoRejection::Expired);
    }

    if !record.usage.has_capacity() {
        return Err(PromoRejection::UsageLimitReached);
    }

    if let Some(minimum) = record
        .min_order_amount
        .filter(|minimum| round_cents(order_subtotal) < *minimum)
    {
        return Err(PromoRejection::BelowMinimum { minimum });
    }

    Ok(AppliedPromo {
        code,
        discount: round_cents(record.discount.amount_for(order_subtotal)),
    })
}
