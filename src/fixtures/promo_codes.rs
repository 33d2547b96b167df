//! Promo Code Fixtures

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_price, parse_timestamp},
    promotions::{DiscountKind, PromoCode, budget::UsageBudget, source::InMemoryPromoSource},
};

/// Promo codes as laid out in YAML
#[derive(Debug, Deserialize)]
pub struct PromoCodesFixture {
    /// Promo code records
    pub promo_codes: Vec<PromoCodeFixture>,
}

impl PromoCodesFixture {
    /// Parse promo codes from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the text is not a valid promo code document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }
}

/// Discount configuration from YAML fixtures
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Percentage of the subtotal, in percent points (e.g. "20")
    Percentage {
        /// Percent points
        value: String,

        /// Optional cap (e.g. "5.00")
        #[serde(default)]
        max_discount: Option<String>,
    },

    /// Fixed amount off (e.g. "5.00")
    Fixed {
        /// Amount off
        value: String,
    },
}

/// Promo Code Fixture
#[derive(Debug, Deserialize)]
pub struct PromoCodeFixture {
    /// Code as customers type it
    pub code: String,

    /// Active flag
    #[serde(default = "active_by_default")]
    pub active: bool,

    /// Discount rule
    pub discount: DiscountFixture,

    /// Minimum subtotal (e.g. "20.00")
    #[serde(default)]
    pub min_order_amount: Option<String>,

    /// Start of validity (RFC 3339)
    pub valid_from: String,

    /// End of validity (RFC 3339)
    pub valid_until: String,

    /// Maximum redemptions
    #[serde(default)]
    pub usage_limit: Option<u32>,

    /// Redemptions so far
    #[serde(default)]
    pub usage_count: u32,
}

fn active_by_default() -> bool {
    true
}

fn invalid(code: &str, reason: &'static str) -> FixtureError {
    FixtureError::InvalidPromoCode {
        code: code.to_string(),
        reason,
    }
}

impl TryFrom<PromoCodeFixture> for PromoCode {
    type Error = FixtureError;

    fn try_from(fixture: PromoCodeFixture) -> Result<Self, Self::Error> {
        let discount = match fixture.discount {
            DiscountFixture::Percentage {
                value,
                max_discount,
            } => {
                let percent = parse_price(&value)?;

                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(invalid(&fixture.code, "percentage must be within 0-100"));
                }

                let max_discount = max_discount.as_deref().map(parse_price).transpose()?;

                if max_discount.is_some_and(|cap| cap < Decimal::ZERO) {
                    return Err(invalid(&fixture.code, "max discount must not be negative"));
                }

                DiscountKind::Percentage {
                    percent,
                    max_discount,
                }
            }
            DiscountFixture::Fixed { value } => {
                let amount = parse_price(&value)?;

                if amount < Decimal::ZERO {
                    return Err(invalid(&fixture.code, "fixed discount must not be negative"));
                }

                DiscountKind::Fixed { amount }
            }
        };

        let valid_from = parse_timestamp(&fixture.valid_from)?;
        let valid_until = parse_timestamp(&fixture.valid_until)?;

        if valid_until < valid_from {
            return Err(invalid(&fixture.code, "validity window ends before it starts"));
        }

        let usage = match fixture.usage_limit {
            Some(limit) => UsageBudget::with_limit(limit, fixture.usage_count),
            None => UsageBudget {
                limit: None,
                count: fixture.usage_count,
            },
        };

        Ok(PromoCode {
            code: fixture.code,
            active: fixture.active,
            discount,
            min_order_amount: fixture
                .min_order_amount
                .as_deref()
                .map(parse_price)
                .transpose()?,
            valid_from,
            valid_until,
            usage,
        })
    }
}

impl TryFrom<PromoCodesFixture> for InMemoryPromoSource {
    type Error = FixtureError;

    fn try_from(fixture: PromoCodesFixture) -> Result<Self, Self::Error> {
        fixture
            .promo_codes
            .into_iter()
            .map(PromoCode::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::promotions::source::PromoSource;

    use super::*;

    const CODES: &str = r#"
promo_codes:
  - code: pizza20
    discount:
      type: percentage
      value: "20"
      max_discount: "5.00"
    min_order_amount: "20.00"
    valid_from: "2026-01-01T00:00:00Z"
    valid_until: "2026-12-31T23:59:59Z"
    usage_limit: 10
    usage_count: 2
  - code: FIVEOFF
    discount:
      type: fixed
      value: "5.00"
    valid_from: "2026-01-01T00:00:00Z"
    valid_until: "2026-12-31T23:59:59Z"
"#;

    #[test]
    fn loads_records_keyed_by_canonical_code() -> TestResult {
        let source = InMemoryPromoSource::try_from(PromoCodesFixture::from_yaml_str(CODES)?)?;

        let pizza20 = source.find("PIZZA20").ok_or("missing PIZZA20")?;

        assert!(pizza20.active);
        assert_eq!(pizza20.usage, UsageBudget::with_limit(10, 2));
        assert_eq!(pizza20.min_order_amount, Some(Decimal::new(20_00, 2)));
        assert_eq!(
            pizza20.discount,
            DiscountKind::Percentage {
                percent: Decimal::new(20, 0),
                max_discount: Some(Decimal::new(5_00, 2)),
            }
        );

        let five_off = source.find("fiveoff").ok_or("missing FIVEOFF")?;

        assert_eq!(five_off.usage, UsageBudget::unlimited());

        Ok(())
    }

    #[test]
    fn rejects_percentage_over_one_hundred() -> TestResult {
        let yaml = CODES.replace("value: \"20\"", "value: \"120\"");
        let result = InMemoryPromoSource::try_from(PromoCodesFixture::from_yaml_str(&yaml)?);

        assert!(matches!(
            result,
            Err(FixtureError::InvalidPromoCode { code, .. }) if code == "pizza20"
        ));

        Ok(())
    }

    #[test]
    fn rejects_negative_amounts() -> TestResult {
        let fixed = CODES.replace("value: \"5.00\"", "value: \"-5.00\"");
        let result = InMemoryPromoSource::try_from(PromoCodesFixture::from_yaml_str(&fixed)?);

        assert!(matches!(
            result,
            Err(FixtureError::InvalidPromoCode { code, .. }) if code == "FIVEOFF"
        ));

        let capped = CODES.replace("max_discount: \"5.00\"", "max_discount: \"-1\"");
        let result = InMemoryPromoSource::try_from(PromoCodesFixture::from_yaml_str(&capped)?);

        assert!(matches!(
            result,
            Err(FixtureError::InvalidPromoCode { code, .. }) if code == "pizza20"
        ));

        Ok(())
    }

    #[test]
    fn rejects_inverted_window() -> TestResult {
        let yaml = CODES.replacen("2026-12-31T23:59:59Z", "2025-12-31T23:59:59Z", 1);
        let result = InMemoryPromoSource::try_from(PromoCodesFixture::from_yaml_str(&yaml)?);

        assert!(matches!(result, Err(FixtureError::InvalidPromoCode { .. })));

        Ok(())
    }

    #[test]
    fn rejects_unknown_discount_type() {
        let yaml = CODES.replace("type: fixed", "type: bogof");

        assert!(matches!(
            PromoCodesFixture::from_yaml_str(&yaml),
            Err(FixtureError::Yaml(_))
        ));
    }
}
