//! Promo Record Source
//!
//! Where promo code records come from, and where redemptions are recorded.

use std::collections::BTreeMap;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::promotions::{PromoCode, PromoRejection, canonical_code};

/// Lookup and redemption of promo code records.
pub trait PromoSource {
    /// Fetch the record for a code, in any letter case.
    fn find(&self, code: &str) -> Option<PromoCode>;

    /// Record a redemption of a code after a successful order.
    ///
    /// The usage-limit check and the increment happen together, so two
    /// concurrent redemptions cannot both take the last remaining use.
    /// Returns the new usage count.
    ///
    /// # Errors
    ///
    /// Returns [`PromoRejection::NotFound`] for an unknown code and
    /// [`PromoRejection::UsageLimitReached`] if no uses remain.
    fn redeem(&mut self, code: &str, now: Timestamp) -> Result<u32, PromoRejection>;
}

/// In-memory promo record source keyed by canonical code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPromoSource {
    codes: FxHashMap<String, PromoCode>,
}

impl InMemoryPromoSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the record it replaced.
    pub fn insert(&mut self, mut record: PromoCode) -> Option<PromoCode> {
        record.code = canonical_code(&record.code);

        self.codes.insert(record.code.clone(), record)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Redemption counts by canonical code, persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageCounts(BTreeMap<String, u32>);

impl UsageCounts {
    /// Redemptions recorded for a code.
    pub fn get(&self, code: &str) -> Option<u32> {
        self.0.get(&canonical_code(code)).copied()
    }

    /// Serialize the counts to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restore counts written by [`UsageCounts::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl InMemoryPromoSource {
    /// Current redemption count of every code.
    pub fn usage_counts(&self) -> UsageCounts {
        UsageCounts(
            self.codes
                .iter()
                .map(|(code, record)| (code.clone(), record.usage.count))
                .collect(),
        )
    }

    /// Carry recorded redemptions over onto freshly loaded records.
    ///
    /// Counts only move forward; codes no longer present are ignored.
    pub fn restore_usage(&mut self, counts: &UsageCounts) {
        for (code, &count) in &counts.0 {
            match self.codes.get_mut(&canonical_code(code)) {
                Some(record) => record.usage.count = record.usage.count.max(count),
                None => debug!(%code, "ignoring usage for unknown promo code"),
            }
        }
    }
}

impl FromIterator<PromoCode> for InMemoryPromoSource {
    fn from_iter<I: IntoIterator<Item = PromoCode>>(iter: I) -> Self {
        let mut source = Self::new();

        for record in iter {
            source.insert(record);
        }

        source
    }
}

impl PromoSource for InMemoryPromoSource {
    fn find(&self, code: &str) -> Option<PromoCode> {
        self.codes.get(&canonical_code(code)).cloned()
    }

    fn redeem(&mut self, code: &str, now: Timestamp) -> Result<u32, PromoRejection> {
        let record = self
            .codes
            .get_mut(&canonical_code(code))
            .ok_or(PromoRejection::NotFound)?;

        let count = record
            .usage
            .try_consume()
            .ok_or(PromoRejection::UsageLimitReached)?;

        info!(code = %record.code, count, at = %now, "promo code redeemed");

        Ok(count)
    }
}
