//! Promo Code Usage Budget

/// Redemption limit for a promo code, and how much of it has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageBudget {
    /// Maximum number of redemptions
    pub limit: Option<u32>,

    /// Redemptions recorded so far
    pub count: u32,
}

impl UsageBudget {
    /// A budget with no limit
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            limit: None,
            count: 0,
        }
    }

    /// A budget with a limit and an existing count
    #[must_use]
    pub const fn with_limit(limit: u32, count: u32) -> Self {
        Self {
            limit: Some(limit),
            count,
        }
    }

    /// Whether another redemption is allowed
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        match self.limit {
            Some(limit) => self.count < limit,
            None => true,
        }
    }

    /// Record a redemption if there is capacity, returning the new count.
    pub fn try_consume(&mut self) -> Option<u32> {
        if !self.has_capacity() {
            return None;
        }

        self.count = self.count.checked_add(1)?;

        Some(self.count)
    }
}
