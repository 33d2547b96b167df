use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};

use pizzeria::{
    cart::{Cart, LineItem, LineItemId},
    catalog::Catalog,
    config::{PricingArgs, StorageConfig},
    fixtures::Fixture,
    orders::InMemoryOrderBook,
    pricing::PricingConfig,
    promotions::source::{InMemoryPromoSource, UsageCounts},
};

/// State shared by every command: pricing, fixture data and the files the
/// storefront keeps between runs.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) pricing: PricingConfig,
    fixture: Fixture,
    cart_file: PathBuf,
    orders_file: PathBuf,
    promo_usage_file: PathBuf,
}

impl Session {
    pub(crate) fn new(pricing: &PricingArgs, storage: StorageConfig) -> Result<Self> {
        Ok(Self {
            pricing: PricingConfig::try_from(pricing)?,
            fixture: Fixture::with_base_path(storage.fixtures),
            cart_file: storage.cart_file,
            orders_file: storage.orders_file,
            promo_usage_file: storage.promo_usage_file,
        })
    }

    pub(crate) fn catalog(&self) -> Result<Catalog> {
        self.fixture
            .load_catalog("menu")
            .context("failed to load menu")
    }

    /// Promo codes from the fixtures with earlier redemptions applied.
    pub(crate) fn promo_source(&self) -> Result<InMemoryPromoSource> {
        let mut source = self
            .fixture
            .load_promo_codes("promo_codes")
            .context("failed to load promo codes")?;

        if let Some(json) = read_if_exists(&self.promo_usage_file)? {
            let counts = UsageCounts::from_json(&json).with_context(|| {
                format!("failed to restore promo usage from {}", self.promo_usage_file.display())
            })?;

            source.restore_usage(&counts);
        }

        Ok(source)
    }

    pub(crate) fn save_promo_usage(&self, source: &InMemoryPromoSource) -> Result<()> {
        fs::write(&self.promo_usage_file, source.usage_counts().to_json()?)
            .with_context(|| format!("failed to write {}", self.promo_usage_file.display()))
    }

    /// Orders placed so far, or an empty book if none have been.
    pub(crate) fn load_orders(&self) -> Result<InMemoryOrderBook> {
        match read_if_exists(&self.orders_file)? {
            Some(json) => InMemoryOrderBook::from_json(&json).with_context(|| {
                format!("failed to restore orders from {}", self.orders_file.display())
            }),
            None => Ok(InMemoryOrderBook::new()),
        }
    }

    pub(crate) fn save_orders(&self, orders: &InMemoryOrderBook) -> Result<()> {
        fs::write(&self.orders_file, orders.to_json()?)
            .with_context(|| format!("failed to write {}", self.orders_file.display()))
    }

    /// The persisted cart, or an empty one if nothing has been saved yet.
    pub(crate) fn load_cart(&self) -> Result<Cart> {
        match read_if_exists(&self.cart_file)? {
            Some(json) => Cart::from_json(&json).with_context(|| {
                format!("failed to restore cart from {}", self.cart_file.display())
            }),
            None => Ok(Cart::new()),
        }
    }

    pub(crate) fn save_cart(&self, cart: &Cart) -> Result<()> {
        fs::write(&self.cart_file, cart.to_json()?)
            .with_context(|| format!("failed to write {}", self.cart_file.display()))
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Id of the line item at a 1-based position.
pub(crate) fn line_at(cart: &Cart, position: usize) -> Result<LineItemId> {
    position
        .checked_sub(1)
        .and_then(|idx| cart.items().get(idx))
        .map(LineItem::id)
        .ok_or_else(|| anyhow!("no cart item at position {position}"))
}
