//! Cart
//!
//! A session's cart: an ordered list of line items where each distinct
//! (pizza, configuration) pair appears at most once. Adding an equivalent pizza
//! again bumps the existing line's quantity instead of creating a new line.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Pizza, configuration::PizzaConfiguration, ids::TypedUuid, pricing::unit_price,
};

/// Line Item Id
pub type LineItemId = TypedUuid<LineItem>;

/// Errors related to cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities must be at least one (and fit in a `u32` after merging).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u64),

    /// A persisted cart violates a cart invariant.
    #[error("corrupt cart: {0}")]
    Corrupt(String),

    /// A persisted cart could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A single cart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    pizza_id: String,
    pizza_name: String,
    image: String,
    configuration: PizzaConfiguration,
    quantity: u32,
    unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special_instructions: Option<String>,
}

impl LineItem {
    /// Line item id
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Id of the pizza this line is for
    pub fn pizza_id(&self) -> &str {
        &self.pizza_id
    }

    /// Pizza display name at the time it was added
    pub fn pizza_name(&self) -> &str {
        &self.pizza_name
    }

    /// Pizza image reference at the time it was added
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Chosen configuration
    pub fn configuration(&self) -> &PizzaConfiguration {
        &self.configuration
    }

    /// Number of pizzas
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price snapshot, unrounded
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Free-text instructions for the kitchen
    pub fn special_instructions(&self) -> Option<&str> {
        self.special_instructions.as_deref()
    }

    /// `unit_price * quantity`, unrounded
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn is_equivalent(&self, pizza_id: &str, configuration: &PizzaConfiguration) -> bool {
        self.pizza_id == pizza_id && self.configuration == *configuration
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

#[derive(Deserialize)]
struct PersistedCart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configured pizza to the cart.
    ///
    /// The unit price is computed now and never recomputed. If an equivalent
    /// line already exists its quantity is increased and its special
    /// instructions are left as they were; the id of that line is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is zero or the
    /// merged quantity would overflow.
    pub fn add_item(
        &mut self,
        pizza: &Pizza,
        configuration: PizzaConfiguration,
        quantity: u32,
        special_instructions: Option<String>,
    ) -> Result<LineItemId, CartError> {
        ensure_positive(quantity)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.is_equivalent(&pizza.id, &configuration))
        {
            let current = existing.quantity;

            existing.quantity = current.checked_add(quantity).ok_or_else(|| {
                CartError::InvalidQuantity(u64::from(current) + u64::from(quantity))
            })?;

            debug!(item = %existing.id, quantity = existing.quantity, "merged into existing line item");

            return Ok(existing.id);
        }

        let item = LineItem {
            id: LineItemId::new(),
            pizza_id: pizza.id.clone(),
            pizza_name: pizza.name.clone(),
            image: pizza.image.clone(),
            unit_price: unit_price(pizza.base_price, &configuration),
            configuration,
            quantity,
            special_instructions: special_instructions
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        };

        let id = item.id;

        debug!(item = %id, pizza = %item.pizza_id, unit_price = %item.unit_price, "added line item");

        self.items.push(item);

        Ok(id)
    }

    /// Set the quantity of a line item. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is zero.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: u32) -> Result<(), CartError> {
        ensure_positive(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }

        Ok(())
    }

    /// Remove a line item, returning it if it was present.
    pub fn remove_item(&mut self, id: LineItemId) -> Option<LineItem> {
        let position = self.items.iter().position(|item| item.id == id)?;

        Some(self.items.remove(position))
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `unit_price * quantity` over all lines, unrounded.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Total number of pizzas across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Line items in the order they were added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by id.
    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize the cart for storage between sessions.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a cart saved with [`Cart::to_json`], re-checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Json`] for malformed input and
    /// [`CartError::Corrupt`] if the stored lines break a cart invariant.
    pub fn from_json(json: &str) -> Result<Self, CartError> {
        let persisted: PersistedCart = serde_json::from_str(json)?;

        Self::with_items(persisted.items)
    }

    /// Build a cart from existing line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Corrupt`] if ids repeat, two lines are equivalent,
    /// a quantity is zero or a unit price is negative.
    pub fn with_items(items: impl Into<Vec<LineItem>>) -> Result<Self, CartError> {
        let items = items.into();
        let mut ids = FxHashSet::default();

        for (idx, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartError::Corrupt(format!("line {idx} has zero quantity")));
            }

            if item.unit_price < Decimal::ZERO {
                return Err(CartError::Corrupt(format!("line {idx} has a negative price")));
            }

            if !ids.insert(item.id) {
                return Err(CartError::Corrupt(format!("line {idx} repeats id {}", item.id)));
            }

            let duplicate = items
                .iter()
                .take(idx)
                .any(|earlier| earlier.is_equivalent(&item.pizza_id, &item.configuration));

            if duplicate {
                return Err(CartError::Corrupt(format!(
                    "line {idx} duplicates an earlier pizza configuration"
                )));
            }
        }

        Ok(Self { items })
    }
}

fn ensure_positive(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        Err(CartError::InvalidQuantity(0))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        catalog::{PizzaCategory, Topping, ToppingCategory},
        configuration::{Cheese, Crust, Sauce, Size},
    };

    use super::*;

    fn margherita() -> Pizza {
        Pizza {
            id: "1".to_string(),
            name: "Margherita".to_string(),
            description: "Classic tomato sauce, fresh mozzarella, and basil".to_string(),
            category: PizzaCategory::Classic,
            base_price: Decimal::new(12_99, 2),
            image: "/margherita.jpg".to_string(),
            popular: true,
        }
    }

    fn topping(id: &str, cents: i64) -> Topping {
        Topping {
            id: id.to_string(),
            name: id.to_string(),
            category: ToppingCategory::Meat,
            price: Decimal::new(cents, 2),
        }
    }

    fn large(toppings: Vec<Topping>) -> PizzaConfiguration {
        PizzaConfiguration::new(Size::Large, Crust::Stuffed, Sauce::Tomato, Cheese::Regular, toppings)
    }

    #[test]
    fn adding_same_configuration_twice_merges() -> TestResult {
        let mut cart = Cart::new();

        let first = cart.add_item(&margherita(), large(vec![]), 1, None)?;
        let second = cart.add_item(&margherita(), large(vec![]), 1, None)?;

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn topping_order_does_not_prevent_merge() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&margherita(), large(vec![topping("a", 1_00), topping("b", 2_00)]), 1, None)?;
        cart.add_item(&margherita(), large(vec![topping("b", 2_00), topping("a", 1_00)]), 1, None)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(LineItem::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn different_configurations_get_separate_lines() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&margherita(), large(vec![]), 1, None)?;
        cart.add_item(&margherita(), PizzaConfiguration::default(), 1, None)?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn merge_keeps_first_special_instructions() -> TestResult {
        let mut cart = Cart::new();

        let id = cart.add_item(&margherita(), large(vec![]), 1, Some("extra crispy".to_string()))?;
        cart.add_item(&margherita(), large(vec![]), 2, Some("well done".to_string()))?;

        let item = cart.item(id).ok_or("missing item")?;
        assert_eq!(item.special_instructions(), Some("extra crispy"));
        assert_eq!(item.quantity(), 3);

        Ok(())
    }

    #[test]
    fn blank_special_instructions_are_dropped() -> TestResult {
        let mut cart = Cart::new();

        let id = cart.add_item(&margherita(), large(vec![]), 1, Some("   ".to_string()))?;

        assert_eq!(cart.item(id).and_then(LineItem::special_instructions), None);

        Ok(())
    }

    #[test]
    fn unit_price_is_a_snapshot() -> TestResult {
        let mut cart = Cart::new();
        let mut pizza = margherita();

        let id = cart.add_item(&pizza, large(vec![]), 1, None)?;

        pizza.base_price = Decimal::new(99_99, 2);
        cart.add_item(&pizza, large(vec![]), 1, None)?;

        assert_eq!(cart.item(id).map(LineItem::unit_price), Some(Decimal::new(19_887, 3)));

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut cart = Cart::new();

        let result = cart.add_item(&margherita(), large(vec![]), 0, None);

        assert!(matches!(result, Err(CartError::InvalidQuantity(0))));
        assert!(cart.is_empty());
    }

    #[test]
    fn merge_overflow_is_rejected() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&margherita(), large(vec![]), u32::MAX, None)?;
        let result = cart.add_item(&margherita(), large(vec![]), 1, None);

        assert!(matches!(result, Err(CartError::InvalidQuantity(_))));
        assert_eq!(cart.item_count(), u64::from(u32::MAX));

        Ok(())
    }

    #[test]
    fn update_quantity_sets_quantity() -> TestResult {
        let mut cart = Cart::new();
        let id = cart.add_item(&margherita(), large(vec![]), 1, None)?;

        cart.update_quantity(id, 4)?;

        assert_eq!(cart.item_count(), 4);

        Ok(())
    }

    #[test]
    fn update_quantity_rejects_zero() -> TestResult {
        let mut cart = Cart::new();
        let id = cart.add_item(&margherita(), large(vec![]), 3, None)?;

        assert!(matches!(
            cart.update_quantity(id, 0),
            Err(CartError::InvalidQuantity(0))
        ));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_id_is_noop() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&margherita(), large(vec![]), 1, None)?;
        let before = cart.clone();

        cart.update_quantity(LineItemId::new(), 5)?;

        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn remove_twice_is_noop_second_time() -> TestResult {
        let mut cart = Cart::new();
        let id = cart.add_item(&margherita(), large(vec![]), 1, None)?;
        cart.add_item(&margherita(), PizzaConfiguration::default(), 1, None)?;

        assert!(cart.remove_item(id).is_some());
        let after_first = cart.clone();

        assert!(cart.remove_item(id).is_none());
        assert_eq!(cart, after_first);

        Ok(())
    }

    #[test]
    fn remove_preserves_order_of_other_lines() -> TestResult {
        let mut cart = Cart::new();
        let a = cart.add_item(&margherita(), PizzaConfiguration::default(), 1, None)?;
        let b = cart.add_item(&margherita(), large(vec![]), 1, None)?;
        let c = cart.add_item(&margherita(), large(vec![topping("t1", 1_50)]), 1, None)?;

        cart.remove_item(b);

        let ids: Vec<LineItemId> = cart.items().iter().map(LineItem::id).collect();
        assert_eq!(ids, [a, c]);

        Ok(())
    }

    #[test]
    fn add_then_remove_restores_subtotal() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&margherita(), PizzaConfiguration::default(), 2, None)?;
        let before = cart.subtotal();

        let id = cart.add_item(&margherita(), large(vec![topping("t3", 2_00)]), 3, None)?;
        cart.remove_item(id);

        assert_eq!(cart.subtotal(), before);

        Ok(())
    }

    #[test]
    fn subtotal_and_item_count() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&margherita(), PizzaConfiguration::default(), 2, None)?;
        cart.add_item(&margherita(), large(vec![]), 1, None)?;

        // 2 * 12.99 + (12.99 * 1.3 + 3.00)
        assert_eq!(cart.subtotal(), Decimal::new(45_867, 3));
        assert_eq!(cart.item_count(), 3);

        cart.clear();

        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[test]
    fn json_round_trip_preserves_cart() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&margherita(), large(vec![topping("t1", 1_50)]), 2, Some("cut in squares".to_string()))?;

        let restored = Cart::from_json(&cart.to_json()?)?;

        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn loading_duplicate_configurations_is_rejected() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&margherita(), large(vec![]), 1, None)?;

        let mut duplicate = cart.items().to_vec();
        let mut copy = duplicate.first().cloned().ok_or("missing item")?;
        copy.id = LineItemId::new();
        duplicate.push(copy);

        assert!(matches!(Cart::with_items(duplicate), Err(CartError::Corrupt(_))));

        Ok(())
    }

    #[test]
    fn loading_zero_quantity_is_rejected() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item(&margherita(), large(vec![]), 1, None)?;

        let json = cart.to_json()?.replace("\"quantity\": 1", "\"quantity\": 0");

        assert!(matches!(Cart::from_json(&json), Err(CartError::Corrupt(_))));

        Ok(())
    }
}
