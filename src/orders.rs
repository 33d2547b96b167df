//! Orders
//!
//! Checkout turns a cart and customer details into an [`OrderRequest`] and
//! hands it to an [`OrderSink`]. Promo codes are validated before submission
//! and redeemed only after the sink accepts the order.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, LineItem},
    configuration::PizzaConfiguration,
    ids::TypedUuid,
    pricing::{OrderTotals, OrderType, PricingConfig, PricingError, order_totals},
    promotions::{AppliedPromo, PromoRejection, source::PromoSource, validate},
};

/// Identifier assigned to a submitted order.
pub type OrderId = TypedUuid<SubmittedOrder>;

/// Order numbers cycle through this many values.
const ORDER_NUMBER_SPACE: i64 = 100_000_000;

/// Customer details failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// Name shorter than two characters.
    #[error("name must be at least 2 characters")]
    NameTooShort,

    /// Email not of the form `local@domain.tld`.
    #[error("invalid email address")]
    InvalidEmail,

    /// Phone number with fewer than ten digits.
    #[error("phone number must have at least 10 digits")]
    InvalidPhone,

    /// Delivery order without an address.
    #[error("delivery address is required for delivery orders")]
    MissingAddress,
}

/// The order sink could not accept an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The order was refused.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached.
    #[error("order service unavailable: {0}")]
    Unavailable(String),
}

/// A persisted order book could not be restored.
#[derive(Debug, Error)]
pub enum OrderBookError {
    /// Two stored orders share an order number.
    #[error("duplicate order number: {0}")]
    DuplicateOrderNumber(String),

    /// The order book could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors that stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Customer details are incomplete or malformed.
    #[error("invalid customer details: {0}")]
    InvalidCustomer(#[from] CustomerError),

    /// The promo code was rejected.
    #[error(transparent)]
    Promo(#[from] PromoRejection),

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The order sink refused the order.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// An unrecognised option name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderOptionError {
    /// Not `card`, `cash` or `digital`.
    #[error("unknown payment method: {0}")]
    PaymentMethod(String),

    /// Not `asap` or `scheduled`.
    #[error("unknown delivery time: {0}")]
    DeliveryTime(String),
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card
    #[default]
    Card,

    /// Cash on delivery or collection
    Cash,

    /// Digital wallet
    Digital,
}

impl PaymentMethod {
    /// All payment methods.
    pub const ALL: [PaymentMethod; 3] = [Self::Card, Self::Cash, Self::Digital];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
            Self::Digital => "digital",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = OrderOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OrderOptionError::PaymentMethod(s.to_string()))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// When the customer wants the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryTime {
    /// As soon as possible
    #[default]
    Asap,

    /// At an agreed later time
    Scheduled,
}

impl DeliveryTime {
    /// All delivery times.
    pub const ALL: [DeliveryTime; 2] = [Self::Asap, Self::Scheduled];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Asap => "asap",
            Self::Scheduled => "scheduled",
        }
    }

    /// Estimate shown to the customer.
    #[must_use]
    pub const fn estimated_time(self) -> &'static str {
        match self {
            Self::Asap => "30-45 minutes",
            Self::Scheduled => "Scheduled",
        }
    }
}

impl FromStr for DeliveryTime {
    type Err = OrderOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|time| time.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OrderOptionError::DeliveryTime(s.to_string()))
    }
}

impl fmt::Display for DeliveryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Who is ordering and where it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number, any formatting
    pub phone: String,

    /// Delivery address, required for delivery orders
    pub delivery_address: Option<String>,

    /// Notes for the driver
    pub delivery_instructions: Option<String>,
}

impl CustomerDetails {
    /// Check the details are complete for an order type.
    ///
    /// # Errors
    ///
    /// Returns the first [`CustomerError`] found.
    pub fn validate(&self, order_type: OrderType) -> Result<(), CustomerError> {
        if self.name.trim().chars().count() < 2 {
            return Err(CustomerError::NameTooShort);
        }

        if !is_valid_email(self.email.trim()) {
            return Err(CustomerError::InvalidEmail);
        }

        if self.phone.chars().filter(char::is_ascii_digit).count() < 10 {
            return Err(CustomerError::InvalidPhone);
        }

        if order_type == OrderType::Delivery && self.address().is_none() {
            return Err(CustomerError::MissingAddress);
        }

        Ok(())
    }

    fn address(&self) -> Option<&str> {
        self.delivery_address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty() && !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

/// Everything checkout needs besides the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Customer details
    pub customer: CustomerDetails,

    /// Delivery or pickup
    pub order_type: OrderType,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Requested timing
    pub delivery_time: DeliveryTime,

    /// Promo code as entered, if any
    pub promo_code: Option<String>,
}

/// One line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Catalog pizza id
    pub pizza_id: String,

    /// Pizza name at the time of ordering
    pub pizza_name: String,

    /// Chosen configuration
    pub configuration: PizzaConfiguration,

    /// Quantity
    pub quantity: u32,

    /// Price of one pizza
    pub unit_price: Decimal,

    /// `unit_price * quantity`
    pub line_total: Decimal,

    /// Kitchen notes
    pub special_instructions: Option<String>,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            pizza_id: item.pizza_id().to_string(),
            pizza_name: item.pizza_name().to_string(),
            configuration: item.configuration().clone(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            line_total: item.line_total(),
            special_instructions: item.special_instructions().map(str::to_string),
        }
    }
}

/// Payload handed to the order sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Customer details
    pub customer: CustomerDetails,

    /// Delivery or pickup
    pub order_type: OrderType,

    /// Address for delivery orders
    pub delivery_address: Option<String>,

    /// Ordered pizzas
    pub items: Vec<OrderLine>,

    /// Computed totals
    pub totals: OrderTotals,

    /// Applied promo code
    pub promo_code: Option<String>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Requested timing
    pub delivery_time: DeliveryTime,
}

/// Identifiers the sink assigned to an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOrder {
    /// Order id
    pub order_id: OrderId,

    /// Human-facing order number, e.g. `ORD-12345678`
    pub order_number: String,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Order id
    pub order_id: OrderId,

    /// Order number
    pub order_number: String,

    /// Estimated time shown to the customer
    pub estimated_time: &'static str,

    /// Charged totals
    pub totals: OrderTotals,

    /// Promo code applied to the order
    pub promo: Option<AppliedPromo>,
}

/// Destination for submitted orders.
#[cfg_attr(test, mockall::automock)]
pub trait OrderSink {
    /// Accept an order and assign it an id and order number.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if the order cannot be accepted.
    fn submit(
        &mut self,
        order: &OrderRequest,
        now: Timestamp,
    ) -> Result<SubmittedOrder, SubmissionError>;
}

/// An order accepted by [`InMemoryOrderBook`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOrder {
    /// Order id
    pub order_id: OrderId,

    /// Order number
    pub order_number: String,

    /// Submission time
    pub submitted_at: Timestamp,

    /// Submitted payload
    pub order: OrderRequest,
}

/// Order sink that keeps orders in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderBook {
    orders: Vec<StoredOrder>,
    order_numbers: FxHashSet<String>,
}

impl InMemoryOrderBook {
    /// Create an empty order book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders in submission order.
    pub fn orders(&self) -> &[StoredOrder] {
        &self.orders
    }

    /// Look up an order by its number.
    pub fn find_by_number(&self, order_number: &str) -> Option<&StoredOrder> {
        let order_number = order_number.trim();

        self.orders
            .iter()
            .find(|stored| stored.order_number.eq_ignore_ascii_case(order_number))
    }

    /// Serialize the order book to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`OrderBookError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        Ok(serde_json::to_string_pretty(&self.orders)?)
    }

    /// Restore an order book written by [`InMemoryOrderBook::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`OrderBookError::Json`] for malformed JSON and
    /// [`OrderBookError::DuplicateOrderNumber`] if two orders share a number.
    pub fn from_json(json: &str) -> Result<Self, OrderBookError> {
        let orders: Vec<StoredOrder> = serde_json::from_str(json)?;
        let mut order_numbers = FxHashSet::default();

        for stored in &orders {
            if !order_numbers.insert(stored.order_number.clone()) {
                return Err(OrderBookError::DuplicateOrderNumber(
                    stored.order_number.clone(),
                ));
            }
        }

        Ok(Self {
            orders,
            order_numbers,
        })
    }

    /// Last eight digits of the millisecond timestamp, bumped past numbers already issued.
    fn next_order_number(&self, now: Timestamp) -> String {
        let mut sequence = now.as_millisecond().rem_euclid(ORDER_NUMBER_SPACE);

        loop {
            let candidate = format!("ORD-{sequence:08}");

            if !self.order_numbers.contains(&candidate) {
                return candidate;
            }

            sequence = (sequence + 1) % ORDER_NUMBER_SPACE;
        }
    }
}

impl OrderSink for InMemoryOrderBook {
    fn submit(
        &mut self,
        order: &OrderRequest,
        now: Timestamp,
    ) -> Result<SubmittedOrder, SubmissionError> {
        let order_id = OrderId::new();
        let order_number = self.next_order_number(now);

        self.order_numbers.insert(order_number.clone());
        self.orders.push(StoredOrder {
            order_id,
            order_number: order_number.clone(),
            submitted_at: now,
            order: order.clone(),
        });

        Ok(SubmittedOrder {
            order_id,
            order_number,
        })
    }
}

/// Validate, price and submit a cart.
///
/// The cart is left untouched; callers clear it once checkout succeeds. A
/// promo code is redeemed only after the sink accepts the order, and a failed
/// redemption at that point is logged rather than undoing the order.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, the customer details
/// are invalid, the promo code is rejected, totals cannot be computed, or
/// the sink refuses the order.
pub fn checkout<P, S>(
    cart: &Cart,
    request: CheckoutRequest,
    promo_source: &mut P,
    sink: &mut S,
    now: Timestamp,
    config: &PricingConfig,
) -> Result<OrderConfirmation, CheckoutError>
where
    P: PromoSource + ?Sized,
    S: OrderSink + ?Sized,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    request.customer.validate(request.order_type)?;

    let subtotal = cart.subtotal();

    let promo = match request
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        Some(code) => {
            let record = promo_source.find(code);

            match validate(code, subtotal, record.as_ref(), now) {
                Ok(applied) => Some(applied),
                Err(rejection) => {
                    warn!(code, %rejection, "promo code rejected");

                    return Err(rejection.into());
                }
            }
        }
        None => None,
    };

    let discount = promo.as_ref().map_or(Decimal::ZERO, |applied| applied.discount);
    let totals = order_totals(subtotal, request.order_type, discount, config)?;

    let delivery_address = match request.order_type {
        OrderType::Delivery => request.customer.address().map(str::to_string),
        OrderType::Pickup => None,
    };

    let order = OrderRequest {
        customer: request.customer,
        order_type: request.order_type,
        delivery_address,
        items: cart.items().iter().map(OrderLine::from).collect(),
        totals: totals.clone(),
        promo_code: promo.as_ref().map(|applied| applied.code.clone()),
        payment_method: request.payment_method,
        delivery_time: request.delivery_time,
    };

    let submitted = sink.submit(&order, now)?;

    let redemption = promo
        .as_ref()
        .map(|applied| (applied, promo_source.redeem(&applied.code, now)));

    if let Some((applied, Err(rejection))) = redemption {
        warn!(
            code = %applied.code,
            order_number = %submitted.order_number,
            %rejection,
            "promo code could not be redeemed after submission"
        );
    }

    info!(
        order_number = %submitted.order_number,
        order_type = %order.order_type,
        items = order.items.len(),
        total = %totals.total(),
        "order submitted"
    );

    Ok(OrderConfirmation {
        order_id: submitted.order_id,
        order_number: submitted.order_number,
        estimated_time: request.delivery_time.estimated_time(),
        totals,
        promo,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        catalog::{Pizza, PizzaCategory},
        promotions::{
            DiscountKind, PromoCode, budget::UsageBudget, source::InMemoryPromoSource,
        },
    };

    use super::*;

    fn margherita() -> Pizza {
        Pizza {
            id: "1".to_string(),
            name: "Margherita".to_string(),
            description: String::new(),
            category: PizzaCategory::Classic,
            base_price: Decimal::new(12_99, 2),
            image: String::new(),
            popular: true,
        }
    }

    fn cart_of(quantity: u32) -> Result<Cart, crate::cart::CartError> {
        let mut cart = Cart::new();

        cart.add_item(&margherita(), PizzaConfiguration::default(), quantity, None)?;

        Ok(cart)
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            delivery_address: Some("1 Analytical Way".to_string()),
            delivery_instructions: None,
        }
    }

    fn request(promo_code: Option<&str>) -> CheckoutRequest {
        CheckoutRequest {
            customer: customer(),
            promo_code: promo_code.map(str::to_string),
            ..CheckoutRequest::default()
        }
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-06-15T12:00:00Z".parse()
    }

    fn promo_source(usage: UsageBudget) -> Result<InMemoryPromoSource, jiff::Error> {
        Ok([PromoCode {
            code: "FIVEOFF".to_string(),
            active: true,
            discount: DiscountKind::Fixed {
                amount: Decimal::new(5_00, 2),
            },
            min_order_amount: None,
            valid_from: "2026-01-01T00:00:00Z".parse()?,
            valid_until: "2026-12-31T23:59:59Z".parse()?,
            usage,
        }]
        .into_iter()
        .collect())
    }

    #[test]
    fn customer_validation_rules() {
        let valid = customer();

        assert_eq!(valid.validate(OrderType::Delivery), Ok(()));

        let short_name = CustomerDetails {
            name: " A ".to_string(),
            ..customer()
        };
        assert_eq!(
            short_name.validate(OrderType::Delivery),
            Err(CustomerError::NameTooShort)
        );

        for email in ["ada", "ada@example", "@example.com", "ada@.com", "a b@example.com"] {
            let details = CustomerDetails {
                email: email.to_string(),
                ..customer()
            };

            assert_eq!(
                details.validate(OrderType::Delivery),
                Err(CustomerError::InvalidEmail),
                "{email}"
            );
        }

        let short_phone = CustomerDetails {
            phone: "555-1234".to_string(),
            ..customer()
        };
        assert_eq!(
            short_phone.validate(OrderType::Delivery),
            Err(CustomerError::InvalidPhone)
        );
    }

    #[test]
    fn address_is_required_only_for_delivery() {
        let no_address = CustomerDetails {
            delivery_address: Some("   ".to_string()),
            ..customer()
        };

        assert_eq!(
            no_address.validate(OrderType::Delivery),
            Err(CustomerError::MissingAddress)
        );
        assert_eq!(no_address.validate(OrderType::Pickup), Ok(()));
    }

    #[test]
    fn option_names_parse_case_insensitively() -> TestResult {
        assert_eq!("Digital".parse::<PaymentMethod>()?, PaymentMethod::Digital);
        assert_eq!("SCHEDULED".parse::<DeliveryTime>()?, DeliveryTime::Scheduled);
        assert_eq!(
            "cheque".parse::<PaymentMethod>(),
            Err(OrderOptionError::PaymentMethod("cheque".to_string()))
        );
        assert_eq!(DeliveryTime::Asap.estimated_time(), "30-45 minutes");

        Ok(())
    }

    #[test]
    fn checkout_submits_priced_order() -> TestResult {
        let cart = cart_of(2)?;
        let mut promos = promo_source(UsageBudget::unlimited())?;
        let mut sink = MockOrderSink::new();

        sink.expect_submit()
            .once()
            .withf(|order, _| {
                order.items.len() == 1
                    && order.items.iter().all(|line| line.quantity == 2)
                    && order.delivery_address.as_deref() == Some("1 Analytical Way")
                    && order.promo_code.is_none()
            })
            .return_once(|_, _| {
                Ok(SubmittedOrder {
                    order_id: OrderId::new(),
                    order_number: "ORD-00000001".to_string(),
                })
            });

        let confirmation = checkout(
            &cart,
            request(None),
            &mut promos,
            &mut sink,
            now()?,
            &PricingConfig::default(),
        )?;

        // 25.98 subtotal, 2.08 tax, 4.99 delivery
        assert_eq!(confirmation.order_number, "ORD-00000001");
        assert_eq!(confirmation.estimated_time, "30-45 minutes");
        assert_eq!(confirmation.totals.total(), Money::from_minor(33_05, USD));
        assert!(confirmation.promo.is_none());

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected_before_submission() -> TestResult {
        let mut promos = InMemoryPromoSource::new();
        let mut sink = MockOrderSink::new();

        sink.expect_submit().never();

        let result = checkout(
            &Cart::new(),
            request(None),
            &mut promos,
            &mut sink,
            now()?,
            &PricingConfig::default(),
        );

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn rejected_promo_fails_checkout() -> TestResult {
        let cart = cart_of(1)?;
        let mut promos = promo_source(UsageBudget::unlimited())?;
        let mut sink = MockOrderSink::new();

        sink.expect_submit().never();

        let result = checkout(
            &cart,
            request(Some("BOGUS")),
            &mut promos,
            &mut sink,
            now()?,
            &PricingConfig::default(),
        );

        assert!(matches!(
            result,
            Err(CheckoutError::Promo(PromoRejection::NotFound))
        ));

        Ok(())
    }

    #[test]
    fn promo_is_redeemed_after_submission() -> TestResult {
        let cart = cart_of(1)?;
        let mut promos = promo_source(UsageBudget::with_limit(1, 0))?;
        let mut book = InMemoryOrderBook::new();

        let confirmation = checkout(
            &cart,
            request(Some("fiveoff")),
            &mut promos,
            &mut book,
            now()?,
            &PricingConfig::default(),
        )?;

        assert_eq!(confirmation.totals.discount(), Money::from_minor(5_00, USD));
        assert_eq!(
            promos.find("FIVEOFF").map(|record| record.usage.count),
            Some(1)
        );

        let second = checkout(
            &cart,
            request(Some("FIVEOFF")),
            &mut promos,
            &mut book,
            now()?,
            &PricingConfig::default(),
        );

        assert!(matches!(
            second,
            Err(CheckoutError::Promo(PromoRejection::UsageLimitReached))
        ));
        assert_eq!(book.orders().len(), 1);

        Ok(())
    }

    #[test]
    fn failed_submission_does_not_redeem_promo() -> TestResult {
        let cart = cart_of(1)?;
        let mut promos = promo_source(UsageBudget::with_limit(5, 0))?;
        let mut sink = MockOrderSink::new();

        sink.expect_submit()
            .once()
            .return_once(|_, _| Err(SubmissionError::Unavailable("timeout".to_string())));

        let result = checkout(
            &cart,
            request(Some("FIVEOFF")),
            &mut promos,
            &mut sink,
            now()?,
            &PricingConfig::default(),
        );

        assert!(matches!(result, Err(CheckoutError::Submission(_))));
        assert_eq!(
            promos.find("FIVEOFF").map(|record| record.usage.count),
            Some(0)
        );

        Ok(())
    }

    #[test]
    fn pickup_orders_drop_the_address() -> TestResult {
        let cart = cart_of(1)?;
        let mut promos = InMemoryPromoSource::new();
        let mut book = InMemoryOrderBook::new();

        let confirmation = checkout(
            &cart,
            CheckoutRequest {
                order_type: OrderType::Pickup,
                delivery_time: DeliveryTime::Scheduled,
                ..request(None)
            },
            &mut promos,
            &mut book,
            now()?,
            &PricingConfig::default(),
        )?;

        let stored = book
            .find_by_number(&confirmation.order_number)
            .ok_or("order not stored")?;

        assert_eq!(stored.order.delivery_address, None);
        assert_eq!(confirmation.estimated_time, "Scheduled");
        assert_eq!(confirmation.totals.delivery_fee(), Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn order_numbers_use_last_eight_timestamp_digits() -> TestResult {
        let mut book = InMemoryOrderBook::new();
        let at = Timestamp::from_millisecond(1_781_234_567_890)?;
        let order = OrderRequest {
            customer: customer(),
            order_type: OrderType::Pickup,
            delivery_address: None,
            items: Vec::new(),
            totals: order_totals(Decimal::ONE, OrderType::Pickup, Decimal::ZERO, &PricingConfig::default())?,
            promo_code: None,
            payment_method: PaymentMethod::Cash,
            delivery_time: DeliveryTime::Asap,
        };

        let first = book.submit(&order, at)?;
        let second = book.submit(&order, at)?;

        assert_eq!(first.order_number, "ORD-34567890");
        assert_eq!(second.order_number, "ORD-34567891");
        assert_ne!(first.order_id, second.order_id);

        Ok(())
    }

    #[test]
    fn order_book_survives_a_json_round_trip() -> TestResult {
        let cart = cart_of(2)?;
        let mut promos = promo_source(UsageBudget::unlimited())?;
        let mut book = InMemoryOrderBook::new();

        let confirmation = checkout(
            &cart,
            request(Some("fiveoff")),
            &mut promos,
            &mut book,
            now()?,
            &PricingConfig::default(),
        )?;

        let mut restored = InMemoryOrderBook::from_json(&book.to_json()?)?;

        assert_eq!(restored.orders(), book.orders());

        let stored = restored
            .find_by_number(&confirmation.order_number.to_lowercase())
            .ok_or("restored order not found")?;

        assert_eq!(stored.submitted_at, now()?);
        assert_eq!(stored.order.totals, confirmation.totals);
        assert_eq!(stored.order.promo_code.as_deref(), Some("FIVEOFF"));

        let order = stored.order.clone();
        let next = restored.submit(&order, now()?)?;

        assert_ne!(next.order_number, confirmation.order_number);

        Ok(())
    }

    #[test]
    fn order_book_with_repeated_numbers_is_rejected() -> TestResult {
        let cart = cart_of(1)?;
        let mut promos = InMemoryPromoSource::new();
        let mut book = InMemoryOrderBook::new();

        checkout(
            &cart,
            request(None),
            &mut promos,
            &mut book,
            now()?,
            &PricingConfig::default(),
        )?;

        let stored = book.orders().first().cloned().ok_or("order missing")?;
        let json = serde_json::to_string(&[stored.clone(), stored])?;

        assert!(matches!(
            InMemoryOrderBook::from_json(&json),
            Err(OrderBookError::DuplicateOrderNumber(_))
        ));
        assert!(matches!(
            InMemoryOrderBook::from_json("[{"),
            Err(OrderBookError::Json(_))
        ));

        Ok(())
    }
}
