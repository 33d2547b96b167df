//! Pizzeria prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, LineItem, LineItemId},
    catalog::{Catalog, CatalogError, Pizza, PizzaCategory, Topping, ToppingCategory},
    configuration::{
        Cheese, ConfigurationError, Crust, PizzaConfiguration, Sauce, Size, ToppingSet,
    },
    fixtures::{Fixture, FixtureError},
    orders::{
        CheckoutError, CheckoutRequest, CustomerDetails, CustomerError, DeliveryTime,
        InMemoryOrderBook, OrderBookError, OrderConfirmation, OrderId, OrderLine, OrderRequest,
        OrderSink, PaymentMethod, StoredOrder, SubmissionError, SubmittedOrder, checkout,
    },
    pricing::{OrderTotals, OrderType, PricingConfig, PricingError, order_totals, unit_price},
    promotions::{
        AppliedPromo, DiscountKind, PromoCode, PromoRejection,
        budget::UsageBudget,
        source::{InMemoryPromoSource, PromoSource, UsageCounts},
        validate,
    },
    receipt::{Receipt, ReceiptError},
};
