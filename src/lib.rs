//! Pizzeria
//!
//! Storefront core for a pizza shop: menu catalog, pizza configuration and
//! pricing, a shopping cart, promo code validation and order submission.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod configuration;
pub mod fixtures;
pub mod ids;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod receipt;
