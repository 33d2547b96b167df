use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use jiff::Timestamp;

use pizzeria::{
    orders::{CheckoutRequest, CustomerDetails, DeliveryTime, PaymentMethod, checkout},
    pricing::OrderType,
    receipt::Receipt,
};

use crate::cli::session::Session;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer email
    #[arg(long)]
    email: String,

    /// Customer phone number
    #[arg(long)]
    phone: String,

    /// Delivery address (required for delivery)
    #[arg(long)]
    address: Option<String>,

    /// Notes for the driver
    #[arg(long)]
    instructions: Option<String>,

    /// delivery or pickup
    #[arg(long, default_value = "delivery")]
    order_type: OrderType,

    /// card, cash or digital
    #[arg(long, default_value = "card")]
    payment: PaymentMethod,

    /// asap or scheduled
    #[arg(long, default_value = "asap")]
    delivery_time: DeliveryTime,

    /// Promo code to apply
    #[arg(long)]
    promo: Option<String>,
}

impl From<CheckoutArgs> for CheckoutRequest {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            customer: CustomerDetails {
                name: args.name,
                email: args.email,
                phone: args.phone,
                delivery_address: args.address,
                delivery_instructions: args.instructions,
            },
            order_type: args.order_type,
            payment_method: args.payment,
            delivery_time: args.delivery_time,
            promo_code: args.promo,
        }
    }
}

pub(crate) fn run(args: CheckoutArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let mut cart = session.load_cart()?;
    let mut promo_source = session.promo_source()?;
    let mut order_book = session.load_orders()?;

    let confirmation = checkout(
        &cart,
        args.into(),
        &mut promo_source,
        &mut order_book,
        Timestamp::now(),
        &session.pricing,
    )
    .context("checkout failed")?;

    session.save_orders(&order_book)?;
    session.save_promo_usage(&promo_source)?;

    let receipt = Receipt::new(&cart, &confirmation.totals, confirmation.promo.as_ref())?;

    cart.clear();
    session.save_cart(&cart)?;

    writeln!(out, "Order {} placed", confirmation.order_number)?;
    writeln!(out, "Order id: {}", confirmation.order_id)?;
    writeln!(out, "Estimated time: {}", confirmation.estimated_time)?;

    receipt.write_to(out)?;

    Ok(())
}
