use std::io::Write;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use pizzeria::{orders::StoredOrder, pricing::OrderType, receipt::Receipt};

use crate::cli::session::Session;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List placed orders, oldest first
    List,

    /// Show one order and its receipt
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Order number, e.g. ORD-12345678
    order_number: String,
}

pub(crate) fn run(command: OrdersCommand, session: &Session, out: &mut impl Write) -> Result<()> {
    match command.command {
        OrdersSubcommand::List => list(session, out),
        OrdersSubcommand::Show(args) => show(&args, session, out),
    }
}

fn list(session: &Session, out: &mut impl Write) -> Result<()> {
    let order_book = session.load_orders()?;

    if order_book.orders().is_empty() {
        writeln!(out, "No orders placed yet")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Placed", "Customer", "Type", "Items", "Total"]);

    for stored in order_book.orders() {
        let items: u64 = stored.order.items.iter().map(|line| u64::from(line.quantity)).sum();

        builder.push_record([
            stored.order_number.clone(),
            stored.submitted_at.to_string(),
            stored.order.customer.name.clone(),
            stored.order.order_type.to_string(),
            items.to_string(),
            stored.order.totals.total().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(4..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn show(args: &ShowArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let order_book = session.load_orders()?;

    let stored = order_book
        .find_by_number(&args.order_number)
        .ok_or_else(|| anyhow!("no order numbered {}", args.order_number))?;

    write_details(out, stored)?;
    Receipt::for_order(&stored.order)?.write_to(out)?;

    Ok(())
}

fn write_details(out: &mut impl Write, stored: &StoredOrder) -> Result<()> {
    let order = &stored.order;

    writeln!(out, "Order {}", stored.order_number)?;
    writeln!(out, "Order id: {}", stored.order_id)?;
    writeln!(out, "Placed: {}", stored.submitted_at)?;
    writeln!(
        out,
        "Customer: {} <{}>, {}",
        order.customer.name, order.customer.email, order.customer.phone
    )?;

    match (order.order_type, order.delivery_address.as_deref()) {
        (OrderType::Delivery, Some(address)) => writeln!(out, "Delivery to: {address}")?,
        _ => writeln!(out, "Pickup")?,
    }

    writeln!(out, "Payment: {}", order.payment_method)?;
    writeln!(out, "Timing: {}", order.delivery_time)?;

    Ok(())
}
