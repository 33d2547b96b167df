use std::io::Write;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use jiff::Timestamp;
use rust_decimal::Decimal;

use pizzeria::{
    cart::LineItem,
    configuration::{Cheese, Crust, Sauce, Size},
    pricing::{OrderType, order_totals, to_money},
    promotions::{source::PromoSource, validate},
    receipt::Receipt,
};

use crate::cli::session::{Session, line_at};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a configured pizza
    Add(AddArgs),

    /// Change the quantity of an item
    Update(UpdateArgs),

    /// Remove an item
    Remove(RemoveArgs),

    /// Empty the cart
    Clear,

    /// Show the cart with totals
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Pizza id from the menu
    pizza_id: String,

    /// Size (small, medium, large, xl)
    #[arg(long, default_value = "medium")]
    size: Size,

    /// Crust (thin, regular, thick, stuffed)
    #[arg(long, default_value = "regular")]
    crust: Crust,

    /// Sauce (tomato, bbq, white, pesto)
    #[arg(long, default_value = "tomato")]
    sauce: Sauce,

    /// Cheese (regular, extra, light, none)
    #[arg(long, default_value = "regular")]
    cheese: Cheese,

    /// Topping ids, repeated or comma separated
    #[arg(long = "topping", value_delimiter = ',')]
    toppings: Vec<String>,

    /// Number of pizzas
    #[arg(long, short = 'q', default_value_t = 1)]
    quantity: u32,

    /// Instructions for the kitchen
    #[arg(long)]
    note: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// 1-based item position as shown by `cart show`
    position: usize,

    /// New quantity
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// 1-based item position as shown by `cart show`
    position: usize,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Price for delivery or pickup
    #[arg(long, default_value = "delivery")]
    order_type: OrderType,

    /// Preview a promo code without redeeming it
    #[arg(long)]
    promo: Option<String>,
}

pub(crate) fn run(command: CartCommand, session: &Session, out: &mut impl Write) -> Result<()> {
    match command.command {
        CartSubcommand::Add(args) => add(args, session, out),
        CartSubcommand::Update(args) => update(&args, session, out),
        CartSubcommand::Remove(args) => remove(&args, session, out),
        CartSubcommand::Clear => clear(session, out),
        CartSubcommand::Show(args) => show(&args, session, out),
    }
}

fn add(args: AddArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let catalog = session.catalog()?;
    let mut cart = session.load_cart()?;

    let pizza = catalog
        .pizza(&args.pizza_id)
        .ok_or_else(|| anyhow!("no pizza with id {}", args.pizza_id))?;

    let configuration =
        catalog.configure(args.size, args.crust, args.sauce, args.cheese, &args.toppings)?;
    let summary = configuration.summary();

    let id = cart.add_item(pizza, configuration, args.quantity, args.note)?;
    session.save_cart(&cart)?;

    let unit_price = cart
        .item(id)
        .map_or(Decimal::ZERO, LineItem::unit_price);

    writeln!(
        out,
        "Added {} x {} ({summary}) at {} each",
        args.quantity,
        pizza.name,
        to_money(unit_price, session.pricing.currency)?
    )?;

    Ok(())
}

fn update(args: &UpdateArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let mut cart = session.load_cart()?;

    cart.update_quantity(line_at(&cart, args.position)?, args.quantity)?;
    session.save_cart(&cart)?;

    writeln!(out, "Item {} now has quantity {}", args.position, args.quantity)?;

    Ok(())
}

fn remove(args: &RemoveArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let mut cart = session.load_cart()?;

    if let Some(item) = cart.remove_item(line_at(&cart, args.position)?) {
        writeln!(out, "Removed {}", item.pizza_name())?;
    }

    session.save_cart(&cart)?;

    Ok(())
}

fn clear(session: &Session, out: &mut impl Write) -> Result<()> {
    let mut cart = session.load_cart()?;

    cart.clear();
    session.save_cart(&cart)?;

    writeln!(out, "Cart cleared")?;

    Ok(())
}

fn show(args: &ShowArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let cart = session.load_cart()?;

    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;

        return Ok(());
    }

    let subtotal = cart.subtotal();

    let promo = match args.promo.as_deref() {
        Some(code) => {
            let source = session.promo_source()?;

            match validate(code, subtotal, source.find(code).as_ref(), Timestamp::now()) {
                Ok(applied) => Some(applied),
                Err(rejection) => {
                    writeln!(out, "Promo code not applied: {rejection}")?;

                    None
                }
            }
        }
        None => None,
    };

    let discount = promo.as_ref().map_or(Decimal::ZERO, |applied| applied.discount);
    let totals = order_totals(subtotal, args.order_type, discount, &session.pricing)?;

    writeln!(out, "{} item(s), {} pizza(s)", cart.len(), cart.item_count())?;

    Receipt::new(&cart, &totals, promo.as_ref())?.write_to(out)?;

    Ok(())
}
