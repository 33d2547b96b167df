use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pizzeria::config::{LoggingConfig, PricingArgs, StorageConfig};

use crate::cli::session::Session;

mod cart;
mod checkout;
pub(crate) mod logging;
mod menu;
mod orders;
mod session;

#[derive(Debug, Parser)]
#[command(name = "pizzeria", about = "Pizza storefront", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    pricing: PricingArgs,

    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show pizzas and toppings
    Menu(menu::MenuArgs),

    /// Manage the cart
    Cart(cart::CartCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// Look up placed orders
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) fn run(self) -> Result<()> {
        let session = Session::new(&self.pricing, self.storage)?;
        let mut out = io::stdout().lock();

        match self.command {
            Commands::Menu(args) => menu::run(&args, &session, &mut out),
            Commands::Cart(command) => cart::run(command, &session, &mut out),
            Commands::Checkout(args) => checkout::run(args, &session, &mut out),
            Commands::Orders(command) => orders::run(command, &session, &mut out),
        }
    }
}
