use std::io::Write;

use anyhow::Result;
use clap::Args;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use pizzeria::{
    catalog::{Catalog, Pizza, PizzaCategory, ToppingCategory},
    pricing::{PricingConfig, to_money},
};

use crate::cli::session::Session;

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Only show popular pizzas
    #[arg(long)]
    popular: bool,

    /// Hide the toppings list
    #[arg(long)]
    no_toppings: bool,
}

pub(crate) fn run(args: &MenuArgs, session: &Session, out: &mut impl Write) -> Result<()> {
    let catalog = session.catalog()?;

    if args.popular {
        let pizzas: Vec<&Pizza> = catalog.popular().collect();

        write_pizzas(out, "Popular", &pizzas, &session.pricing)?;
    } else {
        for category in PizzaCategory::ALL {
            let pizzas: Vec<&Pizza> = catalog.pizzas_in(category).collect();

            if !pizzas.is_empty() {
                write_pizzas(out, category.to_str(), &pizzas, &session.pricing)?;
            }
        }
    }

    if !args.no_toppings {
        write_toppings(out, &catalog, &session.pricing)?;
    }

    Ok(())
}

fn write_pizzas(
    out: &mut impl Write,
    heading: &str,
    pizzas: &[&Pizza],
    pricing: &PricingConfig,
) -> Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Pizza", "Description", "From"]);

    for pizza in pizzas {
        builder.push_record([
            pizza.id.clone(),
            pizza.name.clone(),
            pizza.description.clone(),
            to_money(pizza.base_price, pricing.currency)?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::last(), Alignment::right());

    writeln!(out, "\n{}\n{table}", heading.to_uppercase())?;

    Ok(())
}

fn write_toppings(out: &mut impl Write, catalog: &Catalog, pricing: &PricingConfig) -> Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Topping", "Category", "Price"]);

    for category in ToppingCategory::ALL {
        for topping in catalog.toppings_in(category) {
            builder.push_record([
                topping.id.clone(),
                topping.name.clone(),
                category.to_str().to_string(),
                to_money(topping.price, pricing.currency)?.to_string(),
            ]);
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::last(), Alignment::right());

    writeln!(out, "\nTOPPINGS\n{table}")?;

    Ok(())
}
