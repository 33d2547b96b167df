//! Receipt

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    orders::{OrderLine, OrderRequest},
    pricing::{OrderTotals, PricingError, to_money},
    promotions::AppliedPromo,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line amount could not be expressed as money.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One printed line item.
#[derive(Debug, Clone)]
struct ReceiptLine {
    name: String,
    configuration: String,
    quantity: u32,
    unit_price: Money<'static, Currency>,
    line_total: Money<'static, Currency>,
    special_instructions: Option<String>,
}

/// Printable summary of a cart and its totals.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    totals: OrderTotals,
    promo_code: Option<String>,
}

impl Receipt {
    /// Build a receipt for a cart priced with `totals`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Pricing`] if a line amount cannot be expressed as money.
    pub fn new(
        cart: &Cart,
        totals: &OrderTotals,
        promo: Option<&AppliedPromo>,
    ) -> Result<Self, ReceiptError> {
        let lines: Vec<OrderLine> = cart.items().iter().map(OrderLine::from).collect();

        Self::from_lines(&lines, totals, promo.map(|applied| applied.code.clone()))
    }

    /// Build a receipt for an order that has already been placed.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Pricing`] if a line amount cannot be expressed as money.
    pub fn for_order(order: &OrderRequest) -> Result<Self, ReceiptError> {
        Self::from_lines(&order.items, &order.totals, order.promo_code.clone())
    }

    fn from_lines(
        lines: &[OrderLine],
        totals: &OrderTotals,
        promo_code: Option<String>,
    ) -> Result<Self, ReceiptError> {
        let currency = totals.currency();

        let lines = lines
            .iter()
            .map(|line| {
                Ok(ReceiptLine {
                    name: line.pizza_name.clone(),
                    configuration: line.configuration.summary(),
                    quantity: line.quantity,
                    unit_price: to_money(line.unit_price, currency)?,
                    line_total: to_money(line.line_total, currency)?,
                    special_instructions: line.special_instructions.clone(),
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(Self {
            lines,
            totals: totals.clone(),
            promo_code,
        })
    }

    /// Writes the receipt table followed by the totals summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Configuration", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            let configuration = match &line.special_instructions {
                Some(notes) => format!("{}\nNote: {notes}", line.configuration),
                None => line.configuration.clone(),
            };

            builder.push_record([
                line.name.clone(),
                configuration,
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
            ]);
        }

        write_receipt_table(&mut out, builder)?;
        write_receipt_summary(&mut out, self)
    }
}

fn write_receipt_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(out: &mut impl io::Write, receipt: &Receipt) -> Result<(), ReceiptError> {
    let totals = &receipt.totals;

    let discount_label = match &receipt.promo_code {
        Some(code) => format!("Discount ({code}):"),
        None => "Discount:".to_string(),
    };

    let mut rows = vec![
        ("Subtotal:".to_string(), totals.subtotal().to_string()),
        ("Tax:".to_string(), totals.tax().to_string()),
        ("Delivery:".to_string(), totals.delivery_fee().to_string()),
    ];

    if receipt.promo_code.is_some() || !totals.discount().is_zero() {
        rows.push((discount_label, format!("-{}", totals.discount())));
    }

    rows.push(("Total:".to_string(), totals.total().to_string()));

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}
