//! Pizzeria storefront CLI

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

mod cli;

/// Pizzeria entry point
///
/// # Errors
///
/// Returns an error if logging cannot be initialised or the command fails.
pub fn main() -> Result<()> {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    cli::logging::init(&cli.logging)?;

    cli.run()
}
