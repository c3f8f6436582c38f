#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{attrs, combinations, gift_card, quote};
use crate::models::args::{AppCommands, Cli};

use anyhow::{Context, Result};
use clap::Parser;
use storefront::StorefrontSettings;
use storefront::kernel::config::load_settings;
use storefront_logger::Logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings: StorefrontSettings =
        load_settings(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_settings(env!("CARGO_BIN_NAME"), &settings.logging)?;

    match cli.command {
        AppCommands::Attrs { action } => attrs::handle(action)?,
        AppCommands::GiftCard { action } => gift_card::handle(action)?,
        AppCommands::Combinations { catalog, product, limit, find } => {
            combinations::handle(&settings, &catalog, product, limit, find)?;
        },
        AppCommands::Quote(args) => quote::handle(&settings, args)?,
    }

    Ok(())
}
