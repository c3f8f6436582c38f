//! # CLI Argument Definitions
//!
//! Subcommands map one to one onto the attribute codec and the shipping-by-total provider.
//! Attribute documents are passed as plain arguments; `-` reads the document from stdin.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storefront::domain::Decimal;
use storefront::domain::shipping::ShipmentItem;

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Product attribute documents and shipping-by-total quotes")]
pub struct Cli {
    /// Settings file (`storefront.toml` in the working directory by default)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Read and edit product attribute documents
    Attrs {
        #[command(subcommand)]
        action: AttrsAction,
    },
    /// Read and edit the gift card section of an attribute document
    GiftCard {
        #[command(subcommand)]
        action: GiftCardAction,
    },
    /// Print every attribute document of a catalog product, one per line
    Combinations {
        /// Catalog snapshot (TOML)
        #[arg(long)]
        catalog: PathBuf,
        /// Product id
        #[arg(short, long)]
        product: i32,
        /// Override of `catalog.max_combinations`
        #[arg(long)]
        limit: Option<usize>,
        /// Print the stored combination matching this document instead
        #[arg(long = "match", value_name = "XML")]
        find: Option<String>,
    },
    /// Quote shipping options for a cart
    Quote(QuoteArgs),
}

#[derive(Debug, Subcommand)]
pub enum AttrsAction {
    /// Print the attribute ids of a document
    Ids {
        /// Attribute document, `-` for stdin
        xml: String,
    },
    /// Print the values selected for one attribute
    Values {
        /// Attribute document, `-` for stdin
        xml: String,
        #[arg(short, long)]
        mapping: i32,
    },
    /// Append a value and print the updated document
    Add {
        /// Attribute document, `-` for stdin; empty starts a new one
        #[arg(default_value = "")]
        xml: String,
        #[arg(short, long)]
        mapping: i32,
        #[arg(short, long)]
        value: String,
    },
    /// Print whether two documents select the same values
    Equal { first: String, second: String },
}

#[derive(Debug, Subcommand)]
pub enum GiftCardAction {
    /// Attach gift card details and print the updated document
    Add {
        /// Attribute document, `-` for stdin; empty starts a new one
        #[arg(default_value = "")]
        xml: String,
        #[arg(long, default_value = "")]
        recipient_name: String,
        #[arg(long, default_value = "")]
        recipient_email: String,
        #[arg(long, default_value = "")]
        sender_name: String,
        #[arg(long, default_value = "")]
        sender_email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Print the gift card details of a document as JSON
    Read {
        /// Attribute document, `-` for stdin
        xml: String,
    },
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Shipping methods and rate records (TOML)
    #[arg(long)]
    pub rates: PathBuf,
    /// Cart line as `PRICE` or `PRICExQUANTITY`, repeatable
    #[arg(short, long = "item", value_name = "LINE", value_parser = parse_item)]
    pub items: Vec<ShipmentItem>,
    #[arg(long)]
    pub country: Option<i32>,
    #[arg(long)]
    pub state: Option<i32>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub store: i32,
    /// Quote without a shipping address
    #[arg(long, conflicts_with_all = ["country", "state", "zip"])]
    pub no_address: bool,
}

/// Parses `19.99` or `19.99x3` into a shippable cart line.
fn parse_item(raw: &str) -> Result<ShipmentItem, String> {
    let (price, quantity) = raw.split_once(['x', 'X']).unwrap_or((raw, "1"));
    let unit_price: Decimal = price.trim().parse().map_err(|e| format!("invalid price '{price}': {e}"))?;
    let quantity: u32 = quantity.trim().parse().map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    Ok(ShipmentItem { quantity, unit_price, is_ship_enabled: true, ..ShipmentItem::default() })
}
