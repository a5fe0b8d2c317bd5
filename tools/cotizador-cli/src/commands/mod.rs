//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod quote;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products, optionally filtered.
    List {
        /// Text to search in name, SKU, and description.
        #[arg(short, long)]
        search: Option<String>,

        /// Category slug.
        #[arg(short, long)]
        category: Option<String>,

        /// Availability: all, inStock, onOrder.
        #[arg(short, long)]
        availability: Option<String>,
    },
    /// Show one product in detail.
    Show {
        /// Product ID.
        id: String,
    },
    /// List categories.
    Categories,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    #[command(subcommand)]
    pub command: QuoteCommand,
}

#[derive(Subcommand)]
pub enum QuoteCommand {
    /// Add a product to the quote.
    Add {
        /// Product ID.
        id: String,

        /// Units to add.
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Remove a product from the quote.
    Remove {
        /// Product ID.
        id: String,
    },
    /// Set a line's quantity.
    Quantity {
        /// Product ID.
        id: String,

        /// New quantity (at least 1).
        quantity: u32,
    },
    /// Set a line's notes.
    Notes {
        /// Product ID.
        id: String,

        /// Notes for the sales team (empty to clear).
        #[arg(default_value = "")]
        text: String,
    },
    /// Set a line's urgency.
    Urgency {
        /// Product ID.
        id: String,

        /// normal or urgent.
        urgency: String,
    },
    /// Show the quote cart.
    Show,
    /// Empty the quote cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Submit the quote request.
    Submit(SubmitArgs),
}

/// Contact and delivery data for a submission. Missing required values are
/// prompted for unless `--no-input` is given.
#[derive(Args)]
pub struct SubmitArgs {
    /// Contact name.
    #[arg(long)]
    pub name: Option<String>,

    /// Company.
    #[arg(long)]
    pub company: Option<String>,

    /// Company tax id (RUT).
    #[arg(long)]
    pub rut: Option<String>,

    /// Contact position.
    #[arg(long)]
    pub position: Option<String>,

    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Delivery address.
    #[arg(long)]
    pub address: Option<String>,

    /// Delivery city.
    #[arg(long)]
    pub city: Option<String>,

    /// Delivery region code (I..XII, RM).
    #[arg(long)]
    pub region: Option<String>,

    /// Date the parts are needed by (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// General observations.
    #[arg(long)]
    pub observations: Option<String>,

    /// Never prompt; fail on missing fields.
    #[arg(long)]
    pub no_input: bool,

    /// Empty the cart after a successful submission.
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
