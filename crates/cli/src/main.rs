//! Genset Spares CLI - browse catalogs, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # List catalogs and browse one
//! gs-cli catalog list
//! gs-cli catalog show avr
//!
//! # Add two AVR (UEI-01) units and review the cart
//! gs-cli cart add avr/1 -q 2
//! gs-cli cart show
//!
//! # Preview and place the order
//! gs-cli checkout summary
//! gs-cli checkout place
//! ```
//!
//! Products are addressed as `catalog/id`. Entries saved before products
//! carried a catalog are addressed by their bare id.
//!
//! Configuration comes from `GS_*` environment variables (see
//! `genset_spares_storefront::config`). Logs go to stderr; filter them with
//! `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use genset_spares_core::ProductKey;
use genset_spares_storefront::config::{LogFormat, StorefrontConfig};
use genset_spares_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gs-cli")]
#[command(author, version, about = "Genset Spares storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse product catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Review and place the order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all catalogs
    List,
    /// Show a catalog's products
    Show {
        /// Catalog slug (e.g. `avr`)
        slug: String,
    },
    /// Show one product in detail
    Product {
        /// Product as `catalog/id`
        product: ProductKey,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,
    /// Print the total number of units in the cart
    Count,
    /// Add a product from a catalog
    Add {
        /// Product as `catalog/id`
        product: ProductKey,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart entry
    Set {
        /// Product as `catalog/id`
        product: ProductKey,

        /// New quantity; 0 removes the entry unless the floor policy is set
        quantity: u32,
    },
    /// Raise a cart entry's quantity by one
    Inc {
        /// Product as `catalog/id`
        product: ProductKey,
    },
    /// Lower a cart entry's quantity by one
    Dec {
        /// Product as `catalog/id`
        product: ProductKey,
    },
    /// Remove a cart entry
    Remove {
        /// Product as `catalog/id`
        product: ProductKey,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show the order summary without placing the order
    Summary {
        /// JSON cart snapshot to check out instead of the saved cart
        #[arg(long)]
        handoff: Option<PathBuf>,
    },
    /// Number the order, print its message and contact link, clear the cart
    Place {
        /// JSON cart snapshot to check out instead of the saved cart
        #[arg(long)]
        handoff: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();
    init_tracing(config.as_ref().map_or(LogFormat::Pretty, |c| c.log_format));

    let result = config
        .map_err(Into::into)
        .and_then(|config| run(cli, config));

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so command output
/// on stdout stays clean.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "genset_spares_storefront=info,genset_spares_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&state),
            CatalogAction::Show { slug } => commands::catalog::show(&state, &slug)?,
            CatalogAction::Product { product } => commands::catalog::product(&state, &product)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Count => commands::cart::count(&state),
            CartAction::Add { product, quantity } => {
                commands::cart::add(&state, &product, quantity)?;
            }
            CartAction::Set { product, quantity } => {
                commands::cart::set(&state, &product, quantity);
            }
            CartAction::Inc { product } => commands::cart::increment(&state, &product),
            CartAction::Dec { product } => commands::cart::decrement(&state, &product),
            CartAction::Remove { product } => commands::cart::remove(&state, &product),
            CartAction::Clear => commands::cart::clear(&state),
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Summary { handoff } => {
                commands::checkout::summary(&state, handoff.as_deref())?;
            }
            CheckoutAction::Place { handoff } => {
                commands::checkout::place(&state, handoff.as_deref())?;
            }
        },
    }
    Ok(())
}
