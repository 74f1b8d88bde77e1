//! Go Marketplace CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli cart list
//!
//! # Add one unit of a product
//! gm-cli cart add --id 1 --title "Coffee mug" --image-url https://cdn.example.com/mug.png --price 19.90
//!
//! # Change quantities
//! gm-cli cart increment 1
//! gm-cli cart decrement 1
//!
//! # Show item count and subtotal
//! gm-cli cart total
//! ```
//!
//! # Commands
//!
//! - `cart list` - Print every item with quantity and line total
//! - `cart add` - Add one unit of a product
//! - `cart increment` / `cart decrement` - Change an item's quantity by one
//! - `cart total` - Print item count and subtotal
//!
//! Storage location and key come from `GOMARKETPLACE_DATA_DIR` and
//! `GOMARKETPLACE_STORAGE_KEY` (or a `.env` file), overridable with
//! `--data-dir` and `--key`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use go_marketplace_core::Price;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "Go Marketplace CLI tools")]
struct Cli {
    /// Directory holding persisted records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Key the cart record is stored under
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print every item in the cart
    List,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price (e.g. 19.90)
        #[arg(long)]
        price: Price,
    },
    /// Add one unit of an item already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of an item, dropping it at zero
    Decrement {
        /// Product ID
        id: String,
    },
    /// Print item count and subtotal
    Total,
}

#[tokio::main]
async fn main() {
    // Initialize tracing (stderr keeps stdout for command output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = go_marketplace_cart::CartConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(key) = cli.key {
        config = config.with_storage_key(key)?;
    }

    let store = commands::cart::open(&config).await;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&store),
            CartAction::Add {
                id,
                title,
                image_url,
                price,
            } => commands::cart::add(&store, id, title, image_url, price).await?,
            CartAction::Increment { id } => commands::cart::increment(&store, &id).await?,
            CartAction::Decrement { id } => commands::cart::decrement(&store, &id).await?,
            CartAction::Total => commands::cart::total(&store),
        },
    }
    Ok(())
}
