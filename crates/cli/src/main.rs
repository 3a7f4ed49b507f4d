//! Bazaar CLI - terminal client for the Bazaar marketplace.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! bazaar products list --category Office
//! bazaar products show p-123
//!
//! # Manage the cart (persisted between invocations)
//! bazaar cart add p-123 --quantity 2
//! bazaar cart show
//! bazaar cart set p-123 1
//! bazaar cart remove p-123
//!
//! # Check out
//! bazaar checkout --street "12 Market Way" --city Portland --state OR \
//!     --zip 97201 --country USA --payment credit-card --coupon SAVE10
//!
//! # Track orders
//! bazaar orders list
//! bazaar orders show ord-42
//!
//! # Sign out (clears the persisted cart)
//! bazaar logout
//! ```
//!
//! # Environment Variables
//!
//! - `BAZAAR_API_URL` - Base URL of the marketplace REST API (required)
//! - `BAZAAR_API_TOKEN` - Bearer token for authenticated calls
//! - `BAZAAR_USER_ID` - Authenticated user ID (keys the persisted cart)
//! - `BAZAAR_STORAGE_DIR` - Cart storage directory (default: `.bazaar`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar marketplace terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order from the current cart
    Checkout(commands::checkout::CheckoutArgs),
    /// Track placed orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Sign out and clear the persisted cart
    Logout,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Full-text search query
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one product in detail
    Show {
        /// Product ID
        id: String,
    },
    /// List the product categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with its price breakdown
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        id: String,

        /// Units to add
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Set the quantity for a product (0 removes it)
    Set {
        /// Product ID
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order in detail
    Show {
        /// Order ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                page,
            } => commands::products::list(category, search, page).await?,
            ProductsAction::Show { id } => commands::products::show(&id).await?,
            ProductsAction::Categories => commands::products::categories().await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add { id, quantity } => commands::cart::add(&id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(&id)?,
            CartAction::Set { id, quantity } => commands::cart::set(&id, quantity)?,
            CartAction::Clear => commands::cart::clear()?,
        },
        Commands::Checkout(args) => commands::checkout::run(args).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list().await?,
            OrdersAction::Show { id } => commands::orders::show(&id).await?,
        },
        Commands::Logout => commands::cart::logout()?,
    }
    Ok(())
}
