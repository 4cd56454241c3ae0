//! Marketstand CLI - admin and shopper shells over the store client.
//!
//! # Usage
//!
//! ```bash
//! # Sign in as the store admin
//! mkt admin login -u admin@example.com -p hunter2
//!
//! # List one page of the admin catalog
//! mkt admin products --page 2
//!
//! # Create a product
//! mkt admin new --title "Oak chair" --category furniture --unit piece \
//!     --origin-price 500 --price 300 --enabled true
//!
//! # Browse as a shopper and order
//! mkt shop products
//! mkt shop cart add <product-id> --qty 2
//! mkt shop checkout --name "..." --email "..." --tel "..." --address "..."
//! ```
//!
//! # Commands
//!
//! - `admin` - Session and catalog management (requires a signed-in session)
//! - `shop` - Shopper-side browsing, cart, and checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::admin::ProductFields;

#[derive(Parser)]
#[command(name = "mkt")]
#[command(author, version, about = "Marketstand store tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the store as its admin
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Browse and order as a shopper
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Sign in and persist the session token
    Login {
        /// Account name (email address)
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Discard the persisted session
    Logout,
    /// List one page of the product catalog
    Products {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Create a product
    New {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Update the given fields of an existing product
    Edit {
        /// Product id
        id: String,

        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// List the shopper-visible products
    Products,
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// Recipient name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Contact phone number
        #[arg(long)]
        tel: String,

        /// Delivery address
        #[arg(long)]
        address: String,

        /// Free-form note to the store
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Empty the cart
    Clear,
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
        Commands::Admin { action } => match action {
            AdminAction::Login { username, password } => {
                commands::admin::login(&username, &password).await?;
            }
            AdminAction::Logout => commands::admin::logout()?,
            AdminAction::Products { page } => commands::admin::products(page).await?,
            AdminAction::New { fields } => commands::admin::create(&fields).await?,
            AdminAction::Edit { id, fields } => commands::admin::edit(&id, &fields).await?,
            AdminAction::Delete { id } => commands::admin::delete(&id).await?,
        },
        Commands::Shop { action } => match action {
            ShopAction::Products => commands::shop::products().await?,
            ShopAction::Cart { action } => match action {
                CartAction::Show => commands::shop::cart_show().await?,
                CartAction::Add { product_id, qty } => {
                    commands::shop::cart_add(&product_id, qty).await?;
                }
                CartAction::Clear => commands::shop::cart_clear().await?,
            },
            ShopAction::Checkout {
                name,
                email,
                tel,
                address,
                message,
            } => {
                commands::shop::checkout(&name, &email, &tel, &address, &message).await?;
            }
        },
    }
    Ok(())
}
