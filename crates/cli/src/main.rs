//! Seamline CLI - Command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! seamline products list --page 2 --sort -price --price-from 10 --price-to 100
//! seamline products show 7
//!
//! # Sign in and manage the cart
//! seamline auth login -e user@example.com -p secret
//! seamline cart add 7 --quantity 2 --color red --size M
//! seamline cart show
//! seamline cart checkout --name Ada --surname Lovelace \
//!     --email ada@example.com --address "1 Analytical Way" --zip 12345
//! ```
//!
//! # Commands
//!
//! - `auth` - Sign in, register, sign out, show the current user
//! - `products` - Browse and inspect the product catalog
//! - `cart` - Inspect and mutate the shopping cart, place the order
//!
//! # Environment Variables
//!
//! - `SEAMLINE_API_BASE_URL` - Base URL of the commerce API (required)
//! - `SEAMLINE_DATA_DIR` - Directory for the persisted session and cart
//!   mirror (default: `~/.seamline`)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "seamline")]
#[command(author, version, about = "Seamline storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the account session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and mutate the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        username: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Optional avatar image file
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Sign out and clear local state
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products with optional filter and sort
    List {
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Minimum price (non-digits are stripped)
        #[arg(long, default_value = "")]
        price_from: String,

        /// Maximum price (non-digits are stripped)
        #[arg(long, default_value = "")]
        price_to: String,

        /// Sort order: `-created_at` (default), `price`, or `-price`
        #[arg(short, long, allow_hyphen_values = true)]
        sort: Option<String>,
    },
    /// Show one product in detail
    Show {
        /// Product id
        id: i64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        id: i64,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Variant color
        #[arg(long)]
        color: Option<String>,

        /// Variant size
        #[arg(long)]
        size: Option<String>,
    },
    /// Increase a line's quantity by one
    Increment {
        /// Product id
        id: i64,

        /// Variant color
        #[arg(long)]
        color: Option<String>,

        /// Variant size
        #[arg(long)]
        size: Option<String>,
    },
    /// Decrease a line's quantity by one (never below 1)
    Decrement {
        /// Product id
        id: i64,

        /// Variant color
        #[arg(long)]
        color: Option<String>,

        /// Variant size
        #[arg(long)]
        size: Option<String>,
    },
    /// Remove a line from the cart
    Remove {
        /// Product id
        id: i64,

        /// Variant color
        #[arg(long)]
        color: Option<String>,

        /// Variant size
        #[arg(long)]
        size: Option<String>,
    },
    /// Place the order for the current cart
    Checkout {
        /// First name
        #[arg(long)]
        name: String,

        /// Last name
        #[arg(long)]
        surname: String,

        /// Contact email address
        #[arg(long)]
        email: String,

        /// Delivery address
        #[arg(long)]
        address: String,

        /// Postal code
        #[arg(long)]
        zip: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = commands::AppContext::load()?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&ctx, &email, &password).await?;
            }
            AuthAction::Register {
                username,
                email,
                password,
                avatar,
            } => {
                commands::auth::register(&ctx, username, &email, password, avatar).await?;
            }
            AuthAction::Logout => commands::auth::logout(&ctx),
            AuthAction::Whoami => commands::auth::whoami(&ctx),
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                page,
                price_from,
                price_to,
                sort,
            } => {
                commands::products::list(&ctx, page, &price_from, &price_to, sort.as_deref())
                    .await?;
            }
            ProductsAction::Show { id } => commands::products::show(&ctx, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add {
                id,
                quantity,
                color,
                size,
            } => commands::cart::add(&ctx, id, quantity, color, size).await?,
            CartAction::Increment { id, color, size } => {
                commands::cart::step(&ctx, id, color, size, commands::cart::Step::Up).await?;
            }
            CartAction::Decrement { id, color, size } => {
                commands::cart::step(&ctx, id, color, size, commands::cart::Step::Down).await?;
            }
            CartAction::Remove { id, color, size } => {
                commands::cart::remove(&ctx, id, color, size).await?;
            }
            CartAction::Checkout {
                name,
                surname,
                email,
                address,
                zip,
            } => commands::cart::checkout(&ctx, name, surname, &email, address, zip).await?,
        },
    }
    Ok(())
}
