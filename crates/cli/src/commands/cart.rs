//! Cart and checkout commands.
//!
//! Each command builds a fresh [`CartService`] over the persisted scope,
//! refreshes it against the server, applies the mutation, and prints the
//! resulting cart.
//!
//! # Usage
//!
//! ```bash
//! seamline cart add 7 -q 2 --color red --size M
//! seamline cart decrement 7 --color red --size M
//! seamline cart checkout --name Ada --surname Lovelace \
//!     --email ada@example.com --address "1 Analytical Way" --zip 12345
//! ```

use seamline_client::api::types::{CartLineItem, CheckoutDetails, VariantKey};
use seamline_client::cart::{AddToCart, find_line};
use seamline_core::{CurrencyCode, Email, Price, ProductId};

use super::{AppContext, CliError};

/// Quantity step direction.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Up,
    Down,
}

/// Show the cart contents and totals.
pub async fn show(ctx: &AppContext) -> Result<(), CliError> {
    let mut service = ctx.cart_service();
    service.refresh().await?;
    print_cart(service.items(), &service.totals());
    Ok(())
}

/// Add a product to the cart.
pub async fn add(
    ctx: &AppContext,
    id: i64,
    quantity: u32,
    color: Option<String>,
    size: Option<String>,
) -> Result<(), CliError> {
    let mut service = ctx.cart_service();

    let mut add = AddToCart::quantity(quantity);
    if let Some(color) = color {
        add = add.color(color);
    }
    if let Some(size) = size {
        add = add.size(size);
    }

    service.add(ProductId::new(id), add).await?;
    print_cart(service.items(), &service.totals());
    Ok(())
}

/// Step a line's quantity up or down by one.
pub async fn step(
    ctx: &AppContext,
    id: i64,
    color: Option<String>,
    size: Option<String>,
    direction: Step,
) -> Result<(), CliError> {
    let product_id = ProductId::new(id);
    let variant = VariantKey { color, size };

    let mut service = ctx.cart_service();
    service.refresh().await?;

    let Some(current) = find_line(service.items(), product_id, &variant)
        .and_then(|idx| service.items().get(idx))
        .map(|line| line.quantity)
    else {
        println!("No matching line in the cart.");
        return Ok(());
    };

    match direction {
        Step::Up => service.increment(product_id, current, &variant).await?,
        Step::Down => service.decrement(product_id, current, &variant).await?,
    }

    print_cart(service.items(), &service.totals());
    Ok(())
}

/// Remove a line from the cart.
pub async fn remove(
    ctx: &AppContext,
    id: i64,
    color: Option<String>,
    size: Option<String>,
) -> Result<(), CliError> {
    let variant = VariantKey { color, size };

    let mut service = ctx.cart_service();
    service.remove(ProductId::new(id), &variant).await?;
    print_cart(service.items(), &service.totals());
    Ok(())
}

/// Place the order for the current cart.
pub async fn checkout(
    ctx: &AppContext,
    name: String,
    surname: String,
    email: &str,
    address: String,
    zip_code: String,
) -> Result<(), CliError> {
    let details = CheckoutDetails {
        name,
        surname,
        email: Email::parse(email)?,
        address,
        zip_code,
    };

    let mut service = ctx.cart_service();
    let confirmation = service.checkout(&details).await?;

    match (confirmation.order_id, confirmation.message) {
        (Some(order_id), _) => println!("Order #{order_id} placed."),
        (None, Some(message)) => println!("{message}"),
        (None, None) => println!("Order placed."),
    }
    Ok(())
}

fn print_cart(items: &[CartLineItem], totals: &seamline_client::cart::OrderTotals) {
    if items.is_empty() {
        println!("The cart is empty.");
        return;
    }

    for line in items {
        let variant = match (line.color.as_deref(), line.size.as_deref()) {
            (Some(color), Some(size)) => format!(" ({color}/{size})"),
            (Some(color), None) => format!(" ({color})"),
            (None, Some(size)) => format!(" ({size})"),
            (None, None) => String::new(),
        };
        println!(
            "{:>3} x {}{}  @ {}",
            line.quantity,
            line.display_name,
            variant,
            Price::new(line.unit_price, CurrencyCode::default())
        );
    }

    println!();
    println!("Subtotal: {}", Price::new(totals.subtotal, CurrencyCode::default()));
    println!("Delivery: {}", Price::new(totals.delivery, CurrencyCode::default()));
    println!("Total:    {}", Price::new(totals.total, CurrencyCode::default()));
}
