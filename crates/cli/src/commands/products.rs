//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! seamline products list --page 2 --sort -price --price-from 10
//! seamline products show 7
//! ```

use seamline_client::catalog::{
    CatalogClient, CatalogQuery, PageItem, PriceFilter, SortKey, page_items,
};
use seamline_core::{CurrencyCode, Price, ProductId};

use super::{AppContext, CliError};

/// List one page of products.
pub async fn list(
    ctx: &AppContext,
    page: u32,
    price_from: &str,
    price_to: &str,
    sort: Option<&str>,
) -> Result<(), CliError> {
    let query = CatalogQuery {
        page,
        filter: PriceFilter::parse(price_from, price_to)?,
        sort: sort.map_or(Ok(SortKey::default()), str::parse)?,
    };

    let catalog = CatalogClient::new(ctx.api.clone());
    let listing = catalog.listing(&query).await?;

    if listing.products.is_empty() {
        println!("No products on page {}.", listing.page);
        return Ok(());
    }

    for product in &listing.products {
        let price = Price::new(product.price, CurrencyCode::default()).to_string();
        println!("{:>6}  {price:>10}  {}", product.id, product.name);
    }

    println!();
    match listing.total {
        Some(total) => println!("Page {} - {} items, {}", listing.page, total, query.sort.label()),
        None => println!("Page {} - {}", listing.page, query.sort.label()),
    }
    if let Some(total_pages) = listing.total_pages {
        println!("{}", render_pager(listing.page, total_pages));
    }

    Ok(())
}

/// Show one product in detail.
pub async fn show(ctx: &AppContext, id: i64) -> Result<(), CliError> {
    let catalog = CatalogClient::new(ctx.api.clone());
    let product = catalog.product(ProductId::new(id)).await?;

    println!("{} (#{})", product.name, product.id);
    if let Some(brand) = &product.brand {
        println!("Brand: {}", brand.name);
    }
    println!("Price: {}", Price::new(product.price, CurrencyCode::default()));
    if let Some(year) = &product.release_year {
        println!("Released: {year}");
    }
    if !product.available_colors.is_empty() {
        println!("Colors: {}", product.available_colors.join(", "));
    }
    if !product.available_sizes.is_empty() {
        println!("Sizes: {}", product.available_sizes.join(", "));
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }

    Ok(())
}

/// Render the windowed pager, e.g. `1 ... 4 [5] 6 ... 10`.
fn render_pager(current: u32, total: u32) -> String {
    page_items(current, total)
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == current => format!("[{page}]"),
            PageItem::Page(page) => page.to_string(),
            PageItem::Gap => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pager_marks_current_page() {
        assert_eq!(render_pager(5, 10), "1 ... 4 [5] 6 ... 10");
        assert_eq!(render_pager(1, 3), "[1] 2 3");
    }
}
