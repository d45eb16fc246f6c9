//! Seamline storefront client library.
//!
//! # Architecture
//!
//! - [`api`] - typed REST client for the commerce API (products, cart,
//!   auth, checkout); the API is the source of truth after every mutation
//! - [`cart`] - the cart reconciliation service: optimistic local updates
//!   followed by an authoritative server refresh
//! - [`catalog`] - product browsing helpers (filters, sort, pagination)
//!   with in-memory caching via `moka` (5 minute TTL)
//! - [`session`] - bearer-token session over the persisted scope
//! - [`store`] - the persisted key-value scope that mirrors local state
//!
//! # Example
//!
//! ```rust,ignore
//! use seamline_client::api::{ApiClient, cart::HttpCartGateway};
//! use seamline_client::cart::{AddToCart, CartService};
//!
//! let api = ApiClient::new(&config, session.clone())?;
//! let mut cart = CartService::new(HttpCartGateway::new(api), session, scope);
//!
//! cart.add(product_id, AddToCart::quantity(2).color("Red").size("M")).await?;
//! println!("{} items", cart.total_quantity());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod session;
pub mod store;
