//! Seamline Core - Shared types library.
//!
//! This crate provides common types used across all Seamline components:
//! - `client` - Storefront client library (catalog, cart, auth)
//! - `cli` - Command-line storefront frontend
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails,
//!   plus lenient serde helpers for tolerant wire decoding

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
