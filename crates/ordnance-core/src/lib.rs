//! Core types and trait definitions for the Ordnance weapon-stats service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The sheet reader, the SQLite store and the ingestion pipeline all depend on
//! it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod sources;
pub mod store;
pub mod upstream;
pub mod version;
pub mod weapon;

pub use error::{Error, Result};
