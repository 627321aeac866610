//! Core types and trait definitions for the ticket triage service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Provider adapters, storage backends and the HTTP router all depend on it
//! and meet each other only through the traits defined here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod classification;
pub mod classifier;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod store;
pub mod ticket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
