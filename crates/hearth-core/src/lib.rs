//! Core types and the family consolidation engine for the Hearth registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`graph::FamilyGraph`] (synchronous, transaction-scoped)
//! and [`store::FamilyStore`] (async, what the API talks to).

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod consolidate;
pub mod error;
pub mod family;
pub mod graph;
pub mod person;
pub mod relation;
pub mod relationship;
pub mod store;

pub use error::{Error, Result};
