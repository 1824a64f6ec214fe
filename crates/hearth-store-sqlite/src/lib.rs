//! SQLite backend for the Hearth registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every engine invocation runs inside a
//! single `BEGIN IMMEDIATE` transaction on that thread.

mod encode;
mod graph;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
