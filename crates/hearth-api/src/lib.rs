//! JSON REST API for Hearth.
//!
//! Exposes an axum [`Router`] backed by any [`hearth_core::store::FamilyStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", hearth_api::api_router(store.clone()))
//! ```

pub mod consolidate;
pub mod error;
pub mod families;
pub mod people;
pub mod relationships;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use hearth_core::store::FamilyStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FamilyStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route("/people/{id}", get(people::get_one::<S>).patch(people::update::<S>))
    // Families
    .route("/families", get(families::list::<S>))
    .route(
      "/families/{id}",
      get(families::get_one::<S>).patch(families::update::<S>),
    )
    // Relationships
    .route(
      "/relationships",
      get(relationships::list::<S>).post(relationships::create::<S>),
    )
    .route(
      "/relationships/{id}",
      get(relationships::get_one::<S>).delete(relationships::remove::<S>),
    )
    // Consolidation
    .route("/consolidate", post(consolidate::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
