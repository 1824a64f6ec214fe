//! Handlers for `/families` endpoints.
//!
//! Families are created and deleted only by consolidation; the API can read
//! them and edit their descriptive fields.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use hearth_core::{
  family::{Family, FamilyDetails, FamilyView},
  store::FamilyStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /families`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Family>>, ApiError>
where
  S: FamilyStore,
{
  let families = store.list_families().await.map_err(ApiError::store)?;
  Ok(Json(families))
}

/// `GET /families/{id}` — the family and its members.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<FamilyView>, ApiError>
where
  S: FamilyStore,
{
  let view = store
    .get_family(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("family {id} not found")))?;
  Ok(Json(view))
}

/// `PATCH /families/{id}` — body: `{"surname"?, "display_name"?, "notes"?}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  details: Result<Json<FamilyDetails>, JsonRejection>,
) -> Result<Json<Family>, ApiError>
where
  S: FamilyStore,
{
  let Json(details) = details?;
  let family = store
    .update_family_details(id, details)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(family))
}
