//! Handler for `POST /consolidate` — batch re-consolidation.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use hearth_core::{consolidate::ReconsolidationReport, store::FamilyStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ConsolidateBody {
  /// Restrict the run to one family; omit for the whole registry.
  pub family_id: Option<Uuid>,
  /// Must be `true`; guards against accidental full runs.
  #[serde(default)]
  pub confirm:   bool,
}

/// `POST /consolidate` — body: `{"family_id"?: "...", "confirm": true}`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<ConsolidateBody>, JsonRejection>,
) -> Result<Json<ReconsolidationReport>, ApiError>
where
  S: FamilyStore,
{
  let Json(body) = body?;
  if !body.confirm {
    return Err(ApiError::BadRequest(
      "set \"confirm\": true to run consolidation".into(),
    ));
  }
  let report = store
    .reconsolidate(body.family_id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    scope = ?body.family_id,
    created = report.relationships_created,
    updated = report.relationships_updated,
    consolidated = report.families_consolidated,
    "consolidation requested over the API"
  );
  Ok(Json(report))
}
