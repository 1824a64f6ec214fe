//! Handlers for `/relationships` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/relationships` | `?person_id` required |
//! | `POST`   | `/relationships` | Body: [`NewRelationship`]; records and consolidates |
//! | `GET`    | `/relationships/{id}` | Single assertion |
//! | `DELETE` | `/relationships/{id}` | Manual removal; families are untouched |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use hearth_core::{
  consolidate::Consolidation,
  relationship::{NewRelationship, Relationship},
  store::FamilyStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the person whose relationships to return.
  pub person_id: Uuid,
}

/// `GET /relationships?person_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Relationship>>, ApiError>
where
  S: FamilyStore,
{
  let rels = store
    .relationships_for(params.person_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rels))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Response to `POST /relationships`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub relationship:  Relationship,
  pub consolidation: Consolidation,
  /// Confirmation text for the person who made the assertion.
  pub message:       String,
}

/// `POST /relationships` — returns 201 + [`Created`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewRelationship>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  let Json(body) = body?;
  let (relationship, consolidation) =
    store.relate(body).await.map_err(ApiError::store)?;
  let message = consolidation.action.to_string();
  Ok((StatusCode::CREATED, Json(Created { relationship, consolidation, message })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /relationships/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Relationship>, ApiError>
where
  S: FamilyStore,
{
  let rel = store
    .get_relationship(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("relationship {id} not found")))?;
  Ok(Json(rel))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /relationships/{id}` — returns 204.
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: FamilyStore,
{
  store.remove_relationship(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
