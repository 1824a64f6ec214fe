//! Handlers for `/people` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/people` | optional `kind`, `family_id` |
//! | `POST`  | `/people` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`   | `/people/{id}` | Single person |
//! | `PATCH` | `/people/{id}` | Body: [`PersonPatch`]; identity fields only |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use hearth_core::{
  person::{NewPerson, Person, PersonPatch, PersonQuery},
  store::FamilyStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /people[?kind=member|visitor][&family_id=<id>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(query): Query<PersonQuery>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: FamilyStore,
{
  let people = store.list_people(query).await.map_err(ApiError::store)?;
  Ok(Json(people))
}

/// `POST /people`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  let Json(body) = body?;
  if body.given_name.trim().is_empty() || body.family_name.trim().is_empty() {
    return Err(ApiError::BadRequest("given_name and family_name are required".into()));
  }
  let person = store.add_person(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /people/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: FamilyStore,
{
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

/// `PATCH /people/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  patch: Result<Json<PersonPatch>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: FamilyStore,
{
  let Json(patch) = patch?;
  let person = store.update_person(id, patch).await.map_err(ApiError::store)?;
  Ok(Json(person))
}
