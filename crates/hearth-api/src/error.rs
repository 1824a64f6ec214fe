//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error. Domain errors anywhere in the source chain map
  /// to 4xx responses; anything else is logged and reported as a bare 500.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(&e);
    while let Some(err) = cause {
      if let Some(core) = err.downcast_ref::<hearth_core::Error>() {
        return Self::from(core);
      }
      cause = err.source();
    }
    tracing::error!(error = %e, "store failure");
    Self::Store(Box::new(e))
  }
}

impl From<&hearth_core::Error> for ApiError {
  fn from(e: &hearth_core::Error) -> Self {
    use hearth_core::Error as E;
    match e {
      E::PersonNotFound(_) | E::FamilyNotFound(_) | E::RelationshipNotFound(_) => {
        Self::NotFound(e.to_string())
      }
      E::DuplicateRelationship(..) => Self::Conflict(e.to_string()),
      E::SelfRelationship(_)
      | E::UnknownRelationKind(_)
      | E::UnknownFamilyRole(_)
      | E::UnknownPersonKind(_)
      | E::KindMismatch { .. } => Self::BadRequest(e.to_string()),
    }
  }
}

/// A body that is not valid JSON for the endpoint, including unknown
/// relationship kinds, is a bad request.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
