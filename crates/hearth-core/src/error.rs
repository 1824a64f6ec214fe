//! Error types for `hearth-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::person::PersonKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("family not found: {0}")]
  FamilyNotFound(Uuid),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(Uuid),

  #[error("a person cannot be related to themselves: {0}")]
  SelfRelationship(Uuid),

  #[error("a relationship between {0} and {1} already exists")]
  DuplicateRelationship(Uuid, Uuid),

  #[error("unknown relationship kind: {0:?}")]
  UnknownRelationKind(String),

  #[error("unknown family role: {0:?}")]
  UnknownFamilyRole(String),

  #[error("unknown person kind: {0:?}")]
  UnknownPersonKind(String),

  #[error("person {person} is a {found:?}, not a {expected:?}")]
  KindMismatch {
    person:   Uuid,
    expected: PersonKind,
    found:    PersonKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
