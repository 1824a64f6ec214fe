//! The `FamilyStore` trait — the async surface the API layer talks to.
//!
//! Implemented by storage backends (e.g. `hearth-store-sqlite`). Writes to
//! family membership only happen through [`FamilyStore::relate`],
//! [`FamilyStore::consolidate_pair`], [`FamilyStore::backfill`] and
//! [`FamilyStore::reconsolidate`], each of which runs the engine in
//! [`crate::consolidate`] inside one transaction.

use std::future::Future;

use uuid::Uuid;

use crate::{
  consolidate::{Consolidation, ReconsolidationReport},
  family::{Family, FamilyDetails, FamilyView},
  person::{NewPerson, Person, PersonPatch, PersonQuery},
  relation::RelationKind,
  relationship::{NewRelationship, Relationship},
};

/// Abstraction over a Hearth registry backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FamilyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by UUID. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn list_people(
    &self,
    query: PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Edit identity fields. Family membership is not editable here.
  fn update_person(
    &self,
    id: Uuid,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Families ──────────────────────────────────────────────────────────

  /// A family with its members. Returns `None` if not found.
  fn get_family(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<FamilyView>, Self::Error>> + Send + '_;

  fn list_families(
    &self,
  ) -> impl Future<Output = Result<Vec<Family>, Self::Error>> + Send + '_;

  fn update_family_details(
    &self,
    id: Uuid,
    details: FamilyDetails,
  ) -> impl Future<Output = Result<Family, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Validate and record an assertion, then consolidate the pair.
  ///
  /// Fails if either person is missing, the two are the same person, a
  /// claimed person kind does not match, or the pair already has an
  /// assertion.
  fn relate(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<(Relationship, Consolidation), Self::Error>>
  + Send
  + '_;

  fn get_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Relationship>, Self::Error>> + Send + '_;

  /// Every assertion with `person_id` at either end, oldest first.
  fn relationships_for(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + '_;

  /// Manually remove an assertion. Family membership is left untouched.
  fn remove_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Consolidation ─────────────────────────────────────────────────────

  fn consolidate_pair(
    &self,
    a: Uuid,
    b: Uuid,
    kind: RelationKind,
  ) -> impl Future<Output = Result<Consolidation, Self::Error>> + Send + '_;

  /// Returns the number of assertions created.
  fn backfill(
    &self,
    person_id: Uuid,
    family_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Replay consolidation over the whole ledger, or over one family.
  fn reconsolidate(
    &self,
    scope: Option<Uuid>,
  ) -> impl Future<Output = Result<ReconsolidationReport, Self::Error>> + Send + '_;
}
