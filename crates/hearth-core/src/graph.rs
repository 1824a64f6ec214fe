//! The `FamilyGraph` trait — the synchronous view the engine works against.
//!
//! A graph value is expected to live for exactly one transaction: backends
//! hand the engine a graph bound to an open transaction and commit only when
//! the engine returns `Ok`. Every method therefore sees the engine's own
//! earlier writes.

use uuid::Uuid;

use crate::{
  family::Family,
  person::Person,
  relation::FamilyRole,
  relationship::Relationship,
};

pub trait FamilyGraph {
  type Error: From<crate::Error>;

  // ── People ────────────────────────────────────────────────────────────

  fn person(&mut self, id: Uuid) -> Result<Option<Person>, Self::Error>;

  /// Point a person at a family (or at none).
  fn set_family(
    &mut self,
    person_id: Uuid,
    family_id: Option<Uuid>,
  ) -> Result<(), Self::Error>;

  fn set_role(
    &mut self,
    person_id: Uuid,
    role: Option<FamilyRole>,
  ) -> Result<(), Self::Error>;

  // ── Families ──────────────────────────────────────────────────────────

  fn family_exists(&mut self, family_id: Uuid) -> Result<bool, Self::Error>;

  /// Current members, oldest first.
  fn members(&mut self, family_id: Uuid) -> Result<Vec<Person>, Self::Error>;

  fn member_count(&mut self, family_id: Uuid) -> Result<usize, Self::Error> {
    Ok(self.members(family_id)?.len())
  }

  fn insert_family(&mut self, family: &Family) -> Result<(), Self::Error>;

  /// Re-point every member of `from`, and every relationship whose context is
  /// `from`, at `to`. Returns the number of people moved.
  fn move_members(&mut self, from: Uuid, to: Uuid) -> Result<usize, Self::Error>;

  /// Remove a family record. Callers move its members first.
  fn delete_family(&mut self, family_id: Uuid) -> Result<(), Self::Error>;

  // ── Relationships ─────────────────────────────────────────────────────

  /// The assertion between `x` and `y` in either direction, if any.
  fn relationship_between(
    &mut self,
    x: Uuid,
    y: Uuid,
  ) -> Result<Option<Relationship>, Self::Error>;

  fn insert_relationship(&mut self, rel: &Relationship) -> Result<(), Self::Error>;

  /// Every assertion, oldest first. With a scope, only assertions with an
  /// endpoint in that family or made in reference to it.
  fn relationships(
    &mut self,
    scope: Option<Uuid>,
  ) -> Result<Vec<Relationship>, Self::Error>;

  /// Overwrite the derived columns (`inverse_kind`, `symmetric`) of `rel`.
  fn repair_relationship(&mut self, rel: &Relationship) -> Result<(), Self::Error>;
}
