//! Relationship assertions — the ledger of who is related to whom.
//!
//! The ledger is the source of truth; family grouping is derived from its
//! household-implying subset. At most one assertion exists per unordered pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{person::PersonKind, relation::RelationKind};

/// A stored fact: `person_b` is `kind` to `person_a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
  pub relationship_id:   Uuid,
  pub person_a:          Uuid,
  pub person_b:          Uuid,
  pub kind:              RelationKind,
  /// What `person_a` is to `person_b`; always `kind.inverse()` once repaired.
  pub inverse_kind:      RelationKind,
  pub symmetric:         bool,
  /// The family the assertion was made in reference to, if any.
  pub context_family_id: Option<Uuid>,
  pub created_at:        DateTime<Utc>,
}

impl Relationship {
  pub fn new(
    person_a: Uuid,
    person_b: Uuid,
    kind: RelationKind,
    context_family_id: Option<Uuid>,
  ) -> Self {
    Self {
      relationship_id: Uuid::new_v4(),
      person_a,
      person_b,
      kind,
      inverse_kind: kind.inverse(),
      symmetric: kind.is_symmetric(),
      context_family_id,
      created_at: Utc::now(),
    }
  }

  /// The unordered endpoint set, normalised so `(x, y)` and `(y, x)` match.
  pub fn pair(&self) -> (Uuid, Uuid) { unordered_pair(self.person_a, self.person_b) }

  /// Whether the stored inverse and symmetry flag agree with the vocabulary.
  pub fn is_consistent(&self) -> bool {
    self.inverse_kind == self.kind.inverse()
      && self.symmetric == self.kind.is_symmetric()
  }

  /// This assertion with its derived columns recomputed from `kind`.
  pub fn repaired(&self) -> Self {
    Self {
      inverse_kind: self.kind.inverse(),
      symmetric: self.kind.is_symmetric(),
      ..self.clone()
    }
  }
}

pub fn unordered_pair(x: Uuid, y: Uuid) -> (Uuid, Uuid) {
  if x <= y { (x, y) } else { (y, x) }
}

/// Input for [`FamilyStore::relate`](crate::store::FamilyStore::relate).
///
/// The person kinds are the caller's claim about each endpoint and are
/// checked against the stored records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelationship {
  pub person_a:          Uuid,
  pub person_a_kind:     PersonKind,
  pub person_b:          Uuid,
  pub person_b_kind:     PersonKind,
  pub kind:              RelationKind,
  #[serde(default)]
  pub context_family_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_fills_derived_columns() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let rel = Relationship::new(a, b, RelationKind::Child, None);
    assert_eq!(rel.inverse_kind, RelationKind::Parent);
    assert!(!rel.symmetric);
    assert!(rel.is_consistent());
    assert_eq!((rel.person_a, rel.person_b), (a, b));
  }

  #[test]
  fn pair_ignores_order() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let ab = Relationship::new(a, b, RelationKind::Cousin, None);
    let ba = Relationship::new(b, a, RelationKind::Cousin, None);
    assert_eq!(ab.pair(), ba.pair());
  }

  #[test]
  fn repaired_restores_the_inverse() {
    let mut rel =
      Relationship::new(Uuid::new_v4(), Uuid::new_v4(), RelationKind::Grandparent, None);
    rel.inverse_kind = RelationKind::Other;
    rel.symmetric = true;
    assert!(!rel.is_consistent());
    let fixed = rel.repaired();
    assert!(fixed.is_consistent());
    assert_eq!(fixed.inverse_kind, RelationKind::Grandchild);
    assert_eq!(fixed.relationship_id, rel.relationship_id);
  }
}
