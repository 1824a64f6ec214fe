//! The closed relationship vocabulary and the tables derived from it.
//!
//! Labels are stored and serialised in the registry's working language
//! (`Esposo/a`, `Hijo/a`, ...). Every lookup in this module is an exhaustive
//! match, so adding a kind forces each table to be revisited.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Relationship kinds ──────────────────────────────────────────────────────

/// What one person is to another.
///
/// On a [`Relationship`](crate::relationship::Relationship) the kind names
/// what `person_b` is to `person_a`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
pub enum RelationKind {
  #[serde(rename = "Esposo/a")]
  #[strum(serialize = "Esposo/a")]
  Spouse,
  #[serde(rename = "Padre/Madre")]
  #[strum(serialize = "Padre/Madre")]
  Parent,
  #[serde(rename = "Hijo/a")]
  #[strum(serialize = "Hijo/a")]
  Child,
  #[serde(rename = "Hermano/a")]
  #[strum(serialize = "Hermano/a")]
  Sibling,
  #[serde(rename = "Abuelo/a")]
  #[strum(serialize = "Abuelo/a")]
  Grandparent,
  #[serde(rename = "Nieto/a")]
  #[strum(serialize = "Nieto/a")]
  Grandchild,
  #[serde(rename = "Tío/a")]
  #[strum(serialize = "Tío/a")]
  UncleAunt,
  #[serde(rename = "Sobrino/a")]
  #[strum(serialize = "Sobrino/a")]
  NephewNiece,
  #[serde(rename = "Primo/a")]
  #[strum(serialize = "Primo/a")]
  Cousin,
  #[serde(rename = "Suegro/a")]
  #[strum(serialize = "Suegro/a")]
  ParentInLaw,
  #[serde(rename = "Yerno/Nuera")]
  #[strum(serialize = "Yerno/Nuera")]
  ChildInLaw,
  #[serde(rename = "Cuñado/a")]
  #[strum(serialize = "Cuñado/a")]
  SiblingInLaw,
  #[serde(rename = "Otro")]
  #[strum(serialize = "Otro")]
  Other,
}

impl RelationKind {
  /// Parse a stored or user-supplied label. Unknown labels are rejected.
  pub fn from_label(label: &str) -> Result<Self> {
    label
      .parse()
      .map_err(|_| Error::UnknownRelationKind(label.to_owned()))
  }

  pub fn label(self) -> &'static str { self.into() }

  /// The kind seen from the other end of the pair.
  pub fn inverse(self) -> Self {
    match self {
      Self::Spouse => Self::Spouse,
      Self::Parent => Self::Child,
      Self::Child => Self::Parent,
      Self::Sibling => Self::Sibling,
      Self::Grandparent => Self::Grandchild,
      Self::Grandchild => Self::Grandparent,
      Self::UncleAunt => Self::NephewNiece,
      Self::NephewNiece => Self::UncleAunt,
      Self::Cousin => Self::Cousin,
      Self::ParentInLaw => Self::ChildInLaw,
      Self::ChildInLaw => Self::ParentInLaw,
      Self::SiblingInLaw => Self::SiblingInLaw,
      Self::Other => Self::Other,
    }
  }

  pub fn is_symmetric(self) -> bool { self.inverse() == self }

  /// Whether two people related this way belong in the same family record.
  pub fn implies_shared_household(self) -> bool {
    match self {
      Self::Spouse | Self::Parent | Self::Child | Self::Sibling => true,
      Self::Grandparent
      | Self::Grandchild
      | Self::UncleAunt
      | Self::NephewNiece
      | Self::Cousin
      | Self::ParentInLaw
      | Self::ChildInLaw
      | Self::SiblingInLaw
      | Self::Other => false,
    }
  }
}

impl fmt::Display for RelationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Family roles ────────────────────────────────────────────────────────────

const HEAD_LABEL: &str = "Cabeza de Familia";

/// A person's role within their family, read relative to the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FamilyRole {
  Head,
  Relative(RelationKind),
}

impl FamilyRole {
  pub fn from_label(label: &str) -> Result<Self> {
    if label == HEAD_LABEL {
      return Ok(Self::Head);
    }
    RelationKind::from_label(label)
      .map(Self::Relative)
      .map_err(|_| Error::UnknownFamilyRole(label.to_owned()))
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Head => HEAD_LABEL,
      Self::Relative(kind) => kind.label(),
    }
  }

  pub fn is_head(self) -> bool { matches!(self, Self::Head) }
}

impl fmt::Display for FamilyRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl From<FamilyRole> for String {
  fn from(role: FamilyRole) -> Self { role.label().to_owned() }
}

impl TryFrom<String> for FamilyRole {
  type Error = Error;

  fn try_from(label: String) -> Result<Self> { Self::from_label(&label) }
}

// ─── Household roles ─────────────────────────────────────────────────────────

/// One end of an ordered relationship pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
  A,
  B,
}

/// How a household-implying relationship distributes family roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdRoles {
  /// The party entitled to head the family.
  pub head:      Side,
  /// The role the other party takes under that head.
  pub dependent: RelationKind,
}

/// Role distribution for `kind`, or `None` when the kind does not imply a
/// shared household.
pub fn household_roles(kind: RelationKind) -> Option<HouseholdRoles> {
  let (head, dependent) = match kind {
    RelationKind::Spouse => (Side::A, RelationKind::Spouse),
    RelationKind::Child => (Side::A, RelationKind::Child),
    RelationKind::Parent => (Side::B, RelationKind::Child),
    RelationKind::Sibling => (Side::A, RelationKind::Sibling),
    _ => return None,
  };
  Some(HouseholdRoles { head, dependent })
}

// ─── Inference table ─────────────────────────────────────────────────────────

/// What an existing family member is to a newcomer, given both roles.
///
/// Pairs without an entry return `None`; callers skip them rather than guess.
pub fn infer_relation(
  existing: FamilyRole,
  newcomer: FamilyRole,
) -> Option<RelationKind> {
  use FamilyRole::{Head, Relative};
  use RelationKind::*;

  let kind = match (existing, newcomer) {
    (Head, Relative(Other)) | (Relative(Other), Head) => return None,
    (Head, Relative(kind)) => kind.inverse(),
    (Relative(kind), Head) => kind,
    (Relative(Spouse), Relative(Child)) => Parent,
    (Relative(Child), Relative(Spouse)) => Child,
    (Relative(Child), Relative(Child)) => Sibling,
    (Relative(Sibling), Relative(Sibling)) => Sibling,
    (Relative(Sibling), Relative(Child)) => UncleAunt,
    (Relative(Child), Relative(Sibling)) => NephewNiece,
    (Relative(Spouse), Relative(Sibling))
    | (Relative(Sibling), Relative(Spouse)) => SiblingInLaw,
    (Relative(Parent), Relative(Child)) => Grandparent,
    (Relative(Child), Relative(Parent)) => Grandchild,
    (Relative(Spouse), Relative(Grandchild)) => Grandparent,
    (Relative(Grandchild), Relative(Spouse)) => Grandchild,
    (Relative(Spouse), Relative(ChildInLaw)) => ParentInLaw,
    (Relative(ChildInLaw), Relative(Spouse)) => ChildInLaw,
    _ => return None,
  };
  Some(kind)
}

/// If someone is `via` to the head and another person is `step` to them,
/// what that other person is to the head.
///
/// Used to label a person who joins a family through someone other than its
/// head. Chains that could resolve to more than one kind return `None`.
pub fn compose_relation(via: RelationKind, step: RelationKind) -> Option<RelationKind> {
  use RelationKind::*;

  let kind = match (via, step) {
    (Spouse, Child) => Child,
    (Spouse, Sibling) => SiblingInLaw,
    (Spouse, Parent) => ParentInLaw,
    (Child, Child) => Grandchild,
    (Child, Spouse) => ChildInLaw,
    (Child, Sibling) => Child,
    (Sibling, Child) => NephewNiece,
    (Sibling, Spouse) => SiblingInLaw,
    (Sibling, Sibling) => Sibling,
    (Sibling, Parent) => Parent,
    (Parent, Child) => Sibling,
    (Parent, Spouse) => Parent,
    (Parent, Sibling) => UncleAunt,
    (Parent, Parent) => Grandparent,
    (Grandchild, Sibling) => Grandchild,
    (Grandparent, Spouse) => Grandparent,
    (NephewNiece, Sibling) => NephewNiece,
    (UncleAunt, Child) => Cousin,
    (UncleAunt, Spouse) => UncleAunt,
    _ => return None,
  };
  Some(kind)
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn inverse_is_an_involution() {
    for kind in RelationKind::iter() {
      assert_eq!(kind.inverse().inverse(), kind, "{kind}");
    }
  }

  #[test]
  fn symmetric_kinds_are_their_own_inverse() {
    let symmetric: Vec<_> =
      RelationKind::iter().filter(|k| k.is_symmetric()).collect();
    assert_eq!(symmetric, vec![
      RelationKind::Spouse,
      RelationKind::Sibling,
      RelationKind::Cousin,
      RelationKind::SiblingInLaw,
      RelationKind::Other,
    ]);
    assert!(!RelationKind::Parent.is_symmetric());
    assert!(!RelationKind::Child.is_symmetric());
  }

  #[test]
  fn only_close_kin_share_a_household() {
    let household: Vec<_> = RelationKind::iter()
      .filter(|k| k.implies_shared_household())
      .collect();
    assert_eq!(household, vec![
      RelationKind::Spouse,
      RelationKind::Parent,
      RelationKind::Child,
      RelationKind::Sibling,
    ]);
    for kind in RelationKind::iter() {
      assert_eq!(
        household_roles(kind).is_some(),
        kind.implies_shared_household(),
        "{kind}"
      );
    }
  }

  #[test]
  fn labels_round_trip() {
    for kind in RelationKind::iter() {
      assert_eq!(RelationKind::from_label(kind.label()).unwrap(), kind);
      let role = FamilyRole::Relative(kind);
      assert_eq!(FamilyRole::from_label(role.label()).unwrap(), role);
    }
    assert_eq!(
      FamilyRole::from_label("Cabeza de Familia").unwrap(),
      FamilyRole::Head
    );
  }

  #[test]
  fn unknown_label_is_rejected() {
    assert!(matches!(
      RelationKind::from_label("Compadre"),
      Err(Error::UnknownRelationKind(l)) if l == "Compadre"
    ));
    assert!(FamilyRole::from_label("").is_err());
  }

  #[test]
  fn serde_uses_labels() {
    let json = serde_json::to_string(&RelationKind::SiblingInLaw).unwrap();
    assert_eq!(json, "\"Cuñado/a\"");
    let role: FamilyRole = serde_json::from_str("\"Cabeza de Familia\"").unwrap();
    assert_eq!(role, FamilyRole::Head);
    let json = serde_json::to_string(&FamilyRole::Relative(RelationKind::Child))
      .unwrap();
    assert_eq!(json, "\"Hijo/a\"");
  }

  #[test]
  fn parent_assertion_makes_b_the_head() {
    let roles = household_roles(RelationKind::Parent).unwrap();
    assert_eq!(roles.head, Side::B);
    assert_eq!(roles.dependent, RelationKind::Child);
  }

  #[test]
  fn inference_reads_from_the_existing_member() {
    assert_eq!(
      infer_relation(FamilyRole::Head, FamilyRole::Relative(RelationKind::Child)),
      Some(RelationKind::Parent)
    );
    assert_eq!(
      infer_relation(
        FamilyRole::Relative(RelationKind::Child),
        FamilyRole::Relative(RelationKind::Child)
      ),
      Some(RelationKind::Sibling)
    );
  }

  #[test]
  fn inference_reads_any_role_against_the_head() {
    for kind in RelationKind::iter().filter(|k| *k != RelationKind::Other) {
      let role = FamilyRole::Relative(kind);
      assert_eq!(infer_relation(FamilyRole::Head, role), Some(kind.inverse()));
      assert_eq!(infer_relation(role, FamilyRole::Head), Some(kind));
    }
    assert_eq!(
      infer_relation(
        FamilyRole::Head,
        FamilyRole::Relative(RelationKind::ChildInLaw)
      ),
      Some(RelationKind::ParentInLaw)
    );
  }

  #[test]
  fn inference_skips_unknown_pairs() {
    assert_eq!(infer_relation(FamilyRole::Head, FamilyRole::Head), None);
    assert_eq!(
      infer_relation(FamilyRole::Head, FamilyRole::Relative(RelationKind::Other)),
      None
    );
    // A child of the head may be the parent or the aunt of a grandchild.
    assert_eq!(
      infer_relation(
        FamilyRole::Relative(RelationKind::Child),
        FamilyRole::Relative(RelationKind::Grandchild)
      ),
      None
    );
    assert_eq!(
      infer_relation(
        FamilyRole::Relative(RelationKind::Cousin),
        FamilyRole::Relative(RelationKind::Child)
      ),
      None
    );
  }

  #[test]
  fn composition_walks_through_an_intermediate_relative() {
    use RelationKind::*;
    assert_eq!(compose_relation(Child, Child), Some(Grandchild));
    assert_eq!(compose_relation(Child, Spouse), Some(ChildInLaw));
    assert_eq!(compose_relation(Sibling, Child), Some(NephewNiece));
    assert_eq!(compose_relation(Spouse, Parent), Some(ParentInLaw));
    // The head's child's parent is the head or the head's spouse.
    assert_eq!(compose_relation(Child, Parent), None);
    assert_eq!(compose_relation(Spouse, Spouse), None);
  }
}
