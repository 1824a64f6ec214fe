//! Person — an individual in the registry.
//!
//! Identity fields are opaque to the consolidation engine. Only the engine
//! writes `family_id` and `family_role`; [`NewPerson`] and [`PersonPatch`]
//! deliberately carry neither.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::relation::FamilyRole;

/// The registry category a person belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
  Member,
  Visitor,
}

impl PersonKind {
  /// Only members are grouped into family records.
  pub fn groups_into_families(self) -> bool { matches!(self, Self::Member) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:   Uuid,
  pub created_at:  DateTime<Utc>,
  pub kind:        PersonKind,
  pub given_name:  String,
  pub family_name: String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub family_id:   Option<Uuid>,
  pub family_role: Option<FamilyRole>,
}

/// Input for [`FamilyStore::add_person`](crate::store::FamilyStore::add_person).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub kind:        PersonKind,
  pub given_name:  String,
  pub family_name: String,
  #[serde(default)]
  pub phone:       Option<String>,
  #[serde(default)]
  pub email:       Option<String>,
}

impl NewPerson {
  pub fn member(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
    Self {
      kind:        PersonKind::Member,
      given_name:  given_name.into(),
      family_name: family_name.into(),
      phone:       None,
      email:       None,
    }
  }

  pub fn visitor(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
    Self { kind: PersonKind::Visitor, ..Self::member(given_name, family_name) }
  }
}

/// A partial update of identity fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPatch {
  pub given_name:  Option<String>,
  pub family_name: Option<String>,
  pub phone:       Option<String>,
  pub email:       Option<String>,
}

impl PersonPatch {
  pub fn apply(self, person: &mut Person) {
    if let Some(v) = self.given_name {
      person.given_name = v;
    }
    if let Some(v) = self.family_name {
      person.family_name = v;
    }
    if let Some(v) = self.phone {
      person.phone = Some(v);
    }
    if let Some(v) = self.email {
      person.email = Some(v);
    }
  }
}

/// Parameters for [`FamilyStore::list_people`](crate::store::FamilyStore::list_people).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonQuery {
  pub kind:      Option<PersonKind>,
  pub family_id: Option<Uuid>,
}
