//! Family — a household grouping that members point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::Person;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
  pub family_id:    Uuid,
  pub created_at:   DateTime<Utc>,
  pub surname:      String,
  pub display_name: Option<String>,
  pub notes:        Option<String>,
  /// Derived on read; never stored.
  pub member_count: usize,
}

impl Family {
  /// A fresh, empty family named after its head.
  pub fn founded_by(head: &Person) -> Self {
    let surname = head.family_name.clone();
    Self {
      family_id:    Uuid::new_v4(),
      created_at:   Utc::now(),
      display_name: Some(format!("Familia {surname}")),
      surname,
      notes:        None,
      member_count: 0,
    }
  }
}

/// Editable descriptive fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyDetails {
  pub surname:      Option<String>,
  pub display_name: Option<String>,
  pub notes:        Option<String>,
}

impl FamilyDetails {
  pub fn apply(self, family: &mut Family) {
    if let Some(v) = self.surname {
      family.surname = v;
    }
    if let Some(v) = self.display_name {
      family.display_name = Some(v);
    }
    if let Some(v) = self.notes {
      family.notes = Some(v);
    }
  }
}

/// A family together with its current members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyView {
  pub family:  Family,
  pub members: Vec<Person>,
}
