//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (nanosecond
//! precision, `Z` suffix) so that text ordering matches time ordering. UUIDs
//! are stored as hyphenated lowercase strings. Relation kinds and family roles
//! are stored as their labels.

use chrono::{DateTime, SecondsFormat, Utc};
use hearth_core::{
  family::Family,
  person::{Person, PersonKind},
  relation::{FamilyRole, RelationKind},
  relationship::Relationship,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PersonKind ───────────────────────────────────────────────────────────────

pub fn encode_person_kind(k: PersonKind) -> &'static str {
  match k {
    PersonKind::Member => "member",
    PersonKind::Visitor => "visitor",
  }
}

pub fn decode_person_kind(s: &str) -> Result<PersonKind> {
  match s {
    "member" => Ok(PersonKind::Member),
    "visitor" => Ok(PersonKind::Visitor),
    other => Err(hearth_core::Error::UnknownPersonKind(other.to_owned()).into()),
  }
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "person_id, created_at, kind, given_name, \
                                  family_name, phone, email, family_id, family_role";

/// A `people` row as stored.
pub struct RawPerson {
  pub person_id:   String,
  pub created_at:  String,
  pub kind:        String,
  pub given_name:  String,
  pub family_name: String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub family_id:   Option<String>,
  pub family_role: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:   row.get(0)?,
      created_at:  row.get(1)?,
      kind:        row.get(2)?,
      given_name:  row.get(3)?,
      family_name: row.get(4)?,
      phone:       row.get(5)?,
      email:       row.get(6)?,
      family_id:   row.get(7)?,
      family_role: row.get(8)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:   decode_uuid(&self.person_id)?,
      created_at:  decode_dt(&self.created_at)?,
      kind:        decode_person_kind(&self.kind)?,
      given_name:  self.given_name,
      family_name: self.family_name,
      phone:       self.phone,
      email:       self.email,
      family_id:   decode_opt_uuid(self.family_id)?,
      family_role: self
        .family_role
        .as_deref()
        .map(FamilyRole::from_label)
        .transpose()?,
    })
  }
}

/// Column list matching [`RawFamily::from_row`]; expects `people p` joined on
/// `families f` and a `GROUP BY f.family_id`.
pub const FAMILY_COLUMNS: &str = "f.family_id, f.created_at, f.surname, \
                                  f.display_name, f.notes, COUNT(p.person_id)";

/// A `families` row plus its derived member count.
pub struct RawFamily {
  pub family_id:    String,
  pub created_at:   String,
  pub surname:      String,
  pub display_name: Option<String>,
  pub notes:        Option<String>,
  pub member_count: i64,
}

impl RawFamily {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      family_id:    row.get(0)?,
      created_at:   row.get(1)?,
      surname:      row.get(2)?,
      display_name: row.get(3)?,
      notes:        row.get(4)?,
      member_count: row.get(5)?,
    })
  }

  pub fn into_family(self) -> Result<Family> {
    Ok(Family {
      family_id:    decode_uuid(&self.family_id)?,
      created_at:   decode_dt(&self.created_at)?,
      surname:      self.surname,
      display_name: self.display_name,
      notes:        self.notes,
      member_count: usize::try_from(self.member_count).unwrap_or_default(),
    })
  }
}

/// Column list matching [`RawRelationship::from_row`].
pub const RELATIONSHIP_COLUMNS: &str = "relationship_id, person_a, person_b, kind, \
                                        inverse_kind, symmetric, context_family_id, \
                                        created_at";

/// A `relationships` row as stored.
pub struct RawRelationship {
  pub relationship_id:   String,
  pub person_a:          String,
  pub person_b:          String,
  pub kind:              String,
  pub inverse_kind:      String,
  pub symmetric:         bool,
  pub context_family_id: Option<String>,
  pub created_at:        String,
}

impl RawRelationship {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_id:   row.get(0)?,
      person_a:          row.get(1)?,
      person_b:          row.get(2)?,
      kind:              row.get(3)?,
      inverse_kind:      row.get(4)?,
      symmetric:         row.get(5)?,
      context_family_id: row.get(6)?,
      created_at:        row.get(7)?,
    })
  }

  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      relationship_id:   decode_uuid(&self.relationship_id)?,
      person_a:          decode_uuid(&self.person_a)?,
      person_b:          decode_uuid(&self.person_b)?,
      kind:              RelationKind::from_label(&self.kind)?,
      inverse_kind:      RelationKind::from_label(&self.inverse_kind)?,
      symmetric:         self.symmetric,
      context_family_id: decode_opt_uuid(self.context_family_id)?,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}
