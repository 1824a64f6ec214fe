//! [`SqliteGraph`] — the engine's view of a SQLite connection.
//!
//! Every SQL statement the store issues lives here. The store hands the engine
//! a graph bound to an open transaction; plain reads use the bare connection.

use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use hearth_core::{
  family::{Family, FamilyDetails},
  graph::FamilyGraph,
  person::{Person, PersonPatch, PersonQuery},
  relation::FamilyRole,
  relationship::{Relationship, unordered_pair},
};

use crate::{
  Error, Result,
  encode::{
    FAMILY_COLUMNS, PERSON_COLUMNS, RELATIONSHIP_COLUMNS, RawFamily, RawPerson,
    RawRelationship, encode_dt, encode_person_kind, encode_uuid,
  },
};

pub struct SqliteGraph<'c> {
  conn: &'c Connection,
}

impl<'c> SqliteGraph<'c> {
  pub fn new(conn: &'c Connection) -> Self { Self { conn } }

  fn query_people(
    &self,
    sql: &str,
    params: impl rusqlite::Params,
  ) -> Result<Vec<Person>> {
    let mut stmt = self.conn.prepare(sql)?;
    let raws = stmt
      .query_map(params, RawPerson::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawPerson::into_person).collect()
  }

  fn query_relationships(
    &self,
    sql: &str,
    params: impl rusqlite::Params,
  ) -> Result<Vec<Relationship>> {
    let mut stmt = self.conn.prepare(sql)?;
    let raws = stmt
      .query_map(params, RawRelationship::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws
      .into_iter()
      .map(RawRelationship::into_relationship)
      .collect()
  }

  // ── People ──────────────────────────────────────────────────────────────

  pub fn insert_person(&self, person: &Person) -> Result<()> {
    self.conn.execute(
      "INSERT INTO people (
         person_id, created_at, kind, given_name, family_name,
         phone, email, family_id, family_role
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      params![
        encode_uuid(person.person_id),
        encode_dt(person.created_at),
        encode_person_kind(person.kind),
        person.given_name,
        person.family_name,
        person.phone,
        person.email,
        person.family_id.map(encode_uuid),
        person.family_role.map(FamilyRole::label),
      ],
    )?;
    Ok(())
  }

  pub fn list_people(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    self.query_people(
      &format!(
        "SELECT {PERSON_COLUMNS} FROM people
         WHERE (?1 IS NULL OR kind = ?1)
           AND (?2 IS NULL OR family_id = ?2)
         ORDER BY created_at, rowid"
      ),
      params![
        query.kind.map(encode_person_kind),
        query.family_id.map(encode_uuid),
      ],
    )
  }

  pub fn update_person(&self, id: Uuid, patch: PersonPatch) -> Result<Person> {
    let mut graph = Self::new(self.conn);
    let mut person = graph
      .person(id)?
      .ok_or(hearth_core::Error::PersonNotFound(id))?;
    patch.apply(&mut person);
    self.conn.execute(
      "UPDATE people
         SET given_name = ?2, family_name = ?3, phone = ?4, email = ?5
       WHERE person_id = ?1",
      params![
        encode_uuid(id),
        person.given_name,
        person.family_name,
        person.phone,
        person.email,
      ],
    )?;
    Ok(person)
  }

  // ── Families ────────────────────────────────────────────────────────────

  pub fn family(&self, id: Uuid) -> Result<Option<Family>> {
    let raw = self
      .conn
      .query_row(
        &format!(
          "SELECT {FAMILY_COLUMNS}
           FROM families f
           LEFT JOIN people p ON p.family_id = f.family_id
           WHERE f.family_id = ?1
           GROUP BY f.family_id"
        ),
        params![encode_uuid(id)],
        RawFamily::from_row,
      )
      .optional()?;
    raw.map(RawFamily::into_family).transpose()
  }

  pub fn list_families(&self) -> Result<Vec<Family>> {
    let mut stmt = self.conn.prepare(&format!(
      "SELECT {FAMILY_COLUMNS}
       FROM families f
       LEFT JOIN people p ON p.family_id = f.family_id
       GROUP BY f.family_id
       ORDER BY f.created_at, f.rowid"
    ))?;
    let raws = stmt
      .query_map([], RawFamily::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawFamily::into_family).collect()
  }

  pub fn update_family(&self, id: Uuid, details: FamilyDetails) -> Result<Family> {
    let mut family = self
      .family(id)?
      .ok_or(hearth_core::Error::FamilyNotFound(id))?;
    details.apply(&mut family);
    self.conn.execute(
      "UPDATE families SET surname = ?2, display_name = ?3, notes = ?4
       WHERE family_id = ?1",
      params![encode_uuid(id), family.surname, family.display_name, family.notes],
    )?;
    Ok(family)
  }

  // ── Relationships ───────────────────────────────────────────────────────

  pub fn relationship(&self, id: Uuid) -> Result<Option<Relationship>> {
    Ok(
      self
        .query_relationships(
          &format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
             WHERE relationship_id = ?1"
          ),
          params![encode_uuid(id)],
        )?
        .pop(),
    )
  }

  pub fn relationships_for(&self, person_id: Uuid) -> Result<Vec<Relationship>> {
    self.query_relationships(
      &format!(
        "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
         WHERE person_a = ?1 OR person_b = ?1
         ORDER BY created_at, rowid"
      ),
      params![encode_uuid(person_id)],
    )
  }

  pub fn delete_relationship(&self, id: Uuid) -> Result<()> {
    let deleted = self.conn.execute(
      "DELETE FROM relationships WHERE relationship_id = ?1",
      params![encode_uuid(id)],
    )?;
    if deleted == 0 {
      return Err(hearth_core::Error::RelationshipNotFound(id).into());
    }
    Ok(())
  }
}

// ─── FamilyGraph impl ────────────────────────────────────────────────────────

impl FamilyGraph for SqliteGraph<'_> {
  type Error = Error;

  fn person(&mut self, id: Uuid) -> Result<Option<Person>> {
    Ok(
      self
        .query_people(
          &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
          params![encode_uuid(id)],
        )?
        .pop(),
    )
  }

  fn set_family(&mut self, person_id: Uuid, family_id: Option<Uuid>) -> Result<()> {
    self.conn.execute(
      "UPDATE people SET family_id = ?2 WHERE person_id = ?1",
      params![encode_uuid(person_id), family_id.map(encode_uuid)],
    )?;
    Ok(())
  }

  fn set_role(&mut self, person_id: Uuid, role: Option<FamilyRole>) -> Result<()> {
    self.conn.execute(
      "UPDATE people SET family_role = ?2 WHERE person_id = ?1",
      params![encode_uuid(person_id), role.map(FamilyRole::label)],
    )?;
    Ok(())
  }

  fn family_exists(&mut self, family_id: Uuid) -> Result<bool> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT 1 FROM families WHERE family_id = ?1",
          params![encode_uuid(family_id)],
          |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false),
    )
  }

  fn members(&mut self, family_id: Uuid) -> Result<Vec<Person>> {
    self.query_people(
      &format!(
        "SELECT {PERSON_COLUMNS} FROM people
         WHERE family_id = ?1
         ORDER BY created_at, rowid"
      ),
      params![encode_uuid(family_id)],
    )
  }

  fn member_count(&mut self, family_id: Uuid) -> Result<usize> {
    let count: i64 = self.conn.query_row(
      "SELECT COUNT(*) FROM people WHERE family_id = ?1",
      params![encode_uuid(family_id)],
      |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or_default())
  }

  fn insert_family(&mut self, family: &Family) -> Result<()> {
    self.conn.execute(
      "INSERT INTO families (family_id, created_at, surname, display_name, notes)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      params![
        encode_uuid(family.family_id),
        encode_dt(family.created_at),
        family.surname,
        family.display_name,
        family.notes,
      ],
    )?;
    Ok(())
  }

  fn move_members(&mut self, from: Uuid, to: Uuid) -> Result<usize> {
    let (from, to) = (encode_uuid(from), encode_uuid(to));
    let moved = self.conn.execute(
      "UPDATE people SET family_id = ?2 WHERE family_id = ?1",
      params![from, to],
    )?;
    self.conn.execute(
      "UPDATE relationships SET context_family_id = ?2 WHERE context_family_id = ?1",
      params![from, to],
    )?;
    Ok(moved)
  }

  fn delete_family(&mut self, family_id: Uuid) -> Result<()> {
    let deleted = self.conn.execute(
      "DELETE FROM families WHERE family_id = ?1",
      params![encode_uuid(family_id)],
    )?;
    if deleted == 0 {
      return Err(hearth_core::Error::FamilyNotFound(family_id).into());
    }
    Ok(())
  }

  fn relationship_between(&mut self, x: Uuid, y: Uuid) -> Result<Option<Relationship>> {
    let (low, high) = unordered_pair(x, y);
    Ok(
      self
        .query_relationships(
          &format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
             WHERE pair_low = ?1 AND pair_high = ?2"
          ),
          params![encode_uuid(low), encode_uuid(high)],
        )?
        .pop(),
    )
  }

  fn insert_relationship(&mut self, rel: &Relationship) -> Result<()> {
    let (low, high) = rel.pair();
    self.conn.execute(
      "INSERT INTO relationships (
         relationship_id, person_a, person_b, pair_low, pair_high,
         kind, inverse_kind, symmetric, context_family_id, created_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      params![
        encode_uuid(rel.relationship_id),
        encode_uuid(rel.person_a),
        encode_uuid(rel.person_b),
        encode_uuid(low),
        encode_uuid(high),
        rel.kind.label(),
        rel.inverse_kind.label(),
        rel.symmetric,
        rel.context_family_id.map(encode_uuid),
        encode_dt(rel.created_at),
      ],
    )?;
    Ok(())
  }

  fn relationships(&mut self, scope: Option<Uuid>) -> Result<Vec<Relationship>> {
    match scope {
      None => self.query_relationships(
        &format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
           ORDER BY created_at, rowid"
        ),
        [],
      ),
      Some(family_id) => self.query_relationships(
        &format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
           WHERE context_family_id = ?1
              OR person_a IN (SELECT person_id FROM people WHERE family_id = ?1)
              OR person_b IN (SELECT person_id FROM people WHERE family_id = ?1)
           ORDER BY created_at, rowid"
        ),
        params![encode_uuid(family_id)],
      ),
    }
  }

  fn repair_relationship(&mut self, rel: &Relationship) -> Result<()> {
    self.conn.execute(
      "UPDATE relationships SET inverse_kind = ?2, symmetric = ?3
       WHERE relationship_id = ?1",
      params![
        encode_uuid(rel.relationship_id),
        rel.inverse_kind.label(),
        rel.symmetric,
      ],
    )?;
    Ok(())
  }
}
