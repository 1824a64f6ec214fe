//! [`SqliteStore`] — the SQLite implementation of [`FamilyStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::TransactionBehavior;
use uuid::Uuid;

use hearth_core::{
  consolidate::{self, Consolidation, ReconsolidationReport},
  family::{Family, FamilyDetails, FamilyView},
  graph::FamilyGraph as _,
  person::{NewPerson, Person, PersonPatch, PersonQuery},
  relation::RelationKind,
  relationship::{NewRelationship, Relationship},
  store::FamilyStore,
};

use crate::{Result, graph::SqliteGraph, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hearth registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` against the bare connection, outside any explicit transaction.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut SqliteGraph<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(f(&mut SqliteGraph::new(conn))))
      .await?
  }

  /// Run `f` inside a `BEGIN IMMEDIATE` transaction, committing only if it
  /// succeeds. The immediate lock is taken before the first read, so
  /// concurrent consolidations are applied one after another.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut SqliteGraph<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = f(&mut SqliteGraph::new(&tx));
        match &outcome {
          Ok(_) => tx.commit()?,
          Err(e) => tracing::debug!(error = %e, "rolling back"),
        }
        Ok(outcome)
      })
      .await?
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = crate::Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      person_id:   Uuid::new_v4(),
      created_at:  Utc::now(),
      kind:        input.kind,
      given_name:  input.given_name,
      family_name: input.family_name,
      phone:       input.phone,
      email:       input.email,
      family_id:   None,
      family_role: None,
    };

    let row = person.clone();
    self.write(move |graph| graph.insert_person(&row)).await?;
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    self.read(move |graph| graph.person(id)).await
  }

  async fn list_people(&self, query: PersonQuery) -> Result<Vec<Person>> {
    self.read(move |graph| graph.list_people(&query)).await
  }

  async fn update_person(&self, id: Uuid, patch: PersonPatch) -> Result<Person> {
    self.write(move |graph| graph.update_person(id, patch)).await
  }

  // ── Families ──────────────────────────────────────────────────────────────

  async fn get_family(&self, id: Uuid) -> Result<Option<FamilyView>> {
    self
      .read(move |graph| {
        let Some(family) = graph.family(id)? else {
          return Ok(None);
        };
        let members = graph.members(id)?;
        Ok(Some(FamilyView { family, members }))
      })
      .await
  }

  async fn list_families(&self) -> Result<Vec<Family>> {
    self.read(|graph| graph.list_families()).await
  }

  async fn update_family_details(
    &self,
    id: Uuid,
    details: FamilyDetails,
  ) -> Result<Family> {
    self.write(move |graph| graph.update_family(id, details)).await
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn relate(&self, input: NewRelationship) -> Result<(Relationship, Consolidation)> {
    self.write(move |graph| consolidate::relate(graph, &input)).await
  }

  async fn get_relationship(&self, id: Uuid) -> Result<Option<Relationship>> {
    self.read(move |graph| graph.relationship(id)).await
  }

  async fn relationships_for(&self, person_id: Uuid) -> Result<Vec<Relationship>> {
    self.read(move |graph| graph.relationships_for(person_id)).await
  }

  async fn remove_relationship(&self, id: Uuid) -> Result<()> {
    self.write(move |graph| graph.delete_relationship(id)).await
  }

  // ── Consolidation ─────────────────────────────────────────────────────────

  async fn consolidate_pair(
    &self,
    a: Uuid,
    b: Uuid,
    kind: RelationKind,
  ) -> Result<Consolidation> {
    self
      .write(move |graph| consolidate::consolidate_pair(graph, a, b, kind))
      .await
  }

  async fn backfill(&self, person_id: Uuid, family_id: Uuid) -> Result<usize> {
    self
      .write(move |graph| {
        consolidate::backfill_relationships(graph, person_id, family_id)
      })
      .await
  }

  async fn reconsolidate(&self, scope: Option<Uuid>) -> Result<ReconsolidationReport> {
    self
      .write(move |graph| consolidate::reconsolidate(graph, scope))
      .await
  }
}
