//! The consolidation engine.
//!
//! Keeps family membership in step with the household-implying part of the
//! relationship ledger:
//!
//! - [`consolidate_pair`] resolves two related people to one family, creating
//!   or merging families as needed and assigning roles.
//! - [`union_families`] merges two families (union by size).
//! - [`relate`] records a new assertion and consolidates its pair.
//! - [`backfill_relationships`] records the assertions implied by a person's
//!   role in their family.
//! - [`reconsolidate`] replays all of the above over the whole ledger.
//!
//! Every function runs against a [`FamilyGraph`] bound to a single
//! transaction; an `Err` from any step means nothing may be committed.

use std::{
  collections::{BTreeSet, HashMap},
  fmt,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error,
  family::Family,
  graph::FamilyGraph,
  person::Person,
  relation::{
    FamilyRole, RelationKind, Side, compose_relation, household_roles, infer_relation,
  },
  relationship::{NewRelationship, Relationship},
};


// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Why a pair was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotApplicable {
  /// At least one of the two people is not a member.
  NotMembers,
  /// The relationship kind does not imply a shared household.
  NotHousehold,
}

/// What [`consolidate_pair`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
  NotApplicable { reason: NotApplicable },
  AlreadyConsolidated,
  /// `person` joined the family the other party already had.
  Joined { person: Uuid },
  /// `absorbed` was merged into the resulting family and deleted.
  Merged { absorbed: Uuid, moved: usize },
  Created,
}

impl Action {
  /// Whether anyone's family pointer changed.
  pub fn changed_membership(&self) -> bool {
    matches!(self, Self::Joined { .. } | Self::Merged { .. } | Self::Created)
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotApplicable { reason: NotApplicable::NotMembers } => {
        f.write_str("relationship recorded; only members are grouped into families")
      }
      Self::NotApplicable { reason: NotApplicable::NotHousehold } => {
        f.write_str("relationship recorded; families left unchanged")
      }
      Self::AlreadyConsolidated => f.write_str("both people already share a family"),
      Self::Joined { .. } => f.write_str("added to the existing family"),
      Self::Merged { moved, .. } => {
        write!(f, "families merged; {moved} member(s) moved")
      }
      Self::Created => f.write_str("new family created"),
    }
  }
}

/// The structured result of [`consolidate_pair`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consolidation {
  pub action:    Action,
  /// The family both people now share, if any.
  pub family_id: Option<Uuid>,
  /// Assertions created by back-fill during this call.
  pub inferred:  usize,
}

impl Consolidation {
  fn not_applicable(reason: NotApplicable) -> Self {
    Self {
      action:    Action::NotApplicable { reason },
      family_id: None,
      inferred:  0,
    }
  }
}

/// The result of [`union_families`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union {
  pub survivor: Uuid,
  pub absorbed: Uuid,
  /// People moved from `absorbed` into `survivor`.
  pub moved:    Vec<Uuid>,
}

/// Aggregate counts reported by [`reconsolidate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconsolidationReport {
  pub relationships_created: usize,
  pub relationships_updated: usize,
  pub families_consolidated: usize,
}

// ─── Pair consolidation ──────────────────────────────────────────────────────

/// Ensure `a` and `b`, related as `kind` (what `b` is to `a`), share one
/// family and carry roles that reflect the relationship.
pub fn consolidate_pair<G: FamilyGraph>(
  graph: &mut G,
  a: Uuid,
  b: Uuid,
  kind: RelationKind,
) -> Result<Consolidation, G::Error> {
  if a == b {
    return Err(Error::SelfRelationship(a).into());
  }
  let person_a = load_person(graph, a)?;
  let person_b = load_person(graph, b)?;

  if !(person_a.kind.groups_into_families() && person_b.kind.groups_into_families()) {
    return Ok(Consolidation::not_applicable(NotApplicable::NotMembers));
  }
  let Some(roles) = household_roles(kind) else {
    return Ok(Consolidation::not_applicable(NotApplicable::NotHousehold));
  };

  let (action, family_id, joined) = match (person_a.family_id, person_b.family_id) {
    (Some(fa), Some(fb)) if fa == fb => {
      return Ok(Consolidation {
        action:    Action::AlreadyConsolidated,
        family_id: Some(fa),
        inferred:  0,
      });
    }
    (Some(fa), Some(fb)) => {
      let union = union_families(graph, fa, fb)?;
      let action = Action::Merged {
        absorbed: union.absorbed,
        moved:    union.moved.len(),
      };
      (action, union.survivor, union.moved)
    }
    (Some(family_id), None) => {
      graph.set_family(b, Some(family_id))?;
      debug!(person = %b, family = %family_id, "joined existing family");
      (Action::Joined { person: b }, family_id, vec![b])
    }
    (None, Some(family_id)) => {
      graph.set_family(a, Some(family_id))?;
      debug!(person = %a, family = %family_id, "joined existing family");
      (Action::Joined { person: a }, family_id, vec![a])
    }
    (None, None) => {
      let head = match roles.head {
        Side::A => &person_a,
        Side::B => &person_b,
      };
      let family = Family::founded_by(head);
      graph.insert_family(&family)?;
      graph.set_family(a, Some(family.family_id))?;
      graph.set_family(b, Some(family.family_id))?;
      info!(family = %family.family_id, surname = %family.surname, "created family");
      (Action::Created, family.family_id, vec![a, b])
    }
  };

  let mut relabelled = joined;
  for person_id in assign_roles(graph, family_id, a, b, kind)? {
    if !relabelled.contains(&person_id) {
      relabelled.push(person_id);
    }
  }

  let mut inferred = 0;
  for person_id in relabelled {
    inferred += backfill_relationships(graph, person_id, family_id)?;
  }

  Ok(Consolidation { action, family_id: Some(family_id), inferred })
}

/// Merge two families. The one with strictly more members survives; on a tie
/// `first` survives. Members of the absorbed family lose their roles, which
/// described them relative to the absorbed head.
pub fn union_families<G: FamilyGraph>(
  graph: &mut G,
  first: Uuid,
  second: Uuid,
) -> Result<Union, G::Error> {
  for family_id in [first, second] {
    if !graph.family_exists(family_id)? {
      return Err(Error::FamilyNotFound(family_id).into());
    }
  }
  if first == second {
    return Ok(Union { survivor: first, absorbed: second, moved: vec![] });
  }

  let first_count = graph.member_count(first)?;
  let second_count = graph.member_count(second)?;
  let (survivor, absorbed) = if second_count > first_count {
    (second, first)
  } else {
    (first, second)
  };

  let absorbed_members = graph.members(absorbed)?;
  graph.move_members(absorbed, survivor)?;
  for member in &absorbed_members {
    if member.family_role.is_some() {
      graph.set_role(member.person_id, None)?;
    }
  }
  graph.delete_family(absorbed)?;

  info!(
    %survivor,
    %absorbed,
    moved = absorbed_members.len(),
    "merged families"
  );

  Ok(Union {
    survivor,
    absorbed,
    moved: absorbed_members.into_iter().map(|p| p.person_id).collect(),
  })
}

/// Distribute roles for a household relationship inside `family_id` and
/// return the people whose role changed.
///
/// The head-side party becomes head unless someone else already is. If the
/// other party is the head, the head-side party is labelled relative to them.
/// If a third person heads the family, whichever party has no role is
/// labelled relative to that head through the one who does; when the chain
/// is ambiguous the role stays empty.
fn assign_roles<G: FamilyGraph>(
  graph: &mut G,
  family_id: Uuid,
  a: Uuid,
  b: Uuid,
  kind: RelationKind,
) -> Result<Vec<Uuid>, G::Error> {
  let Some(roles) = household_roles(kind) else {
    return Ok(vec![]);
  };
  // `toward_dependent` is what the head-side party is to the other one.
  let (head_side, dependent, toward_dependent) = match roles.head {
    Side::A => (a, b, kind.inverse()),
    Side::B => (b, a, kind),
  };

  let members = graph.members(family_id)?;
  let role_of = |id: Uuid| {
    members
      .iter()
      .find(|p| p.person_id == id)
      .and_then(|p| p.family_role)
  };
  let other_heads: Vec<Uuid> = members
    .iter()
    .filter(|p| p.person_id != head_side && p.family_role.is_some_and(FamilyRole::is_head))
    .map(|p| p.person_id)
    .collect();

  let mut wanted: Vec<(Uuid, FamilyRole)> = Vec::with_capacity(2);
  match other_heads.as_slice() {
    [] => {
      wanted.push((head_side, FamilyRole::Head));
      wanted.push((dependent, FamilyRole::Relative(roles.dependent)));
    }
    [head] if *head == dependent => {
      wanted.push((head_side, FamilyRole::Relative(toward_dependent)));
    }
    _ => match (role_of(head_side), role_of(dependent)) {
      (Some(FamilyRole::Relative(via)), None) => {
        if let Some(derived) = compose_relation(via, roles.dependent) {
          wanted.push((dependent, FamilyRole::Relative(derived)));
        }
      }
      (None, Some(FamilyRole::Relative(via))) => {
        if let Some(derived) = compose_relation(via, toward_dependent) {
          wanted.push((head_side, FamilyRole::Relative(derived)));
        }
      }
      _ => debug!(family = %family_id, "roles kept under the current head"),
    },
  }

  let mut changed = Vec::with_capacity(wanted.len());
  for (person_id, role) in wanted {
    if role_of(person_id) != Some(role) {
      graph.set_role(person_id, Some(role))?;
      changed.push(person_id);
    }
  }
  Ok(changed)
}

// ─── Relationship creation ───────────────────────────────────────────────────

/// Validate and record a new assertion, then consolidate its pair.
pub fn relate<G: FamilyGraph>(
  graph: &mut G,
  input: &NewRelationship,
) -> Result<(Relationship, Consolidation), G::Error> {
  if input.person_a == input.person_b {
    return Err(Error::SelfRelationship(input.person_a).into());
  }
  for (id, claimed) in [
    (input.person_a, input.person_a_kind),
    (input.person_b, input.person_b_kind),
  ] {
    let person = load_person(graph, id)?;
    if person.kind != claimed {
      return Err(
        Error::KindMismatch { person: id, expected: claimed, found: person.kind }
          .into(),
      );
    }
  }
  if graph
    .relationship_between(input.person_a, input.person_b)?
    .is_some()
  {
    return Err(Error::DuplicateRelationship(input.person_a, input.person_b).into());
  }

  let rel = Relationship::new(
    input.person_a,
    input.person_b,
    input.kind,
    input.context_family_id,
  );
  graph.insert_relationship(&rel)?;
  let outcome = consolidate_pair(graph, rel.person_a, rel.person_b, rel.kind)?;
  Ok((rel, outcome))
}

// ─── Back-fill ───────────────────────────────────────────────────────────────

/// Record the assertions implied between `person_id` and every other member
/// of `family_id`. Pairs without an inference-table entry, members without a
/// role, and pairs that already have an assertion are skipped. Returns the
/// number of assertions created.
pub fn backfill_relationships<G: FamilyGraph>(
  graph: &mut G,
  person_id: Uuid,
  family_id: Uuid,
) -> Result<usize, G::Error> {
  let person = load_person(graph, person_id)?;
  if person.family_id != Some(family_id) {
    return Ok(0);
  }
  let Some(role) = person.family_role else {
    return Ok(0);
  };

  let mut created = 0;
  for member in graph.members(family_id)? {
    if member.person_id == person_id {
      continue;
    }
    let Some(member_role) = member.family_role else {
      continue;
    };
    let Some(kind) = infer_relation(member_role, role) else {
      continue;
    };
    if graph.relationship_between(person_id, member.person_id)?.is_some() {
      continue;
    }

    let rel = Relationship::new(person_id, member.person_id, kind, Some(family_id));
    graph.insert_relationship(&rel)?;
    debug!(
      person = %person_id,
      member = %member.person_id,
      %kind,
      "inferred relationship"
    );
    created += 1;
  }
  Ok(created)
}

// ─── Re-consolidation ────────────────────────────────────────────────────────

/// Replay consolidation over every assertion (or those touching `scope`),
/// repairing drifted inverse labels, then back-fill every member of every
/// family touched along the way.
pub fn reconsolidate<G: FamilyGraph>(
  graph: &mut G,
  scope: Option<Uuid>,
) -> Result<ReconsolidationReport, G::Error> {
  if let Some(family_id) = scope
    && !graph.family_exists(family_id)?
  {
    return Err(Error::FamilyNotFound(family_id).into());
  }

  let mut report = ReconsolidationReport::default();
  let mut redirects = Redirects::default();
  let mut touched: BTreeSet<Uuid> = scope.into_iter().collect();

  for rel in graph.relationships(scope)? {
    if !rel.is_consistent() {
      graph.repair_relationship(&rel.repaired())?;
      report.relationships_updated += 1;
    }

    let outcome = consolidate_pair(graph, rel.person_a, rel.person_b, rel.kind)?;
    if let (Action::Merged { absorbed, .. }, Some(survivor)) =
      (&outcome.action, outcome.family_id)
    {
      redirects.record(*absorbed, survivor);
    }
    if outcome.action.changed_membership() {
      report.families_consolidated += 1;
    }
    report.relationships_created += outcome.inferred;
    touched.extend(outcome.family_id);
  }

  let families: BTreeSet<Uuid> =
    touched.into_iter().map(|id| redirects.find(id)).collect();
  for family_id in families {
    if !graph.family_exists(family_id)? {
      continue;
    }
    for member in graph.members(family_id)? {
      report.relationships_created +=
        backfill_relationships(graph, member.person_id, family_id)?;
    }
  }

  info!(
    scope = ?scope,
    created = report.relationships_created,
    updated = report.relationships_updated,
    consolidated = report.families_consolidated,
    "reconsolidation finished"
  );
  Ok(report)
}

/// Absorbed family → the family it was merged into. `find` follows the chain
/// to the current survivor and compresses it.
#[derive(Debug, Default)]
struct Redirects(HashMap<Uuid, Uuid>);

impl Redirects {
  fn record(&mut self, absorbed: Uuid, survivor: Uuid) {
    if absorbed != survivor {
      self.0.insert(absorbed, survivor);
    }
  }

  fn find(&mut self, family_id: Uuid) -> Uuid {
    let mut root = family_id;
    while let Some(&next) = self.0.get(&root) {
      root = next;
    }
    let mut current = family_id;
    while current != root {
      match self.0.insert(current, root) {
        Some(next) => current = next,
        None => break,
      }
    }
    root
  }
}

fn load_person<G: FamilyGraph>(graph: &mut G, id: Uuid) -> Result<Person, G::Error> {
  graph
    .person(id)?
    .ok_or_else(|| Error::PersonNotFound(id).into())
}
