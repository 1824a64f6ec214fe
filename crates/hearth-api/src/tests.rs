use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Method, Request, StatusCode},
};
use hearth_core::{
  consolidate::{Action, ReconsolidationReport},
  family::FamilyView,
  person::Person,
  relationship::Relationship,
};
use hearth_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{api_router, relationships::Created};

// ─── Fixtures ────────────────────────────────────────────────────────────────

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(v) => builder
      .header("content-type", "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  (status, bytes.to_vec())
}

async fn add_member(app: &Router, given: &str, family: &str) -> Person {
  let (status, body) = send(
    app,
    Method::POST,
    "/people",
    Some(json!({ "kind": "member", "given_name": given, "family_name": family })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  serde_json::from_slice(&body).unwrap()
}

fn assertion(a: &Person, b: &Person, kind: &str) -> Value {
  json!({
    "person_a": a.person_id,
    "person_a_kind": a.kind,
    "person_b": b.person_id,
    "person_b_kind": b.kind,
    "kind": kind,
  })
}

async fn relate(app: &Router, a: &Person, b: &Person, kind: &str) -> Created {
  let (status, body) =
    send(app, Method::POST, "/relationships", Some(assertion(a, b, kind))).await;
  assert_eq!(status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&body));
  serde_json::from_slice(&body).unwrap()
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_person() {
  let app = app().await;
  let ana = add_member(&app, "Ana", "Pérez").await;

  let (status, body) =
    send(&app, Method::GET, &format!("/people/{}", ana.person_id), None).await;
  assert_eq!(status, StatusCode::OK);
  let fetched: Person = serde_json::from_slice(&body).unwrap();
  assert_eq!(fetched, ana);
  assert!(fetched.family_id.is_none());
}

#[tokio::test]
async fn blank_names_are_rejected() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/people",
    Some(json!({ "kind": "member", "given_name": " ", "family_name": "Pérez" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_person_is_404() {
  let app = app().await;
  let (status, body) =
    send(&app, Method::GET, &format!("/people/{}", Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let err: Value = serde_json::from_slice(&body).unwrap();
  assert!(err["error"].is_string());
}

#[tokio::test]
async fn patch_person_updates_identity() {
  let app = app().await;
  let ana = add_member(&app, "Ana", "Pérez").await;

  let (status, body) = send(
    &app,
    Method::PATCH,
    &format!("/people/{}", ana.person_id),
    Some(json!({ "phone": "555-0101" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let updated: Person = serde_json::from_slice(&body).unwrap();
  assert_eq!(updated.phone.as_deref(), Some("555-0101"));
  assert_eq!(updated.given_name, "Ana");
}

#[tokio::test]
async fn list_people_filters_by_kind() {
  let app = app().await;
  add_member(&app, "Ana", "Pérez").await;
  send(
    &app,
    Method::POST,
    "/people",
    Some(json!({ "kind": "visitor", "given_name": "Luis", "family_name": "Gómez" })),
  )
  .await;

  let (status, body) = send(&app, Method::GET, "/people?kind=visitor", None).await;
  assert_eq!(status, StatusCode::OK);
  let people: Vec<Person> = serde_json::from_slice(&body).unwrap();
  assert_eq!(people.len(), 1);
  assert_eq!(people[0].given_name, "Luis");
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn spouse_assertion_creates_family() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let maria = add_member(&app, "María", "López").await;

  let created = relate(&app, &juan, &maria, "Esposo/a").await;
  assert_eq!(created.consolidation.action, Action::Created);
  assert!(!created.message.is_empty());
  let family_id = created.consolidation.family_id.unwrap();

  let (status, body) =
    send(&app, Method::GET, &format!("/families/{family_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let view: FamilyView = serde_json::from_slice(&body).unwrap();
  assert_eq!(view.members.len(), 2);
  assert_eq!(view.family.member_count, 2);

  let (_, body) = send(
    &app,
    Method::GET,
    &format!("/relationships?person_id={}", maria.person_id),
    None,
  )
  .await;
  let rels: Vec<Relationship> = serde_json::from_slice(&body).unwrap();
  assert_eq!(rels.len(), 1);
}

#[tokio::test]
async fn duplicate_assertion_is_409() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let maria = add_member(&app, "María", "López").await;
  relate(&app, &juan, &maria, "Esposo/a").await;

  let (status, _) = send(
    &app,
    Method::POST,
    "/relationships",
    Some(assertion(&maria, &juan, "Esposo/a")),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn self_assertion_is_400() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/relationships",
    Some(assertion(&juan, &juan, "Hermano/a")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_kind_label_is_400() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let maria = add_member(&app, "María", "López").await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/relationships",
    Some(assertion(&juan, &maria, "Compadre")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let err: Value = serde_json::from_slice(&body).unwrap();
  assert!(err["error"].as_str().unwrap().contains("Compadre"));

  let (_, body) = send(
    &app,
    Method::GET,
    &format!("/relationships?person_id={}", juan.person_id),
    None,
  )
  .await;
  let rels: Vec<Relationship> = serde_json::from_slice(&body).unwrap();
  assert!(rels.is_empty());
}

#[tokio::test]
async fn malformed_body_is_400() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/people",
    Some(json!({ "kind": "member" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let err: Value = serde_json::from_slice(&body).unwrap();
  assert!(err["error"].is_string());
}

#[tokio::test]
async fn delete_relationship_leaves_family() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let maria = add_member(&app, "María", "López").await;
  let created = relate(&app, &juan, &maria, "Esposo/a").await;
  let id = created.relationship.relationship_id;

  let (status, _) =
    send(&app, Method::DELETE, &format!("/relationships/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) =
    send(&app, Method::GET, &format!("/relationships/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, body) =
    send(&app, Method::GET, &format!("/people/{}", maria.person_id), None).await;
  let maria: Person = serde_json::from_slice(&body).unwrap();
  assert_eq!(maria.family_id, created.consolidation.family_id);
}

// ─── Families ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_family_details() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let maria = add_member(&app, "María", "López").await;
  let family_id = relate(&app, &juan, &maria, "Esposo/a")
    .await
    .consolidation
    .family_id
    .unwrap();

  let (status, body) = send(
    &app,
    Method::PATCH,
    &format!("/families/{family_id}"),
    Some(json!({ "notes": "Grupo de hogar los martes" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let family: Value = serde_json::from_slice(&body).unwrap();
  assert_eq!(family["notes"], "Grupo de hogar los martes");
}

// ─── Consolidate ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn consolidate_requires_confirmation() {
  let app = app().await;
  let (status, _) =
    send(&app, Method::POST, "/consolidate", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn consolidate_on_consistent_registry_is_a_no_op() {
  let app = app().await;
  let juan = add_member(&app, "Juan", "Pérez").await;
  let maria = add_member(&app, "María", "López").await;
  relate(&app, &juan, &maria, "Esposo/a").await;

  let (status, body) =
    send(&app, Method::POST, "/consolidate", Some(json!({ "confirm": true }))).await;
  assert_eq!(status, StatusCode::OK);
  let report: ReconsolidationReport = serde_json::from_slice(&body).unwrap();
  assert_eq!(report, ReconsolidationReport::default());
}

#[tokio::test]
async fn consolidate_unknown_family_is_404() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/consolidate",
    Some(json!({ "family_id": Uuid::new_v4(), "confirm": true })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
