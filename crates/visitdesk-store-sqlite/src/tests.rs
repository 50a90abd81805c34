//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use chrono::{Days, NaiveDate, Utc};
use uuid::Uuid;
use visitdesk_core::{
  form::RequestForm,
  identity::{Identity, Role},
  request::{Decision, Location, NewVisitRequest, RequestStatus, TimeSlot},
  store::VisitStore,
  view::{Stats, View, can_decide},
};

use crate::{DEFAULT_SLOT, Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn slot(s: &str) -> TimeSlot { s.parse().unwrap() }

fn new_request(name: &str) -> NewVisitRequest {
  NewVisitRequest {
    requester_name:   name.into(),
    number_of_people: 2,
    visit_date:       NaiveDate::from_ymd_opt(2031, 3, 14).unwrap(),
    start_time:       slot("10h00"),
    end_time:         slot("11h00"),
    is_client:        false,
    client_number:    String::new(),
    needs_catering:   false,
    location:         Location::SiteA,
    delivery_time:    None,
    allergies:        String::new(),
    client_reference: String::new(),
    comments:         String::new(),
  }
}

// ─── Create & list ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_is_empty() {
  let s = store().await;
  assert!(s.list().await.unwrap().is_empty());
  assert!(s.load().await.unwrap().is_empty());
  assert_eq!(s.slot(), DEFAULT_SLOT);
}

#[tokio::test]
async fn create_assigns_store_fields() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let before = Utc::now();
  let request = s.create(owner, new_request("Alice")).await.unwrap();

  assert_eq!(request.status, RequestStatus::Pending);
  assert_eq!(request.requester_id, owner);
  assert!(request.created_at >= before);
  assert_eq!(s.list().await.unwrap(), vec![request]);
}

#[tokio::test]
async fn ids_are_unique_and_order_is_insertion_order() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let mut ids = Vec::new();
  for i in 0..10 {
    let r = s.create(owner, new_request(&format!("R{i}"))).await.unwrap();
    assert!(!ids.contains(&r.id));
    ids.push(r.id);
  }

  let listed: Vec<_> = s.list().await.unwrap().into_iter().map(|r| r.id).collect();
  assert_eq!(listed, ids);
}

#[tokio::test]
async fn create_rejects_empty_party() {
  let s = store().await;
  let mut input = new_request("Alice");
  input.number_of_people = 0;

  let err = s.create(Uuid::new_v4(), input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(visitdesk_core::Error::InvalidHeadcount { got: 0, .. })
  ));
  assert!(s.list().await.unwrap().is_empty());
  assert_eq!(s.read_slot().await.unwrap(), None);
}

// ─── Status transitions ──────────────────────────────────────────────────────

#[tokio::test]
async fn approve_then_reject_leaves_request_approved() {
  let s = store().await;
  let r = s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();

  let approved = s.update_status(r.id, Decision::Approve).await.unwrap();
  assert_eq!(approved.status, RequestStatus::Approved);
  assert_eq!(approved.created_at, r.created_at);
  assert_eq!(approved.requester_id, r.requester_id);

  let err = s.update_status(r.id, Decision::Reject).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(visitdesk_core::Error::AlreadyResolved {
      status: RequestStatus::Approved,
      ..
    })
  ));

  let stored = s.list().await.unwrap();
  assert_eq!(stored[0].status, RequestStatus::Approved);
  assert_eq!(s.load().await.unwrap()[0].status, RequestStatus::Approved);
}

#[tokio::test]
async fn reject_moves_pending_to_rejected() {
  let s = store().await;
  let r = s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();
  let rejected = s.update_status(r.id, Decision::Reject).await.unwrap();
  assert_eq!(rejected.status, RequestStatus::Rejected);
}

#[tokio::test]
async fn unknown_id_is_an_error_and_writes_nothing() {
  let s = store().await;
  s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();
  let snapshot = s.read_slot().await.unwrap();

  let missing = Uuid::new_v4();
  let err = s.update_status(missing, Decision::Approve).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(visitdesk_core::Error::RequestNotFound(id)) if id == missing
  ));
  assert_eq!(s.read_slot().await.unwrap(), snapshot);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_round_trips_through_a_reopen() {
  let dir = tempfile::tempdir().expect("tempdir");
  let path = dir.path().join("requests.db");
  let owner = Uuid::new_v4();

  let written = {
    let s = SqliteStore::open(&path).await.unwrap();
    let mut input = new_request("Alice");
    input.needs_catering = true;
    input.delivery_time = Some(slot("9h30"));
    input.allergies = "peanuts".into();
    let a = s.create(owner, input).await.unwrap();
    s.create(owner, new_request("Bob")).await.unwrap();
    s.update_status(a.id, Decision::Approve).await.unwrap();
    s.list().await.unwrap()
  };

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.list().await.unwrap(), written);
  assert_eq!(reopened.load().await.unwrap(), written);
}

#[tokio::test]
async fn every_mutation_rewrites_the_full_snapshot() {
  let s = store().await;
  let a = s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();
  s.create(Uuid::new_v4(), new_request("Bob")).await.unwrap();

  let raw = s.read_slot().await.unwrap().unwrap();
  let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
  let items = value.as_array().unwrap();
  assert_eq!(items.len(), 2);
  assert_eq!(items[0]["id"], a.id.to_string());
  assert_eq!(items[0]["visitDate"], "2031-03-14");
  assert_eq!(items[0]["startTime"], "10h00");
  assert_eq!(items[1]["requesterName"], "Bob");

  s.update_status(a.id, Decision::Reject).await.unwrap();
  let raw = s.read_slot().await.unwrap().unwrap();
  let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(value.as_array().unwrap().len(), 2);
  assert_eq!(value[0]["status"], "rejected");
}

#[tokio::test]
async fn malformed_snapshot_loads_as_empty() {
  let s = store().await;
  s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();

  s.write_slot("{not json".into()).await.unwrap();
  assert!(s.load().await.unwrap().is_empty());
  assert!(s.list().await.unwrap().is_empty());

  // The store stays usable and the next write replaces the bad payload.
  s.create(Uuid::new_v4(), new_request("Bob")).await.unwrap();
  assert_eq!(s.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn snapshot_with_duplicate_ids_loads_as_empty() {
  let s = store().await;
  let r = s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();

  let twice = serde_json::to_string(&[r.clone(), r]).unwrap();
  s.write_slot(twice).await.unwrap();
  assert!(s.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshot_with_oversized_party_loads_as_empty() {
  let s = store().await;
  let r = s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();

  let mut value = serde_json::to_value([r]).unwrap();
  value[0]["numberOfPeople"] = (visitdesk_core::request::MAX_PEOPLE + 1).into();
  s.write_slot(value.to_string()).await.unwrap();
  assert!(s.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshot_with_unknown_time_slot_loads_as_empty() {
  let s = store().await;
  let r = s.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();

  let mut value = serde_json::to_value([r]).unwrap();
  value[0]["endTime"] = "23h00".into();
  s.write_slot(value.to_string()).await.unwrap();
  assert!(s.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn slots_are_independent() {
  let dir = tempfile::tempdir().expect("tempdir");
  let path = dir.path().join("requests.db");
  let first = SqliteStore::open_slot(&path, "site-a").await.unwrap();
  let second = SqliteStore::open_slot(&path, "site-b").await.unwrap();

  first.create(Uuid::new_v4(), new_request("Alice")).await.unwrap();
  assert!(second.load().await.unwrap().is_empty());
  assert_eq!(first.load().await.unwrap().len(), 1);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn requester_submits_and_approver_approves() {
  let s = store().await;
  let alice = Identity::new("Alice", "alice@example.com", Role::Requester);
  let vera = Identity::new("Vera", "vera@example.com", Role::Approver);
  let today = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();

  // Alice fills in the form and submits.
  let mut form = RequestForm::new(alice.name.clone());
  form.set_number_of_people(2);
  form.set_visit_date(today.checked_add_days(Days::new(7)));
  form.set_start_time(Some(slot("10h00")));
  form.set_end_time(Some(slot("11h00")));
  form.set_location(Some(Location::SiteA));
  let request = form.submit_on(&s, alice.id, today).await.unwrap();

  let all = s.list().await.unwrap();
  let mine = View::Mine.select(&all, &alice);
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].status, RequestStatus::Pending);
  assert!(!mine[0].needs_catering && !mine[0].is_client);

  let pending = View::Pending.select(&all, &vera);
  assert_eq!(pending.len(), 1);
  assert!(can_decide(&vera, View::Pending, pending[0]));
  assert_eq!(Stats::tally(&all).pending, 1);

  // Vera approves.
  s.update_status(request.id, Decision::Approve).await.unwrap();

  let all = s.list().await.unwrap();
  assert!(View::Pending.select(&all, &vera).is_empty());
  let everything = View::All.select(&all, &vera);
  assert_eq!(everything.len(), 1);
  assert_eq!(everything[0].status, RequestStatus::Approved);
  assert_eq!(View::Mine.select(&all, &alice)[0].status, RequestStatus::Approved);
  assert_eq!(
    Stats::tally(&all),
    Stats { pending: 0, approved: 1, rejected: 0, total: 1 }
  );
}
