//! Read-only projections of the request collection.
//!
//! Views never own data; each one is a filter over the store's full
//! collection, recomputed on every read.

use strum::Display;

use crate::{
  identity::{Identity, Role},
  request::{RequestStatus, VisitRequest},
};

/// A filtered projection of the request collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum View {
  /// Requests owned by the viewer.
  #[strum(to_string = "My requests")]
  Mine,
  /// Requests still awaiting a decision.
  #[strum(to_string = "Pending")]
  Pending,
  /// Every request, unfiltered.
  #[strum(to_string = "All requests")]
  All,
}

impl View {
  /// The views a role may open, in tab order.
  pub fn for_role(role: Role) -> &'static [View] {
    match role {
      Role::Requester => &[View::Mine],
      Role::Approver => &[View::Pending, View::All],
    }
  }

  /// Whether `request` belongs in this view for `viewer`.
  pub fn includes(self, viewer: &Identity, request: &VisitRequest) -> bool {
    match self {
      View::Mine => request.requester_id == viewer.id,
      View::Pending => request.status.is_pending(),
      View::All => true,
    }
  }

  /// Filter `requests`, preserving their order.
  pub fn select<'a>(
    self,
    requests: &'a [VisitRequest],
    viewer: &Identity,
  ) -> Vec<&'a VisitRequest> {
    requests.iter().filter(|r| self.includes(viewer, r)).collect()
  }
}

/// Whether approve/reject should be offered for `request`.
///
/// Only approvers get the actions, only alongside the pending view, and only
/// while the request is still pending.
pub fn can_decide(viewer: &Identity, view: View, request: &VisitRequest) -> bool {
  viewer.is_approver() && view == View::Pending && request.status.is_pending()
}

/// Per-status totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
  pub pending:  usize,
  pub approved: usize,
  pub rejected: usize,
  pub total:    usize,
}

impl Stats {
  pub fn tally(requests: &[VisitRequest]) -> Self {
    requests.iter().fold(Self::default(), |mut stats, r| {
      match r.status {
        RequestStatus::Pending => stats.pending += 1,
        RequestStatus::Approved => stats.approved += 1,
        RequestStatus::Rejected => stats.rejected += 1,
      }
      stats.total += 1;
      stats
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::request::{Decision, Location, NewVisitRequest};

  fn request_for(owner: &Identity) -> VisitRequest {
    NewVisitRequest {
      requester_name:   owner.name.clone(),
      number_of_people: 3,
      visit_date:       NaiveDate::from_ymd_opt(2031, 6, 2).unwrap(),
      start_time:       "9h00".parse().unwrap(),
      end_time:         "12h00".parse().unwrap(),
      is_client:        false,
      client_number:    String::new(),
      needs_catering:   false,
      location:         Location::SiteB,
      delivery_time:    None,
      allergies:        String::new(),
      client_reference: String::new(),
      comments:         String::new(),
    }
    .into_request(Uuid::new_v4(), owner.id, Utc::now())
  }

  fn fixture() -> (Identity, Identity, Identity, Vec<VisitRequest>) {
    let alice = Identity::new("Alice", "alice@example.com", Role::Requester);
    let bob = Identity::new("Bob", "bob@example.com", Role::Requester);
    let vera = Identity::new("Vera", "vera@example.com", Role::Approver);

    let mut requests = vec![
      request_for(&alice),
      request_for(&bob),
      request_for(&alice),
      request_for(&bob),
    ];
    requests[1].decide(Decision::Approve).unwrap();
    requests[2].decide(Decision::Reject).unwrap();
    (alice, bob, vera, requests)
  }

  #[test]
  fn mine_views_are_disjoint_and_within_all() {
    let (alice, bob, _, requests) = fixture();

    let mine_a = View::Mine.select(&requests, &alice);
    let mine_b = View::Mine.select(&requests, &bob);
    let all = View::All.select(&requests, &alice);

    assert_eq!(mine_a.len(), 2);
    assert_eq!(mine_b.len(), 2);
    assert!(mine_a.iter().all(|a| mine_b.iter().all(|b| a.id != b.id)));
    assert!(mine_a.iter().all(|a| all.iter().any(|r| r.id == a.id)));
    assert_eq!(all.len(), requests.len());
  }

  #[test]
  fn pending_view_only_holds_pending() {
    let (_, _, vera, requests) = fixture();
    let pending = View::Pending.select(&requests, &vera);
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|r| r.status.is_pending()));
  }

  #[test]
  fn select_preserves_insertion_order() {
    let (alice, _, _, requests) = fixture();
    let ids: Vec<_> = View::Mine.select(&requests, &alice).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![requests[0].id, requests[2].id]);
  }

  #[test]
  fn actions_gated_by_role_view_and_status() {
    let (alice, _, vera, requests) = fixture();
    let pending = &requests[0];
    let approved = &requests[1];

    assert!(can_decide(&vera, View::Pending, pending));
    assert!(!can_decide(&vera, View::All, pending));
    assert!(!can_decide(&vera, View::Pending, approved));
    assert!(!can_decide(&alice, View::Pending, pending));
  }

  #[test]
  fn roles_see_their_own_tabs() {
    assert_eq!(View::for_role(Role::Requester), &[View::Mine]);
    assert_eq!(View::for_role(Role::Approver), &[View::Pending, View::All]);
  }

  #[test]
  fn stats_tally_by_status() {
    let (_, _, _, requests) = fixture();
    assert_eq!(
      Stats::tally(&requests),
      Stats { pending: 2, approved: 1, rejected: 1, total: 4 }
    );
    assert_eq!(Stats::tally(&[]), Stats::default());
  }
}
