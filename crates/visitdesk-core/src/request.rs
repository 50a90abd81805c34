//! Visit requests, the one record type the repository owns.
//!
//! A request is created once, from a validated draft, and afterwards changes
//! exactly once: a single status transition out of `pending`. Requests are
//! never deleted.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::{Error, Result};

/// Largest party a single request may bring.
pub const MAX_PEOPLE: u32 = 50;

/// Reject a headcount outside `1..=MAX_PEOPLE`.
pub fn check_headcount(number_of_people: u32) -> Result<()> {
  if (1..=MAX_PEOPLE).contains(&number_of_people) {
    Ok(())
  } else {
    Err(Error::InvalidHeadcount { got: number_of_people, max: MAX_PEOPLE })
  }
}

// ─── Time slots ──────────────────────────────────────────────────────────────

/// A half-hour slot from the fixed vocabulary `8h00` through `19h30`.
///
/// Serialised as its display form, e.g. `"10h30"`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
  /// Minutes since midnight; always on a slot boundary.
  minutes: u16,
}

impl TimeSlot {
  const FIRST: u16 = 8 * 60;
  const LAST: u16 = 19 * 60 + 30;
  const STEP: u16 = 30;

  /// The slot starting at `hour:minute`, if it is part of the vocabulary.
  pub fn new(hour: u16, minute: u16) -> Option<Self> {
    let minutes = hour.checked_mul(60)?.checked_add(minute)?;
    let in_range = (Self::FIRST..=Self::LAST).contains(&minutes);
    (minute < 60 && in_range && minutes % Self::STEP == 0).then_some(Self { minutes })
  }

  /// Every slot in the vocabulary, earliest first.
  pub fn all() -> impl Iterator<Item = Self> {
    (Self::FIRST..=Self::LAST)
      .step_by(Self::STEP as usize)
      .map(|minutes| Self { minutes })
  }

  pub fn first() -> Self { Self { minutes: Self::FIRST } }

  pub fn hour(self) -> u16 { self.minutes / 60 }

  pub fn minute(self) -> u16 { self.minutes % 60 }

  /// The following slot, or `None` after `19h30`.
  pub fn next(self) -> Option<Self> {
    let minutes = self.minutes + Self::STEP;
    (minutes <= Self::LAST).then_some(Self { minutes })
  }

  /// The preceding slot, or `None` before `8h00`.
  pub fn prev(self) -> Option<Self> {
    let minutes = self.minutes.checked_sub(Self::STEP)?;
    (minutes >= Self::FIRST).then_some(Self { minutes })
  }
}

impl fmt::Display for TimeSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}h{:02}", self.hour(), self.minute())
  }
}

impl FromStr for TimeSlot {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let unknown = || Error::UnknownTimeSlot(s.to_owned());
    let (hour, minute) = s.trim().split_once('h').ok_or_else(unknown)?;
    let hour: u16 = hour.parse().map_err(|_| unknown())?;
    let minute: u16 = minute.parse().map_err(|_| unknown())?;
    Self::new(hour, minute).ok_or_else(unknown)
  }
}

impl TryFrom<String> for TimeSlot {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<TimeSlot> for String {
  fn from(slot: TimeSlot) -> Self { slot.to_string() }
}

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Which site the visit takes place at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Location {
  #[strum(to_string = "Site A")]
  SiteA,
  #[strum(to_string = "Site B")]
  SiteB,
}

/// Where a request is in its lifecycle.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl RequestStatus {
  pub fn is_pending(self) -> bool { matches!(self, Self::Pending) }
}

/// An approver's verdict on a pending request. The only way a status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
  Approve,
  Reject,
}

impl Decision {
  /// The status a pending request moves to under this decision.
  pub fn status(self) -> RequestStatus {
    match self {
      Self::Approve => RequestStatus::Approved,
      Self::Reject => RequestStatus::Rejected,
    }
  }
}

// ─── VisitRequest ────────────────────────────────────────────────────────────

/// A submitted visit request.
///
/// `id`, `created_at` and `requester_id` are assigned by the store and never
/// change; `status` changes at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
  pub id:               Uuid,
  pub requester_name:   String,
  pub number_of_people: u32,
  pub visit_date:       NaiveDate,
  pub start_time:       TimeSlot,
  pub end_time:         TimeSlot,
  pub is_client:        bool,
  /// Only meaningful when `is_client` is set.
  pub client_number:    String,
  pub needs_catering:   bool,
  pub location:         Location,
  /// Only meaningful when `needs_catering` is set.
  pub delivery_time:    Option<TimeSlot>,
  pub allergies:        String,
  pub client_reference: String,
  pub comments:         String,
  pub status:           RequestStatus,
  pub created_at:       DateTime<Utc>,
  pub requester_id:     Uuid,
}

impl VisitRequest {
  /// Apply an approver's decision.
  ///
  /// Fails with [`Error::AlreadyResolved`] unless the request is still
  /// pending; the request is left untouched in that case.
  pub fn decide(&mut self, decision: Decision) -> Result<()> {
    if !self.status.is_pending() {
      return Err(Error::AlreadyResolved { id: self.id, status: self.status });
    }
    self.status = decision.status();
    Ok(())
  }
}

// ─── NewVisitRequest ─────────────────────────────────────────────────────────

/// Input to [`crate::store::VisitStore::create`], produced by a validated
/// [`crate::form::RequestForm`]. Identity, ownership and timestamps are
/// always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisitRequest {
  pub requester_name:   String,
  pub number_of_people: u32,
  pub visit_date:       NaiveDate,
  pub start_time:       TimeSlot,
  pub end_time:         TimeSlot,
  pub is_client:        bool,
  pub client_number:    String,
  pub needs_catering:   bool,
  pub location:         Location,
  pub delivery_time:    Option<TimeSlot>,
  pub allergies:        String,
  pub client_reference: String,
  pub comments:         String,
}

impl NewVisitRequest {
  pub fn check_headcount(&self) -> Result<()> { check_headcount(self.number_of_people) }

  /// Build the stored record: a fresh `pending` request owned by
  /// `requester_id`.
  pub fn into_request(
    self,
    id: Uuid,
    requester_id: Uuid,
    created_at: DateTime<Utc>,
  ) -> VisitRequest {
    VisitRequest {
      id,
      requester_name: self.requester_name,
      number_of_people: self.number_of_people,
      visit_date: self.visit_date,
      start_time: self.start_time,
      end_time: self.end_time,
      is_client: self.is_client,
      client_number: self.client_number,
      needs_catering: self.needs_catering,
      location: self.location,
      delivery_time: self.delivery_time,
      allergies: self.allergies,
      client_reference: self.client_reference,
      comments: self.comments,
      status: RequestStatus::Pending,
      created_at,
      requester_id,
    }
  }
}
