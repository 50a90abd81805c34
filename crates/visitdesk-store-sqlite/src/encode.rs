//! Encoding and decoding between the request collection and the text stored
//! in a `local_storage` slot.
//!
//! The snapshot is a compact JSON array of records with camelCase keys.
//! Timestamps are RFC 3339 strings, the visit date is `YYYY-MM-DD` and time
//! slots use their display form (`10h30`).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use visitdesk_core::request::{VisitRequest, check_headcount};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Snapshot ────────────────────────────────────────────────────────────────

pub fn encode_snapshot(requests: &[VisitRequest]) -> Result<String> {
  Ok(serde_json::to_string(requests)?)
}

/// Parse a snapshot and check the collection invariants: ids are unique and
/// every headcount is within `1..=MAX_PEOPLE`.
pub fn decode_snapshot(raw: &str) -> Result<Vec<VisitRequest>> {
  let requests: Vec<VisitRequest> = serde_json::from_str(raw)?;

  let mut seen = HashSet::with_capacity(requests.len());
  for request in &requests {
    if !seen.insert(request.id) {
      return Err(Error::Malformed(format!("duplicate request id {}", request.id)));
    }
    if let Err(e) = check_headcount(request.number_of_people) {
      return Err(Error::Malformed(format!("request {}: {e}", request.id)));
    }
  }

  Ok(requests)
}
