//! The `VisitStore` trait: the visit request repository contract.
//!
//! The trait is implemented by storage backends (e.g.
//! `visitdesk-store-sqlite`). The form controller and the TUI depend on this
//! abstraction, never on a concrete backend or on ambient global state.

use std::future::Future;

use uuid::Uuid;

use crate::request::{Decision, NewVisitRequest, VisitRequest};

/// Abstraction over the visit request repository.
///
/// A store owns the in-memory collection and mirrors it to a persisted
/// snapshot. Every mutation rewrites the whole snapshot; the collection keeps
/// insertion order.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime.
pub trait VisitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Rehydrate the collection from the persisted snapshot and return it.
  ///
  /// Returns an empty collection when nothing is persisted. A malformed
  /// snapshot also yields an empty collection rather than an error.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Vec<VisitRequest>, Self::Error>> + Send + '_;

  /// The current in-memory collection, in insertion order.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<VisitRequest>, Self::Error>> + Send + '_;

  /// Append a new `pending` request owned by `requester_id` and persist the
  /// updated collection. The id and `created_at` are set by the store.
  fn create(
    &self,
    requester_id: Uuid,
    input: NewVisitRequest,
  ) -> impl Future<Output = Result<VisitRequest, Self::Error>> + Send + '_;

  /// Apply `decision` to the pending request `id` and persist.
  ///
  /// Returns an error, and changes nothing, if `id` is unknown or the
  /// request has already been approved or rejected.
  fn update_status(
    &self,
    id: Uuid,
    decision: Decision,
  ) -> impl Future<Output = Result<VisitRequest, Self::Error>> + Send + '_;
}
