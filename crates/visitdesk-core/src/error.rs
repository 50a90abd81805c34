//! Error types for `visitdesk-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::request::RequestStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("visit request not found: {0}")]
  RequestNotFound(Uuid),

  #[error("visit request {id} is already {status}")]
  AlreadyResolved { id: Uuid, status: RequestStatus },

  #[error("number of people must be between 1 and {max}, got {got}")]
  InvalidHeadcount { got: u32, max: u32 },

  #[error("unknown time slot: {0:?}")]
  UnknownTimeSlot(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
