//! Who is acting in the current session.
//!
//! An identity is synthesised at login time and lives only as long as the
//! session. It is never persisted.

use strum::Display;
use uuid::Uuid;

/// The role an identity acts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Role {
  /// Creates visit requests.
  #[default]
  #[strum(to_string = "Requester")]
  Requester,
  /// Accepts or rejects pending visit requests.
  #[strum(to_string = "Approver")]
  Approver,
}

/// The authenticated user of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub id:    Uuid,
  /// Display name; pre-fills the requester name of new drafts.
  pub name:  String,
  pub email: String,
  pub role:  Role,
}

impl Identity {
  /// Build an identity with a freshly generated id.
  pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
    Self {
      id: Uuid::new_v4(),
      name: name.into(),
      email: email.into(),
      role,
    }
  }

  pub fn is_approver(&self) -> bool { self.role == Role::Approver }
}
