//! The session state machine and the authentication seam.
//!
//! A [`Session`] is either anonymous or holds the authenticated
//! [`Identity`]. Moving from one to the other goes through an
//! [`Authenticator`]; [`StubAuthenticator`] accepts any well-formed
//! credentials and stands in until a real identity provider is wired up.

use std::{future::Future, time::Duration};

use strum::Display;
use thiserror::Error;

use crate::identity::{Identity, Role};

/// Which form the user submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AuthAction {
  #[strum(to_string = "Sign in")]
  Login,
  #[strum(to_string = "Register")]
  Register,
}

/// What the user typed on the login screen.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
  /// Required for [`AuthAction::Register`]; optional on login.
  pub name:     String,
  /// The role to act in for this session.
  pub role:     Role,
}

impl Credentials {
  /// Check that the fields required by `action` are filled in.
  pub fn check(&self, action: AuthAction) -> Result<(), AuthError> {
    if self.email.trim().is_empty() || self.password.is_empty() {
      return Err(AuthError::MissingCredentials);
    }
    if action == AuthAction::Register && self.name.trim().is_empty() {
      return Err(AuthError::MissingName);
    }
    Ok(())
  }

  /// The supplied name, or the local part of the email when none was given.
  pub fn display_name(&self) -> String {
    let name = self.name.trim();
    if !name.is_empty() {
      return name.to_owned();
    }
    let email = self.email.trim();
    match email.split('@').next() {
      Some(local) if !local.is_empty() => local.to_owned(),
      _ => email.to_owned(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("email and password are required")]
  MissingCredentials,

  #[error("a name is required to register")]
  MissingName,

  #[error("already signed in as {0}")]
  AlreadyAuthenticated(String),
}

// ─── Authenticator ───────────────────────────────────────────────────────────

/// Turns credentials into an identity, or refuses them.
pub trait Authenticator: Send + Sync {
  fn authenticate<'a>(
    &'a self,
    action: AuthAction,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<Identity, AuthError>> + Send + 'a;
}

/// Accepts any non-empty email and password (plus a name when registering)
/// after a fixed pause, and mints a fresh identity. No verification happens.
#[derive(Debug, Clone, Copy)]
pub struct StubAuthenticator {
  delay: Duration,
}

impl StubAuthenticator {
  pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

  pub fn new(delay: Duration) -> Self { Self { delay } }
}

impl Default for StubAuthenticator {
  fn default() -> Self { Self::new(Self::DEFAULT_DELAY) }
}

impl Authenticator for StubAuthenticator {
  async fn authenticate(
    &self,
    action: AuthAction,
    credentials: &Credentials,
  ) -> Result<Identity, AuthError> {
    credentials.check(action)?;
    tokio::time::sleep(self.delay).await;
    Ok(Identity::new(
      credentials.display_name(),
      credentials.email.trim(),
      credentials.role,
    ))
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// The current session. Never persisted; a restart starts anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
  #[default]
  Anonymous,
  Authenticated(Identity),
}

impl Session {
  pub fn identity(&self) -> Option<&Identity> {
    match self {
      Self::Authenticated(identity) => Some(identity),
      Self::Anonymous => None,
    }
  }

  pub fn is_authenticated(&self) -> bool { self.identity().is_some() }

  /// Anonymous → authenticated. Refused while a session is already open.
  pub async fn sign_in<A: Authenticator>(
    &mut self,
    auth: &A,
    action: AuthAction,
    credentials: &Credentials,
  ) -> Result<Identity, AuthError> {
    if let Some(current) = self.identity() {
      return Err(AuthError::AlreadyAuthenticated(current.name.clone()));
    }
    let identity = auth.authenticate(action, credentials).await?;
    *self = Self::Authenticated(identity.clone());
    Ok(identity)
  }

  /// Authenticated → anonymous, returning the discarded identity.
  pub fn logout(&mut self) -> Option<Identity> {
    match std::mem::take(self) {
      Self::Authenticated(identity) => Some(identity),
      Self::Anonymous => None,
    }
  }
}
