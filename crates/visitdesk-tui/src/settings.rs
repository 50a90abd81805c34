//! Runtime settings, layered from an optional TOML file and `VISITDESK_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;
use visitdesk_store_sqlite::DEFAULT_SLOT;

use crate::Args;

const ENV_PREFIX: &str = "VISITDESK";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite file holding the request snapshot.
  pub store_path:     PathBuf,
  /// Key of the slot the snapshot is written to.
  pub slot:           String,
  /// Pause before a sign-in completes.
  pub login_delay_ms: u64,
  /// Where log lines go; the terminal belongs to the UI.
  pub log_file:       PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:     PathBuf::from("visitdesk.db"),
      slot:           DEFAULT_SLOT.to_string(),
      login_delay_ms: 1000,
      log_file:       PathBuf::from("visitdesk.log"),
    }
  }
}

impl Settings {
  /// Read `file` (if given) and then the environment, later sources winning.
  pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
    Self::load_with_env(file, config::Environment::with_prefix(ENV_PREFIX))
  }

  fn load_with_env(file: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
    }

    builder
      .add_source(env.try_parsing(true))
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// Apply command-line flags, which win over every other source.
  pub fn apply_args(&mut self, args: &Args) {
    if let Some(store) = &args.store {
      self.store_path = store.clone();
    }
    if let Some(slot) = &args.slot {
      self.slot = slot.clone();
    }
  }

  pub fn login_delay(&self) -> Duration { Duration::from_millis(self.login_delay_ms) }
}
