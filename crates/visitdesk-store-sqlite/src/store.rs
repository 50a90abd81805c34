//! [`SqliteStore`]: the SQLite implementation of [`VisitStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::Mutex;
use uuid::Uuid;

use visitdesk_core::{
  request::{Decision, NewVisitRequest, VisitRequest},
  store::VisitStore,
};

use crate::{
  encode::{decode_snapshot, encode_dt, encode_snapshot},
  schema::SCHEMA,
  Error, Result,
};

/// Slot the collection is written to unless configured otherwise.
pub const DEFAULT_SLOT: &str = "visitRequests";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A visit request repository backed by one slot of a SQLite file.
///
/// The collection is held in memory and rewritten to the slot after every
/// mutation. Clones share the connection and the collection.
#[derive(Clone)]
pub struct SqliteStore {
  conn:     tokio_rusqlite::Connection,
  slot:     Arc<str>,
  /// Guarded across the snapshot write so mutations never interleave.
  requests: Arc<Mutex<Vec<VisitRequest>>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` using [`DEFAULT_SLOT`], and load the
  /// persisted collection.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_slot(path, DEFAULT_SLOT).await
  }

  /// Open (or create) a store at `path` that persists under `slot`.
  pub async fn open_slot(path: impl AsRef<Path>, slot: &str) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, slot).await
  }

  /// Open an in-memory store, used by the tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, DEFAULT_SLOT).await
  }

  async fn init(conn: tokio_rusqlite::Connection, slot: &str) -> Result<Self> {
    let store = Self {
      conn,
      slot: Arc::from(slot),
      requests: Arc::new(Mutex::new(Vec::new())),
    };
    store.init_schema().await?;
    store.load().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The slot key this store persists under.
  pub fn slot(&self) -> &str { &self.slot }

  /// Raw payload currently held in the slot, if any.
  pub(crate) async fn read_slot(&self) -> Result<Option<String>> {
    let key = self.slot.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get::<_, String>(0),
          )
          .optional()?)
      })
      .await?;

    Ok(raw)
  }

  /// Overwrite the slot with `value`.
  pub(crate) async fn write_slot(&self, value: String) -> Result<()> {
    let key    = self.slot.to_string();
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO local_storage (key, value, written_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE
             SET value = excluded.value, written_at = excluded.written_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  /// Serialise the full collection and overwrite the slot.
  async fn persist(&self, requests: &[VisitRequest]) -> Result<()> {
    let raw = encode_snapshot(requests)?;
    self.write_slot(raw).await
  }
}

// ─── VisitStore impl ─────────────────────────────────────────────────────────

impl VisitStore for SqliteStore {
  type Error = Error;

  async fn load(&self) -> Result<Vec<VisitRequest>> {
    let mut requests = self.requests.lock().await;

    let loaded = match self.read_slot().await? {
      None => Vec::new(),
      Some(raw) => match decode_snapshot(&raw) {
        Ok(loaded) => loaded,
        Err(e) => {
          tracing::warn!(slot = %self.slot, error = %e, "discarding malformed snapshot");
          Vec::new()
        }
      },
    };

    tracing::debug!(slot = %self.slot, count = loaded.len(), "loaded visit requests");
    *requests = loaded.clone();
    Ok(loaded)
  }

  async fn list(&self) -> Result<Vec<VisitRequest>> {
    Ok(self.requests.lock().await.clone())
  }

  async fn create(&self, requester_id: Uuid, input: NewVisitRequest) -> Result<VisitRequest> {
    input.check_headcount()?;

    let mut requests = self.requests.lock().await;

    let mut id = Uuid::new_v4();
    while requests.iter().any(|r| r.id == id) {
      id = Uuid::new_v4();
    }
    let request = input.into_request(id, requester_id, Utc::now());

    let mut next = requests.clone();
    next.push(request.clone());
    self.persist(&next).await?;
    *requests = next;

    tracing::info!(id = %request.id, requester = %requester_id, "visit request created");
    Ok(request)
  }

  async fn update_status(&self, id: Uuid, decision: Decision) -> Result<VisitRequest> {
    let mut requests = self.requests.lock().await;

    let index = requests
      .iter()
      .position(|r| r.id == id)
      .ok_or(visitdesk_core::Error::RequestNotFound(id))?;

    let mut next = requests.clone();
    let target = &mut next[index];
    target.decide(decision)?;
    let updated = target.clone();

    self.persist(&next).await?;
    *requests = next;

    tracing::info!(id = %id, %decision, status = %updated.status, "visit request decided");
    Ok(updated)
  }
}
