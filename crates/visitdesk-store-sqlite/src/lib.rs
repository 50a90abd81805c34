//! SQLite backend for the visitdesk request repository.
//!
//! The whole collection lives in memory and is mirrored, as one JSON
//! snapshot, into a single named slot of a key-value table. Database access
//! goes through [`tokio_rusqlite`] so it never blocks the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{DEFAULT_SLOT, SqliteStore};

#[cfg(test)]
mod tests;
