//! Core types and trait definitions for visitdesk.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! The store and TUI crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod form;
pub mod identity;
pub mod request;
pub mod session;
pub mod store;
pub mod view;

pub use error::{Error, Result};
