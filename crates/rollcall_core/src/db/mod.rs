//! SQLite bootstrap for the persistent key-value store.
//!
//! Connections opened here are handed to `SqliteKvStore`; failures surface
//! as `StoreError` like every other backend failure.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No key-value reads or writes happen before migrations succeed.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
