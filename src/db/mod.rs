//! Persistent storage for accounts.
//!
//! Layout:
//! - `models.rs`: row struct plus the validated insert / patch inputs
//! - `schema.rs`: SQL DDL applied at startup (SQLite)
//! - `sqlite.rs`: `AccountsStorage`, one atomic statement per operation

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Account, AccountPatch, NewAccount};
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountsStorage, SqlitePool};
