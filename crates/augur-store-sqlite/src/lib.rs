//! SQLite backend for the augur person store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Each store operation is a
//! single `call` unit, which also gives it the transactional boundary the
//! rest of the system assumes.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqlitePersonStore;
