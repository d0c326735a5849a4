//! SQLite backend for the Centavo bookkeeping store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Soft-delete filtering
//! (`deleted_at IS NULL`) is applied by every read and write path; writes
//! run in one transaction each.

mod encode;
mod error;
mod schema;
mod store;

pub use store::SqliteStore;

#[cfg(test)]
mod tests;
