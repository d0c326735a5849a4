//! Error types for `centavo-core`.

use thiserror::Error;

/// The closed taxonomy every store operation reports through. The HTTP layer
/// maps each variant to exactly one wire shape, so no raw storage error ever
/// reaches a client.
#[derive(Debug, Error)]
pub enum Error {
  /// A primary or referenced entity id did not resolve to a live
  /// (non-deleted) row. `id` is `None` when a nested reference object was
  /// supplied without an id.
  #[error("{entity} not found: {id:?}")]
  IdNotFound {
    entity: &'static str,
    id:     Option<i64>,
  },

  /// A unique index rejected a write. `index` is the store-side index name
  /// (e.g. `banks_code_key`) and is part of the wire contract.
  #[error("unique constraint violated: {index}")]
  UniqueViolation { index: String },

  /// Any other storage failure, flattened to its message.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
