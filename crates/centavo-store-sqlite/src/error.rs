//! Translation of SQLite failures into the core error taxonomy.
//!
//! Domain errors decided on the connection thread (not-found during
//! reference resolution, for instance) must survive the trip back through
//! [`tokio_rusqlite`]; [`TxError`] keeps them apart from raw SQLite
//! failures until the caller can flatten both into `centavo_core::Error`.

use centavo_core::Error;
use thiserror::Error as ThisError;

/// Error raised inside a connection-thread closure.
#[derive(Debug, ThisError)]
pub(crate) enum TxError {
  #[error(transparent)]
  Domain(Error),

  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),
}

pub(crate) fn not_found(entity: &'static str, id: Option<i64>) -> TxError {
  TxError::Domain(Error::IdNotFound { entity, id })
}

/// Map a connection-level failure into the core taxonomy. Unique-index
/// violations keep their index name; everything else flattens to
/// [`Error::Storage`].
pub(crate) fn storage_error(e: tokio_rusqlite::Error) -> Error {
  match e {
    tokio_rusqlite::Error::Rusqlite(e) => sqlite_error(e),
    other => Error::Storage(other.to_string()),
  }
}

fn sqlite_error(e: rusqlite::Error) -> Error {
  if let rusqlite::Error::SqliteFailure(code, Some(message)) = &e {
    if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
      if let Some(index) = unique_index_name(message) {
        return Error::UniqueViolation { index };
      }
    }
  }
  Error::Storage(e.to_string())
}

/// SQLite reports unique failures as
/// `UNIQUE constraint failed: banks.code[, banks.other]`. Rebuild the
/// partial-index name (`banks_code_key`) the wire contract exposes.
fn unique_index_name(message: &str) -> Option<String> {
  let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
  let mut table = None;
  let mut names = Vec::new();
  for part in columns.split(", ") {
    let (t, column) = part.split_once('.')?;
    table.get_or_insert(t);
    names.push(column);
  }
  Some(format!("{}_{}_key", table?, names.join("_")))
}

#[cfg(test)]
mod tests {
  use super::unique_index_name;

  #[test]
  fn single_column_unique_message() {
    assert_eq!(
      unique_index_name("UNIQUE constraint failed: banks.code").as_deref(),
      Some("banks_code_key")
    );
  }

  #[test]
  fn multi_column_unique_message() {
    assert_eq!(
      unique_index_name("UNIQUE constraint failed: histories_tags.history_id, histories_tags.tag_id")
        .as_deref(),
      Some("histories_tags_history_id_tag_id_key")
    );
  }

  #[test]
  fn unrelated_message_is_ignored() {
    assert_eq!(unique_index_name("NOT NULL constraint failed: tags.name"), None);
  }
}
