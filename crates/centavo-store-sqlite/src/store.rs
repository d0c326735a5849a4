//! [`SqliteStore`] — the SQLite implementation of [`FinanceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use centavo_core::{
  Result,
  account::{Account, NewAccount},
  bank::{Bank, NewBank},
  history::{History, HistoryListItem, NewHistory},
  provision::{NewProvision, Provision},
  store::{EntityRef, FinanceStore, ListQuery},
  tag::{NewTag, Tag},
};

use crate::{
  encode::{
    RawAccount, RawAccountSummary, RawBank, RawHistory, RawHistoryListItem,
    RawProvision, RawTag, encode_account_type, encode_dt,
  },
  error::{TxError, not_found, storage_error},
  schema::SCHEMA,
};

type TxResult<T> = std::result::Result<T, TxError>;

// ─── Entity metadata ─────────────────────────────────────────────────────────

/// Per-entity metadata driving the generic query helpers — one const per
/// table instead of one repository subclass per entity.
struct Table {
  /// SQL table name.
  name:   &'static str,
  /// Type name used in not-found errors; part of the wire contract.
  entity: &'static str,
  /// Search predicate for unaliased queries; `?1` is the lower-cased
  /// `%term%` pattern.
  search: &'static str,
}

const BANKS: Table = Table {
  name:   "banks",
  entity: "Bank",
  search: "(LOWER(code) LIKE ?1 OR LOWER(name) LIKE ?1)",
};

const ACCOUNTS: Table = Table {
  name:   "accounts",
  entity: "Account",
  search: "LOWER(name) LIKE ?1",
};

const HISTORIES: Table = Table {
  name:   "histories",
  entity: "History",
  search: "LOWER(name) LIKE ?1",
};

const PROVISIONS: Table = Table {
  name:   "provisions",
  entity: "Provision",
  search: "LOWER(name) LIKE ?1",
};

const TAGS: Table = Table {
  name:   "tags",
  entity: "Tag",
  search: "LOWER(name) LIKE ?1",
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A bookkeeping store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(storage_error)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(storage_error)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(storage_error)
  }

  /// Run a read closure on the connection thread. Domain errors raised
  /// inside the closure come back intact; SQLite failures are translated
  /// into the core taxonomy.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> TxResult<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| match f(conn) {
        Ok(value) => Ok(Ok(value)),
        Err(TxError::Domain(e)) => Ok(Err(e)),
        Err(TxError::Sqlite(e)) => Err(e.into()),
      })
      .await
      .map_err(storage_error)?
  }

  /// Run a write closure inside a single transaction. Reference resolution
  /// and persistence share the transaction, so any failure — domain or
  /// SQLite — rolls the whole write back.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction) -> TxResult<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match f(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          // Dropping the transaction rolls it back.
          Err(TxError::Domain(e)) => Ok(Err(e)),
          Err(TxError::Sqlite(e)) => Err(e.into()),
        }
      })
      .await
      .map_err(storage_error)?
  }
}

// ─── Generic query helpers ───────────────────────────────────────────────────

/// `%term%` lower-cased, or `None` when the term is blank — a blank term
/// applies no filter.
fn like_pattern(term: Option<&str>) -> Option<String> {
  term
    .filter(|t| !t.trim().is_empty())
    .map(|t| format!("%{}%", t.to_lowercase()))
}

fn count_rows(conn: &Connection, table: &Table, term: Option<&str>) -> TxResult<i64> {
  let count = match like_pattern(term) {
    Some(pattern) => conn.query_row(
      &format!(
        "SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL AND {}",
        table.name, table.search
      ),
      params![pattern],
      |row| row.get(0),
    )?,
    None => conn.query_row(
      &format!("SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL", table.name),
      [],
      |row| row.get(0),
    )?,
  };
  Ok(count)
}

/// Soft delete a live row. Zero rows touched means the id is unknown or the
/// row is already deleted — both surface as not-found.
fn soft_delete_row(conn: &Connection, table: &Table, id: i64) -> TxResult<()> {
  let changed = conn.execute(
    &format!(
      "UPDATE {} SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
      table.name
    ),
    params![encode_dt(Utc::now()), id],
  )?;
  if changed == 0 {
    return Err(not_found(table.entity, Some(id)));
  }
  Ok(())
}

/// Resolve a nested reference with the contract's tri-state semantics:
/// absent clears the relation, an id-less object is not-found with a null
/// id, and a present id must fetch a live row.
fn resolve_ref<T>(
  reference: Option<EntityRef>,
  entity: &'static str,
  fetch: impl FnOnce(i64) -> TxResult<Option<T>>,
) -> TxResult<Option<T>> {
  match reference {
    None => Ok(None),
    Some(EntityRef { id: None }) => Err(not_found(entity, None)),
    Some(EntityRef { id: Some(id) }) => match fetch(id)? {
      Some(found) => Ok(Some(found)),
      None => Err(not_found(entity, Some(id))),
    },
  }
}

/// Pagination bindings: zero-based page index → LIMIT/OFFSET.
fn page_bounds(query: &ListQuery) -> (i64, i64) {
  let limit = i64::from(query.size);
  (limit, i64::from(query.page) * limit)
}

// ─── Banks ───────────────────────────────────────────────────────────────────

const BANK_COLUMNS: &str = "id, created_at, updated_at, code, name";

fn bank_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawBank> {
  Ok(RawBank {
    id:         row.get(0)?,
    created_at: row.get(1)?,
    updated_at: row.get(2)?,
    code:       row.get(3)?,
    name:       row.get(4)?,
  })
}

fn fetch_bank(conn: &Connection, id: i64) -> TxResult<Option<Bank>> {
  let raw = conn
    .query_row(
      &format!("SELECT {BANK_COLUMNS} FROM banks WHERE id = ?1 AND deleted_at IS NULL"),
      params![id],
      bank_from_row,
    )
    .optional()?;
  raw
    .map(|r| r.into_bank().map_err(TxError::Domain))
    .transpose()
}

fn list_bank_rows(conn: &Connection, query: &ListQuery) -> TxResult<Vec<Bank>> {
  let pattern = like_pattern(query.term.as_deref());
  let filter = match pattern {
    Some(_) => format!("deleted_at IS NULL AND {}", BANKS.search),
    None => "deleted_at IS NULL".to_string(),
  };
  let sql = format!(
    "SELECT {BANK_COLUMNS} FROM banks WHERE {filter} ORDER BY id LIMIT ?2 OFFSET ?3"
  );
  let (limit, offset) = page_bounds(query);

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![pattern, limit, offset], bank_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_bank().map_err(TxError::Domain))
    .collect()
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// Joined select: the owning bank rides along, filtered by its own
/// soft-delete marker so a deleted bank reads back as no bank at all.
const ACCOUNT_SELECT: &str = "SELECT a.id, a.created_at, a.updated_at, a.name, a.account_type, \
   a.branch, a.account_number, a.credit_limit, \
   b.id, b.created_at, b.updated_at, b.code, b.name \
   FROM accounts a \
   LEFT JOIN banks b ON b.id = a.bank_id AND b.deleted_at IS NULL";

fn account_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawAccount> {
  let bank = match row.get::<_, Option<i64>>(8)? {
    Some(id) => Some(RawBank {
      id,
      created_at: row.get(9)?,
      updated_at: row.get(10)?,
      code: row.get(11)?,
      name: row.get(12)?,
    }),
    None => None,
  };
  Ok(RawAccount {
    id:           row.get(0)?,
    created_at:   row.get(1)?,
    updated_at:   row.get(2)?,
    name:         row.get(3)?,
    account_type: row.get(4)?,
    branch:       row.get(5)?,
    number:       row.get(6)?,
    credit_limit: row.get(7)?,
    bank,
  })
}

fn fetch_account(conn: &Connection, id: i64) -> TxResult<Option<Account>> {
  let raw = conn
    .query_row(
      &format!("{ACCOUNT_SELECT} WHERE a.id = ?1 AND a.deleted_at IS NULL"),
      params![id],
      account_from_row,
    )
    .optional()?;
  raw
    .map(|r| r.into_account().map_err(TxError::Domain))
    .transpose()
}

fn list_account_rows(conn: &Connection, query: &ListQuery) -> TxResult<Vec<Account>> {
  let pattern = like_pattern(query.term.as_deref());
  let filter = match pattern {
    Some(_) => "a.deleted_at IS NULL AND LOWER(a.name) LIKE ?1",
    None => "a.deleted_at IS NULL",
  };
  let sql =
    format!("{ACCOUNT_SELECT} WHERE {filter} ORDER BY a.id LIMIT ?2 OFFSET ?3");
  let (limit, offset) = page_bounds(query);

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![pattern, limit, offset], account_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_account().map_err(TxError::Domain))
    .collect()
}

// ─── Histories ───────────────────────────────────────────────────────────────

const HISTORY_SELECT: &str = "SELECT h.id, h.created_at, h.updated_at, h.name, h.payment_date, h.amount, \
   a.id, a.created_at, a.updated_at, a.name, a.account_type, \
   a.branch, a.account_number, a.credit_limit, \
   b.id, b.created_at, b.updated_at, b.code, b.name \
   FROM histories h \
   LEFT JOIN accounts a ON a.id = h.account_id AND a.deleted_at IS NULL \
   LEFT JOIN banks b ON b.id = a.bank_id AND b.deleted_at IS NULL";

fn history_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawHistory> {
  let account = match row.get::<_, Option<i64>>(6)? {
    Some(id) => {
      let bank = match row.get::<_, Option<i64>>(14)? {
        Some(bank_id) => Some(RawBank {
          id:         bank_id,
          created_at: row.get(15)?,
          updated_at: row.get(16)?,
          code:       row.get(17)?,
          name:       row.get(18)?,
        }),
        None => None,
      };
      Some(RawAccount {
        id,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        name: row.get(9)?,
        account_type: row.get(10)?,
        branch: row.get(11)?,
        number: row.get(12)?,
        credit_limit: row.get(13)?,
        bank,
      })
    }
    None => None,
  };
  Ok(RawHistory {
    id:           row.get(0)?,
    created_at:   row.get(1)?,
    updated_at:   row.get(2)?,
    name:         row.get(3)?,
    payment_date: row.get(4)?,
    amount:       row.get(5)?,
    account,
  })
}

fn fetch_history(conn: &Connection, id: i64) -> TxResult<Option<History>> {
  let raw = conn
    .query_row(
      &format!("{HISTORY_SELECT} WHERE h.id = ?1 AND h.deleted_at IS NULL"),
      params![id],
      history_from_row,
    )
    .optional()?;
  match raw {
    None => Ok(None),
    Some(raw) => {
      let tags = history_tag_rows(conn, id)?;
      Ok(Some(raw.into_history(tags).map_err(TxError::Domain)?))
    }
  }
}

fn history_tag_rows(conn: &Connection, history_id: i64) -> TxResult<Vec<Tag>> {
  let mut stmt = conn.prepare(
    "SELECT t.id, t.created_at, t.updated_at, t.name, t.color \
     FROM tags t \
     JOIN histories_tags ht ON ht.tag_id = t.id \
     WHERE ht.history_id = ?1 AND t.deleted_at IS NULL \
     ORDER BY t.id",
  )?;
  let raws = stmt
    .query_map(params![history_id], tag_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_tag().map_err(TxError::Domain))
    .collect()
}

const HISTORY_LIST_SELECT: &str = "SELECT h.id, h.name, h.payment_date, h.amount, \
   a.id, a.name, a.account_type, a.branch, a.account_number, a.credit_limit, \
   b.code, b.name \
   FROM histories h \
   LEFT JOIN accounts a ON a.id = h.account_id AND a.deleted_at IS NULL \
   LEFT JOIN banks b ON b.id = a.bank_id AND b.deleted_at IS NULL";

fn history_list_item_from_row(
  row: &rusqlite::Row,
) -> rusqlite::Result<RawHistoryListItem> {
  let account = match row.get::<_, Option<i64>>(4)? {
    Some(_) => Some(RawAccountSummary {
      name:         row.get(5)?,
      account_type: row.get(6)?,
      branch:       row.get(7)?,
      number:       row.get(8)?,
      credit_limit: row.get(9)?,
      bank_code:    row.get(10)?,
      bank_name:    row.get(11)?,
    }),
    None => None,
  };
  Ok(RawHistoryListItem {
    id:           row.get(0)?,
    name:         row.get(1)?,
    payment_date: row.get(2)?,
    amount:       row.get(3)?,
    account,
  })
}

fn list_history_rows(
  conn: &Connection,
  query: &ListQuery,
) -> TxResult<Vec<HistoryListItem>> {
  let pattern = like_pattern(query.term.as_deref());
  let filter = match pattern {
    Some(_) => "h.deleted_at IS NULL AND LOWER(h.name) LIKE ?1",
    None => "h.deleted_at IS NULL",
  };
  let sql =
    format!("{HISTORY_LIST_SELECT} WHERE {filter} ORDER BY h.id LIMIT ?2 OFFSET ?3");
  let (limit, offset) = page_bounds(query);

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![pattern, limit, offset], history_list_item_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_item().map_err(TxError::Domain))
    .collect()
}

/// Resolve every tag reference to a live tag, in input order.
fn resolve_tags(conn: &Connection, refs: &[EntityRef]) -> TxResult<Vec<Tag>> {
  let mut tags = Vec::with_capacity(refs.len());
  for reference in refs {
    match reference.id {
      None => return Err(not_found(TAGS.entity, None)),
      Some(id) => match fetch_tag(conn, id)? {
        Some(tag) => tags.push(tag),
        None => return Err(not_found(TAGS.entity, Some(id))),
      },
    }
  }
  Ok(tags)
}

fn link_tags(conn: &Connection, history_id: i64, tags: &[Tag]) -> TxResult<()> {
  for tag in tags {
    conn.execute(
      "INSERT OR IGNORE INTO histories_tags (history_id, tag_id) VALUES (?1, ?2)",
      params![history_id, tag.id],
    )?;
  }
  Ok(())
}

// ─── Provisions ──────────────────────────────────────────────────────────────

const PROVISION_COLUMNS: &str =
  "id, created_at, updated_at, name, initial_date, final_date, amount";

fn provision_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawProvision> {
  Ok(RawProvision {
    id:           row.get(0)?,
    created_at:   row.get(1)?,
    updated_at:   row.get(2)?,
    name:         row.get(3)?,
    initial_date: row.get(4)?,
    final_date:   row.get(5)?,
    amount:       row.get(6)?,
  })
}

fn fetch_provision(conn: &Connection, id: i64) -> TxResult<Option<Provision>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {PROVISION_COLUMNS} FROM provisions WHERE id = ?1 AND deleted_at IS NULL"
      ),
      params![id],
      provision_from_row,
    )
    .optional()?;
  raw
    .map(|r| r.into_provision().map_err(TxError::Domain))
    .transpose()
}

fn list_provision_rows(conn: &Connection, query: &ListQuery) -> TxResult<Vec<Provision>> {
  let pattern = like_pattern(query.term.as_deref());
  let filter = match pattern {
    Some(_) => format!("deleted_at IS NULL AND {}", PROVISIONS.search),
    None => "deleted_at IS NULL".to_string(),
  };
  let sql = format!(
    "SELECT {PROVISION_COLUMNS} FROM provisions WHERE {filter} ORDER BY id LIMIT ?2 OFFSET ?3"
  );
  let (limit, offset) = page_bounds(query);

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![pattern, limit, offset], provision_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_provision().map_err(TxError::Domain))
    .collect()
}

// ─── Tags ────────────────────────────────────────────────────────────────────

const TAG_COLUMNS: &str = "id, created_at, updated_at, name, color";

fn tag_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawTag> {
  Ok(RawTag {
    id:         row.get(0)?,
    created_at: row.get(1)?,
    updated_at: row.get(2)?,
    name:       row.get(3)?,
    color:      row.get(4)?,
  })
}

fn fetch_tag(conn: &Connection, id: i64) -> TxResult<Option<Tag>> {
  let raw = conn
    .query_row(
      &format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?1 AND deleted_at IS NULL"),
      params![id],
      tag_from_row,
    )
    .optional()?;
  raw
    .map(|r| r.into_tag().map_err(TxError::Domain))
    .transpose()
}

fn list_tag_rows(conn: &Connection, query: &ListQuery) -> TxResult<Vec<Tag>> {
  let pattern = like_pattern(query.term.as_deref());
  let filter = match pattern {
    Some(_) => format!("deleted_at IS NULL AND {}", TAGS.search),
    None => "deleted_at IS NULL".to_string(),
  };
  let sql = format!(
    "SELECT {TAG_COLUMNS} FROM tags WHERE {filter} ORDER BY id LIMIT ?2 OFFSET ?3"
  );
  let (limit, offset) = page_bounds(query);

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![pattern, limit, offset], tag_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_tag().map_err(TxError::Domain))
    .collect()
}

// ─── FinanceStore impl ───────────────────────────────────────────────────────

impl FinanceStore for SqliteStore {
  // ── Banks ──────────────────────────────────────────────────────────────

  async fn count_banks(&self, term: Option<String>) -> Result<i64> {
    self
      .read(move |conn| count_rows(conn, &BANKS, term.as_deref()))
      .await
  }

  async fn list_banks(&self, query: ListQuery) -> Result<Vec<Bank>> {
    self.read(move |conn| list_bank_rows(conn, &query)).await
  }

  async fn get_bank(&self, id: i64) -> Result<Bank> {
    self
      .read(move |conn| {
        fetch_bank(conn, id)?.ok_or_else(|| not_found(BANKS.entity, Some(id)))
      })
      .await
  }

  async fn create_bank(&self, input: NewBank) -> Result<Bank> {
    self
      .write(move |tx| {
        let now = Utc::now();
        tx.execute(
          "INSERT INTO banks (created_at, updated_at, code, name) VALUES (?1, ?1, ?2, ?3)",
          params![encode_dt(now), input.code, input.name],
        )?;
        Ok(Bank {
          id: tx.last_insert_rowid(),
          created_at: now,
          updated_at: now,
          code: input.code,
          name: input.name,
        })
      })
      .await
  }

  async fn update_bank(&self, id: i64, input: NewBank) -> Result<Bank> {
    self
      .write(move |tx| {
        let existing =
          fetch_bank(tx, id)?.ok_or_else(|| not_found(BANKS.entity, Some(id)))?;
        let now = Utc::now();
        tx.execute(
          "UPDATE banks SET updated_at = ?1, code = ?2, name = ?3 \
           WHERE id = ?4 AND deleted_at IS NULL",
          params![encode_dt(now), input.code, input.name, id],
        )?;
        Ok(Bank {
          id,
          created_at: existing.created_at,
          updated_at: now,
          code: input.code,
          name: input.name,
        })
      })
      .await
  }

  async fn delete_bank(&self, id: i64) -> Result<()> {
    self.write(move |tx| soft_delete_row(tx, &BANKS, id)).await
  }

  // ── Accounts ───────────────────────────────────────────────────────────

  async fn count_accounts(&self, term: Option<String>) -> Result<i64> {
    self
      .read(move |conn| count_rows(conn, &ACCOUNTS, term.as_deref()))
      .await
  }

  async fn list_accounts(&self, query: ListQuery) -> Result<Vec<Account>> {
    self.read(move |conn| list_account_rows(conn, &query)).await
  }

  async fn get_account(&self, id: i64) -> Result<Account> {
    self
      .read(move |conn| {
        fetch_account(conn, id)?.ok_or_else(|| not_found(ACCOUNTS.entity, Some(id)))
      })
      .await
  }

  async fn create_account(&self, input: NewAccount) -> Result<Account> {
    self
      .write(move |tx| {
        let bank = resolve_ref(input.bank, BANKS.entity, |id| fetch_bank(tx, id))?;
        let now = Utc::now();
        tx.execute(
          "INSERT INTO accounts \
           (created_at, updated_at, name, account_type, bank_id, branch, account_number, credit_limit) \
           VALUES (?1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            encode_dt(now),
            input.name,
            encode_account_type(input.kind),
            bank.as_ref().map(|b| b.id),
            input.branch,
            input.number,
            input.credit_limit,
          ],
        )?;
        Ok(Account {
          id: tx.last_insert_rowid(),
          created_at: now,
          updated_at: now,
          name: input.name,
          kind: input.kind,
          bank,
          branch: input.branch,
          number: input.number,
          credit_limit: input.credit_limit,
        })
      })
      .await
  }

  async fn update_account(&self, id: i64, input: NewAccount) -> Result<Account> {
    self
      .write(move |tx| {
        let existing =
          fetch_account(tx, id)?.ok_or_else(|| not_found(ACCOUNTS.entity, Some(id)))?;
        let bank = resolve_ref(input.bank, BANKS.entity, |id| fetch_bank(tx, id))?;
        let now = Utc::now();
        tx.execute(
          "UPDATE accounts SET updated_at = ?1, name = ?2, account_type = ?3, \
           bank_id = ?4, branch = ?5, account_number = ?6, credit_limit = ?7 \
           WHERE id = ?8 AND deleted_at IS NULL",
          params![
            encode_dt(now),
            input.name,
            encode_account_type(input.kind),
            bank.as_ref().map(|b| b.id),
            input.branch,
            input.number,
            input.credit_limit,
            id,
          ],
        )?;
        Ok(Account {
          id,
          created_at: existing.created_at,
          updated_at: now,
          name: input.name,
          kind: input.kind,
          bank,
          branch: input.branch,
          number: input.number,
          credit_limit: input.credit_limit,
        })
      })
      .await
  }

  async fn delete_account(&self, id: i64) -> Result<()> {
    self.write(move |tx| soft_delete_row(tx, &ACCOUNTS, id)).await
  }

  // ── Histories ──────────────────────────────────────────────────────────

  async fn count_histories(&self, term: Option<String>) -> Result<i64> {
    self
      .read(move |conn| count_rows(conn, &HISTORIES, term.as_deref()))
      .await
  }

  async fn list_histories(&self, query: ListQuery) -> Result<Vec<HistoryListItem>> {
    self.read(move |conn| list_history_rows(conn, &query)).await
  }

  async fn get_history(&self, id: i64) -> Result<History> {
    self
      .read(move |conn| {
        fetch_history(conn, id)?.ok_or_else(|| not_found(HISTORIES.entity, Some(id)))
      })
      .await
  }

  async fn create_history(&self, input: NewHistory) -> Result<History> {
    self
      .write(move |tx| {
        let account =
          resolve_ref(input.account, ACCOUNTS.entity, |id| fetch_account(tx, id))?;
        let tags = resolve_tags(tx, &input.tags)?;
        let now = Utc::now();
        tx.execute(
          "INSERT INTO histories \
           (created_at, updated_at, name, payment_date, amount, account_id) \
           VALUES (?1, ?1, ?2, ?3, ?4, ?5)",
          params![
            encode_dt(now),
            input.name,
            encode_dt(input.payment_date),
            input.amount,
            account.as_ref().map(|a| a.id),
          ],
        )?;
        let id = tx.last_insert_rowid();
        link_tags(tx, id, &tags)?;
        Ok(History {
          id,
          created_at: now,
          updated_at: now,
          name: input.name,
          payment_date: input.payment_date,
          amount: input.amount,
          account,
          tags,
        })
      })
      .await
  }

  async fn update_history(&self, id: i64, input: NewHistory) -> Result<History> {
    self
      .write(move |tx| {
        let existing =
          fetch_history(tx, id)?.ok_or_else(|| not_found(HISTORIES.entity, Some(id)))?;
        let account =
          resolve_ref(input.account, ACCOUNTS.entity, |id| fetch_account(tx, id))?;
        let tags = resolve_tags(tx, &input.tags)?;
        let now = Utc::now();
        tx.execute(
          "UPDATE histories SET updated_at = ?1, name = ?2, payment_date = ?3, \
           amount = ?4, account_id = ?5 WHERE id = ?6 AND deleted_at IS NULL",
          params![
            encode_dt(now),
            input.name,
            encode_dt(input.payment_date),
            input.amount,
            account.as_ref().map(|a| a.id),
            id,
          ],
        )?;
        tx.execute(
          "DELETE FROM histories_tags WHERE history_id = ?1",
          params![id],
        )?;
        link_tags(tx, id, &tags)?;
        Ok(History {
          id,
          created_at: existing.created_at,
          updated_at: now,
          name: input.name,
          payment_date: input.payment_date,
          amount: input.amount,
          account,
          tags,
        })
      })
      .await
  }

  async fn delete_history(&self, id: i64) -> Result<()> {
    self.write(move |tx| soft_delete_row(tx, &HISTORIES, id)).await
  }

  // ── Provisions ─────────────────────────────────────────────────────────

  async fn count_provisions(&self, term: Option<String>) -> Result<i64> {
    self
      .read(move |conn| count_rows(conn, &PROVISIONS, term.as_deref()))
      .await
  }

  async fn list_provisions(&self, query: ListQuery) -> Result<Vec<Provision>> {
    self.read(move |conn| list_provision_rows(conn, &query)).await
  }

  async fn get_provision(&self, id: i64) -> Result<Provision> {
    self
      .read(move |conn| {
        fetch_provision(conn, id)?.ok_or_else(|| not_found(PROVISIONS.entity, Some(id)))
      })
      .await
  }

  async fn create_provision(&self, input: NewProvision) -> Result<Provision> {
    self
      .write(move |tx| {
        let now = Utc::now();
        tx.execute(
          "INSERT INTO provisions \
           (created_at, updated_at, name, initial_date, final_date, amount) \
           VALUES (?1, ?1, ?2, ?3, ?4, ?5)",
          params![
            encode_dt(now),
            input.name,
            encode_dt(input.initial_date),
            input.final_date.map(encode_dt),
            input.amount,
          ],
        )?;
        Ok(Provision {
          id: tx.last_insert_rowid(),
          created_at: now,
          updated_at: now,
          name: input.name,
          initial_date: input.initial_date,
          final_date: input.final_date,
          amount: input.amount,
        })
      })
      .await
  }

  async fn update_provision(&self, id: i64, input: NewProvision) -> Result<Provision> {
    self
      .write(move |tx| {
        let existing =
          fetch_provision(tx, id)?.ok_or_else(|| not_found(PROVISIONS.entity, Some(id)))?;
        let now = Utc::now();
        tx.execute(
          "UPDATE provisions SET updated_at = ?1, name = ?2, initial_date = ?3, \
           final_date = ?4, amount = ?5 WHERE id = ?6 AND deleted_at IS NULL",
          params![
            encode_dt(now),
            input.name,
            encode_dt(input.initial_date),
            input.final_date.map(encode_dt),
            input.amount,
            id,
          ],
        )?;
        Ok(Provision {
          id,
          created_at: existing.created_at,
          updated_at: now,
          name: input.name,
          initial_date: input.initial_date,
          final_date: input.final_date,
          amount: input.amount,
        })
      })
      .await
  }

  async fn delete_provision(&self, id: i64) -> Result<()> {
    self.write(move |tx| soft_delete_row(tx, &PROVISIONS, id)).await
  }

  // ── Tags ───────────────────────────────────────────────────────────────

  async fn count_tags(&self, term: Option<String>) -> Result<i64> {
    self
      .read(move |conn| count_rows(conn, &TAGS, term.as_deref()))
      .await
  }

  async fn list_tags(&self, query: ListQuery) -> Result<Vec<Tag>> {
    self.read(move |conn| list_tag_rows(conn, &query)).await
  }

  async fn get_tag(&self, id: i64) -> Result<Tag> {
    self
      .read(move |conn| {
        fetch_tag(conn, id)?.ok_or_else(|| not_found(TAGS.entity, Some(id)))
      })
      .await
  }

  async fn create_tag(&self, input: NewTag) -> Result<Tag> {
    self
      .write(move |tx| {
        let now = Utc::now();
        tx.execute(
          "INSERT INTO tags (created_at, updated_at, name, color) VALUES (?1, ?1, ?2, ?3)",
          params![encode_dt(now), input.name, i64::from(input.color)],
        )?;
        Ok(Tag {
          id: tx.last_insert_rowid(),
          created_at: now,
          updated_at: now,
          name: input.name,
          color: input.color,
        })
      })
      .await
  }

  async fn update_tag(&self, id: i64, input: NewTag) -> Result<Tag> {
    self
      .write(move |tx| {
        let existing =
          fetch_tag(tx, id)?.ok_or_else(|| not_found(TAGS.entity, Some(id)))?;
        let now = Utc::now();
        tx.execute(
          "UPDATE tags SET updated_at = ?1, name = ?2, color = ?3 \
           WHERE id = ?4 AND deleted_at IS NULL",
          params![encode_dt(now), input.name, i64::from(input.color), id],
        )?;
        Ok(Tag {
          id,
          created_at: existing.created_at,
          updated_at: now,
          name: input.name,
          color: input.color,
        })
      })
      .await
  }

  async fn delete_tag(&self, id: i64) -> Result<()> {
    self.write(move |tx| soft_delete_row(tx, &TAGS, id)).await
  }
}
