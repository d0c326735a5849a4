//! The `FinanceStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `centavo-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::Deserialize;

use crate::{
  Result,
  account::{Account, NewAccount},
  bank::{Bank, NewBank},
  history::{History, HistoryListItem, NewHistory},
  provision::{NewProvision, Provision},
  tag::{NewTag, Tag},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Pagination plus optional search term for list endpoints.
///
/// Term filtering is a lower-cased substring match over the entity's
/// searchable text (`name`; banks also match `code`). A `None` or blank term
/// applies no filter at all.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
  /// Zero-based page index.
  pub page: u32,
  pub size: u32,
  pub term: Option<String>,
}

/// A nested reference supplied in a write body, e.g. `{"bank": {"id": 3}}`.
///
/// Reference resolution distinguishes three states:
/// - the owning field absent (or JSON null) → relation cleared, no error;
/// - an object present without an id → not-found with a null id;
/// - an id present → must resolve to a live row of the referenced type.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EntityRef {
  pub id: Option<i64>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the bookkeeping store backend.
///
/// Every write (create/update/delete) runs in a single storage transaction
/// covering reference resolution and persistence, so a failed resolution
/// leaves no partial write. Every read path excludes soft-deleted rows
/// unconditionally.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FinanceStore: Send + Sync {
  // ── Banks ─────────────────────────────────────────────────────────────

  /// Count non-deleted banks, optionally filtered by `term`.
  fn count_banks(
    &self,
    term: Option<String>,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  fn list_banks(
    &self,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Bank>>> + Send + '_;

  /// Fails with [`crate::Error::IdNotFound`] when the row is missing or
  /// soft-deleted.
  fn get_bank(&self, id: i64) -> impl Future<Output = Result<Bank>> + Send + '_;

  fn create_bank(
    &self,
    input: NewBank,
  ) -> impl Future<Output = Result<Bank>> + Send + '_;

  /// Full replace of the mutable fields; `id` and `created_at` are
  /// preserved, `updated_at` refreshed.
  fn update_bank(
    &self,
    id: i64,
    input: NewBank,
  ) -> impl Future<Output = Result<Bank>> + Send + '_;

  /// Soft delete. Deleting an already-deleted row fails with
  /// [`crate::Error::IdNotFound`].
  fn delete_bank(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  fn count_accounts(
    &self,
    term: Option<String>,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  fn list_accounts(
    &self,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Account>>> + Send + '_;

  fn get_account(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  /// Resolves `input.bank` inside the write transaction; an unresolvable
  /// reference fails the whole operation.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  fn update_account(
    &self,
    id: i64,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  fn delete_account(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Histories ─────────────────────────────────────────────────────────

  fn count_histories(
    &self,
    term: Option<String>,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  /// Listing uses the joined read shape, not the full entity.
  fn list_histories(
    &self,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<HistoryListItem>>> + Send + '_;

  fn get_history(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<History>> + Send + '_;

  /// Resolves `input.account` and every entry of `input.tags` inside the
  /// write transaction.
  fn create_history(
    &self,
    input: NewHistory,
  ) -> impl Future<Output = Result<History>> + Send + '_;

  fn update_history(
    &self,
    id: i64,
    input: NewHistory,
  ) -> impl Future<Output = Result<History>> + Send + '_;

  fn delete_history(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Provisions ────────────────────────────────────────────────────────

  fn count_provisions(
    &self,
    term: Option<String>,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  fn list_provisions(
    &self,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Provision>>> + Send + '_;

  fn get_provision(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Provision>> + Send + '_;

  fn create_provision(
    &self,
    input: NewProvision,
  ) -> impl Future<Output = Result<Provision>> + Send + '_;

  fn update_provision(
    &self,
    id: i64,
    input: NewProvision,
  ) -> impl Future<Output = Result<Provision>> + Send + '_;

  fn delete_provision(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Tags ──────────────────────────────────────────────────────────────

  fn count_tags(
    &self,
    term: Option<String>,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  fn list_tags(
    &self,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Tag>>> + Send + '_;

  fn get_tag(&self, id: i64) -> impl Future<Output = Result<Tag>> + Send + '_;

  fn create_tag(
    &self,
    input: NewTag,
  ) -> impl Future<Output = Result<Tag>> + Send + '_;

  fn update_tag(
    &self,
    id: i64,
    input: NewTag,
  ) -> impl Future<Output = Result<Tag>> + Send + '_;

  fn delete_tag(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;
}
