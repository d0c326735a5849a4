//! Integration tests for `SqliteStore` against an in-memory database.

use centavo_core::{
  Error,
  account::{AccountType, NewAccount},
  bank::NewBank,
  history::NewHistory,
  provision::NewProvision,
  store::{EntityRef, FinanceStore, ListQuery},
  tag::NewTag,
};
use chrono::{DateTime, TimeZone as _, Utc};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn date(day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
}

fn query(term: Option<&str>) -> ListQuery {
  ListQuery {
    page: 0,
    size: 20,
    term: term.map(str::to_owned),
  }
}

fn refer(id: i64) -> Option<EntityRef> {
  Some(EntityRef { id: Some(id) })
}

fn bank(code: &str, name: &str) -> NewBank {
  NewBank {
    code: code.into(),
    name: name.into(),
  }
}

fn account(name: &str, bank: Option<EntityRef>) -> NewAccount {
  NewAccount {
    name: name.into(),
    kind: AccountType::Checking,
    bank,
    branch: Some("0001".into()),
    number: Some("12345-6".into()),
    credit_limit: 50_000,
  }
}

fn history(name: &str, account: Option<EntityRef>) -> NewHistory {
  NewHistory {
    name: name.into(),
    payment_date: date(1),
    amount: 100_00,
    account,
    tags: Vec::new(),
  }
}

fn provision(name: &str) -> NewProvision {
  NewProvision {
    name: name.into(),
    initial_date: date(1),
    final_date: None,
    amount: 999_00,
  }
}

fn tag(name: &str, color: u32) -> NewTag {
  NewTag {
    name: name.into(),
    color,
  }
}

// ─── Banks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_bank() {
  let s = store().await;

  let created = s.create_bank(bank("237", "Bradesco")).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(created.code, "237");
  assert_eq!(created.updated_at, created.created_at);

  let fetched = s.get_bank(created.id).await.unwrap();
  assert_eq!(fetched.id, created.id);
  assert_eq!(fetched.code, "237");
  assert_eq!(fetched.name, "Bradesco");
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn get_bank_missing_is_not_found() {
  let s = store().await;
  let err = s.get_bank(-1).await.unwrap_err();
  assert!(matches!(
    err,
    Error::IdNotFound { entity: "Bank", id: Some(-1) }
  ));
}

#[tokio::test]
async fn update_bank_is_full_replace() {
  let s = store().await;
  let created = s.create_bank(bank("001", "Banco do Brasil")).await.unwrap();

  let updated = s
    .update_bank(created.id, bank("341", "Itau"))
    .await
    .unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.code, "341");
  assert_eq!(updated.name, "Itau");
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);

  let fetched = s.get_bank(created.id).await.unwrap();
  assert_eq!(fetched.code, "341");
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn update_missing_bank_is_not_found() {
  let s = store().await;
  let err = s.update_bank(99, bank("001", "Nope")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::IdNotFound { entity: "Bank", id: Some(99) }
  ));
}

#[tokio::test]
async fn delete_bank_hides_row_and_second_delete_fails() {
  let s = store().await;
  let created = s.create_bank(bank("260", "Nubank")).await.unwrap();

  s.delete_bank(created.id).await.unwrap();

  assert!(s.get_bank(created.id).await.is_err());
  assert_eq!(s.count_banks(None).await.unwrap(), 0);
  assert!(s.list_banks(query(None)).await.unwrap().is_empty());

  let err = s.delete_bank(created.id).await.unwrap_err();
  assert!(matches!(err, Error::IdNotFound { entity: "Bank", .. }));
}

#[tokio::test]
async fn deleted_bank_code_can_be_reused() {
  let s = store().await;
  let first = s.create_bank(bank("104", "Caixa")).await.unwrap();
  s.delete_bank(first.id).await.unwrap();

  // Uniqueness is scoped to non-deleted rows.
  let second = s.create_bank(bank("104", "Caixa Nova")).await.unwrap();
  assert_ne!(second.id, first.id);
  assert_eq!(s.count_banks(None).await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_bank_code_is_a_unique_violation() {
  let s = store().await;
  s.create_bank(bank("237", "Bradesco")).await.unwrap();

  let err = s.create_bank(bank("237", "Impostor")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::UniqueViolation { ref index } if index == "banks_code_key"
  ));
}

#[tokio::test]
async fn bank_search_matches_code_or_name_case_insensitively() {
  let s = store().await;
  s.create_bank(bank("237", "Bradesco")).await.unwrap();
  s.create_bank(bank("341", "Itau")).await.unwrap();
  s.create_bank(bank("033", "Santander")).await.unwrap();

  assert_eq!(s.count_banks(Some("BRADE".into())).await.unwrap(), 1);
  assert_eq!(s.count_banks(Some("34".into())).await.unwrap(), 1);
  assert_eq!(s.count_banks(Some("3".into())).await.unwrap(), 3);

  let hits = s.list_banks(query(Some("AN"))).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Santander");
}

#[tokio::test]
async fn blank_term_counts_everything() {
  let s = store().await;
  s.create_bank(bank("237", "Bradesco")).await.unwrap();
  s.create_bank(bank("341", "Itau")).await.unwrap();

  assert_eq!(s.count_banks(None).await.unwrap(), 2);
  assert_eq!(s.count_banks(Some(String::new())).await.unwrap(), 2);
  assert_eq!(s.count_banks(Some("  ".into())).await.unwrap(), 2);
}

#[tokio::test]
async fn list_banks_paginates_in_id_order() {
  let s = store().await;
  for (code, name) in [("001", "A"), ("002", "B"), ("003", "C"), ("004", "D"), ("005", "E")] {
    s.create_bank(bank(code, name)).await.unwrap();
  }

  let first = s
    .list_banks(ListQuery { page: 0, size: 2, term: None })
    .await
    .unwrap();
  let last = s
    .list_banks(ListQuery { page: 2, size: 2, term: None })
    .await
    .unwrap();

  assert_eq!(first.len(), 2);
  assert!(first[0].id < first[1].id);
  assert_eq!(first[0].code, "001");
  assert_eq!(last.len(), 1);
  assert_eq!(last[0].code, "005");
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_account_with_bank_roundtrip() {
  let s = store().await;
  let b = s.create_bank(bank("237", "Bradesco")).await.unwrap();

  let created = s.create_account(account("Salary", refer(b.id))).await.unwrap();
  assert_eq!(created.bank.as_ref().map(|x| x.id), Some(b.id));

  let fetched = s.get_account(created.id).await.unwrap();
  assert_eq!(fetched.name, "Salary");
  assert_eq!(fetched.kind, AccountType::Checking);
  assert_eq!(fetched.credit_limit, 50_000);
  let nested = fetched.bank.expect("joined bank");
  assert_eq!(nested.code, "237");
  assert_eq!(nested.name, "Bradesco");
}

#[tokio::test]
async fn account_ref_without_id_is_not_found_null() {
  let s = store().await;
  let err = s
    .create_account(account("Salary", Some(EntityRef { id: None })))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::IdNotFound { entity: "Bank", id: None }
  ));
  assert_eq!(s.count_accounts(None).await.unwrap(), 0);
}

#[tokio::test]
async fn account_ref_unknown_id_is_not_found() {
  let s = store().await;
  let err = s.create_account(account("Salary", refer(-1))).await.unwrap_err();
  assert!(matches!(
    err,
    Error::IdNotFound { entity: "Bank", id: Some(-1) }
  ));
}

#[tokio::test]
async fn account_ref_to_soft_deleted_bank_is_not_found() {
  let s = store().await;
  let b = s.create_bank(bank("237", "Bradesco")).await.unwrap();
  s.delete_bank(b.id).await.unwrap();

  let err = s.create_account(account("Salary", refer(b.id))).await.unwrap_err();
  assert!(matches!(err, Error::IdNotFound { entity: "Bank", .. }));
}

#[tokio::test]
async fn update_account_clears_bank_when_ref_absent() {
  let s = store().await;
  let b = s.create_bank(bank("237", "Bradesco")).await.unwrap();
  let created = s.create_account(account("Salary", refer(b.id))).await.unwrap();
  assert!(created.bank.is_some());

  let updated = s
    .update_account(created.id, account("Salary", None))
    .await
    .unwrap();
  assert!(updated.bank.is_none());
  assert_eq!(updated.created_at, created.created_at);

  let fetched = s.get_account(created.id).await.unwrap();
  assert!(fetched.bank.is_none());
}

#[tokio::test]
async fn deleting_bank_nulls_it_on_linked_accounts() {
  let s = store().await;
  let b = s.create_bank(bank("237", "Bradesco")).await.unwrap();
  let created = s.create_account(account("Salary", refer(b.id))).await.unwrap();

  s.delete_bank(b.id).await.unwrap();

  let fetched = s.get_account(created.id).await.unwrap();
  assert!(fetched.bank.is_none());
}

// ─── Histories ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn history_with_account_and_tags_roundtrip() {
  let s = store().await;
  let b = s.create_bank(bank("237", "Bradesco")).await.unwrap();
  let a = s.create_account(account("Salary", refer(b.id))).await.unwrap();
  let food = s.create_tag(tag("food", 0xFF00_0000)).await.unwrap();
  let home = s.create_tag(tag("home", 0x00FF_0000)).await.unwrap();

  let mut input = history("Groceries", refer(a.id));
  input.tags = vec![
    EntityRef { id: Some(food.id) },
    EntityRef { id: Some(home.id) },
  ];

  let created = s.create_history(input).await.unwrap();
  assert_eq!(created.tags.len(), 2);

  let fetched = s.get_history(created.id).await.unwrap();
  assert_eq!(fetched.name, "Groceries");
  assert_eq!(fetched.amount, 100_00);
  assert_eq!(fetched.payment_date, date(1));
  let names: Vec<_> = fetched.tags.iter().map(|t| t.name.as_str()).collect();
  assert_eq!(names, ["food", "home"]);
  let nested = fetched.account.expect("joined account");
  assert_eq!(nested.name, "Salary");
  assert_eq!(nested.bank.expect("joined bank").code, "237");
}

#[tokio::test]
async fn history_update_replaces_tags() {
  let s = store().await;
  let food = s.create_tag(tag("food", 1)).await.unwrap();
  let home = s.create_tag(tag("home", 2)).await.unwrap();

  let mut input = history("Groceries", None);
  input.tags = vec![EntityRef { id: Some(food.id) }];
  let created = s.create_history(input).await.unwrap();

  let mut replacement = history("Rent", None);
  replacement.tags = vec![EntityRef { id: Some(home.id) }];
  let updated = s.update_history(created.id, replacement).await.unwrap();

  assert_eq!(updated.name, "Rent");
  assert_eq!(updated.tags.len(), 1);
  assert_eq!(updated.tags[0].name, "home");

  let fetched = s.get_history(created.id).await.unwrap();
  assert_eq!(fetched.tags.len(), 1);
  assert_eq!(fetched.tags[0].name, "home");
}

#[tokio::test]
async fn unknown_tag_fails_the_whole_create() {
  let s = store().await;
  let mut input = history("Groceries", None);
  input.tags = vec![EntityRef { id: Some(404) }];

  let err = s.create_history(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::IdNotFound { entity: "Tag", id: Some(404) }
  ));
  // The failed resolution left no partial write behind.
  assert_eq!(s.count_histories(None).await.unwrap(), 0);
}

#[tokio::test]
async fn history_list_projection_joins_account_and_bank() {
  let s = store().await;
  let b = s.create_bank(bank("237", "Bradesco")).await.unwrap();
  let a = s.create_account(account("Salary", refer(b.id))).await.unwrap();
  s.create_history(history("Groceries", refer(a.id))).await.unwrap();
  s.create_history(history("Bus fare", None)).await.unwrap();

  let items = s.list_histories(query(None)).await.unwrap();
  assert_eq!(items.len(), 2);

  let linked = &items[0];
  assert_eq!(linked.name, "Groceries");
  let summary = linked.account.as_ref().expect("account summary");
  assert_eq!(summary.name, "Salary");
  assert_eq!(summary.credit_limit, 50_000);
  let bank_summary = summary.bank.as_ref().expect("bank summary");
  assert_eq!(bank_summary.code, "237");
  assert_eq!(bank_summary.name, "Bradesco");

  assert!(items[1].account.is_none());
}

#[tokio::test]
async fn history_search_matches_name_only() {
  let s = store().await;
  let a = s.create_account(account("Groceries Fund", None)).await.unwrap();
  s.create_history(history("Rent", refer(a.id))).await.unwrap();
  s.create_history(history("Groceries", None)).await.unwrap();

  // Only the history's own name is searched, not the account's.
  assert_eq!(s.count_histories(Some("groceries".into())).await.unwrap(), 1);
  let items = s.list_histories(query(Some("GROCER"))).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].name, "Groceries");
}

#[tokio::test]
async fn deleting_account_nulls_it_on_history() {
  let s = store().await;
  let a = s.create_account(account("Salary", None)).await.unwrap();
  let created = s.create_history(history("Rent", refer(a.id))).await.unwrap();

  s.delete_account(a.id).await.unwrap();

  let fetched = s.get_history(created.id).await.unwrap();
  assert!(fetched.account.is_none());
}

// ─── Provisions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn provision_roundtrip_with_open_final_date() {
  let s = store().await;
  let created = s.create_provision(provision("Car insurance")).await.unwrap();
  assert!(created.final_date.is_none());

  let mut replacement = provision("Car insurance");
  replacement.final_date = Some(date(31));
  let updated = s.update_provision(created.id, replacement).await.unwrap();
  assert_eq!(updated.final_date, Some(date(31)));
  assert_eq!(updated.created_at, created.created_at);

  let fetched = s.get_provision(created.id).await.unwrap();
  assert_eq!(fetched.final_date, Some(date(31)));
  assert_eq!(fetched.amount, 999_00);

  s.delete_provision(created.id).await.unwrap();
  assert_eq!(s.count_provisions(None).await.unwrap(), 0);
}

// ─── Tags ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_tag_name_is_a_unique_violation() {
  let s = store().await;
  s.create_tag(tag("food", 1)).await.unwrap();

  let err = s.create_tag(tag("food", 2)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::UniqueViolation { ref index } if index == "tags_name_key"
  ));
}

#[tokio::test]
async fn tag_update_and_soft_delete() {
  let s = store().await;
  let created = s.create_tag(tag("food", 0xFFFF_FFFF)).await.unwrap();
  assert_eq!(created.color, 0xFFFF_FFFF);

  let updated = s.update_tag(created.id, tag("meals", 7)).await.unwrap();
  assert_eq!(updated.name, "meals");
  assert_eq!(updated.color, 7);
  assert_eq!(updated.created_at, created.created_at);

  s.delete_tag(created.id).await.unwrap();
  let err = s.get_tag(created.id).await.unwrap_err();
  assert!(matches!(err, Error::IdNotFound { entity: "Tag", .. }));

  // The name is free again once the old row is gone.
  s.create_tag(tag("meals", 7)).await.unwrap();
}

#[tokio::test]
async fn tag_search_is_case_insensitive_substring() {
  let s = store().await;
  s.create_tag(tag("Groceries", 1)).await.unwrap();
  s.create_tag(tag("transport", 2)).await.unwrap();

  assert_eq!(s.count_tags(Some("GROC".into())).await.unwrap(), 1);
  let hits = s.list_tags(query(Some("groc"))).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Groceries");
}
