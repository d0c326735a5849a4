//! History — one recorded transaction, optionally linked to an account and
//! labelled with tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  account::{Account, AccountType},
  store::EntityRef,
  tag::Tag,
  validate::{Op, Violation, is_blank, size_outside},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
  pub id:           i64,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  pub name:         String,
  pub payment_date: DateTime<Utc>,
  /// Amount in cents.
  pub amount:       i64,
  pub account:      Option<Account>,
  pub tags:         Vec<Tag>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Raw create/update body for a history entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInput {
  pub name:         Option<String>,
  pub payment_date: Option<DateTime<Utc>>,
  pub amount:       Option<i64>,
  pub account:      Option<EntityRef>,
  /// An absent field means "no tags", not "keep existing" — updates are
  /// full replaces.
  pub tags:         Option<Vec<EntityRef>>,
}

impl HistoryInput {
  /// Collect the full violation set, then parse into a [`NewHistory`].
  pub fn validate(&self, op: Op) -> Result<NewHistory, Vec<Violation>> {
    let mut violations = Vec::new();

    let name = self.name.as_deref();
    if is_blank(name) {
      violations.push(Violation::not_blank(op, "name"));
    }
    if size_outside(name, 1, 255) {
      violations.push(Violation::size_between(op, "name", 1, 255));
    }

    if self.payment_date.is_none() {
      violations.push(Violation::not_null(op, "paymentDate"));
    }
    if self.amount.is_none() {
      violations.push(Violation::not_null(op, "amount"));
    }

    match (self.name.clone(), self.payment_date, self.amount) {
      (Some(name), Some(payment_date), Some(amount)) if violations.is_empty() => {
        Ok(NewHistory {
          name,
          payment_date,
          amount,
          account: self.account,
          tags: self.tags.clone().unwrap_or_default(),
        })
      }
      _ => Err(violations),
    }
  }
}

/// A validated history write. `account` and `tags` keep their raw
/// references; the store resolves them inside the write transaction.
#[derive(Debug, Clone)]
pub struct NewHistory {
  pub name:         String,
  pub payment_date: DateTime<Utc>,
  pub amount:       i64,
  pub account:      Option<EntityRef>,
  pub tags:         Vec<EntityRef>,
}

// ─── List projection ─────────────────────────────────────────────────────────

/// Read shape for `GET /histories`: account and bank are joined eagerly and
/// only the fields the listing needs are carried. A read optimization, not a
/// behavioral difference from the full entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListItem {
  pub id:           i64,
  pub name:         String,
  pub payment_date: DateTime<Utc>,
  pub amount:       i64,
  pub account:      Option<AccountSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
  pub name:         String,
  #[serde(rename = "type")]
  pub kind:         AccountType,
  pub bank:         Option<BankSummary>,
  pub branch:       Option<String>,
  pub number:       Option<String>,
  pub credit_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
  pub code: String,
  pub name: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone as _;

  #[test]
  fn empty_object_reports_three_violations() {
    let violations = HistoryInput::default().validate(Op::Create).unwrap_err();
    assert_eq!(violations.len(), 3);
    assert!(violations.contains(&Violation::not_blank(Op::Create, "name")));
    assert!(violations.contains(&Violation::not_null(Op::Create, "paymentDate")));
    assert!(violations.contains(&Violation::not_null(Op::Create, "amount")));
  }

  #[test]
  fn absent_tags_parse_to_an_empty_set() {
    let parsed = HistoryInput {
      name: Some("Groceries".to_string()),
      payment_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
      amount: Some(12_345),
      ..Default::default()
    }
    .validate(Op::Create)
    .unwrap();
    assert!(parsed.tags.is_empty());
    assert!(parsed.account.is_none());
  }
}
