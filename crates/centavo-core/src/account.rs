//! Account — a bank account that transaction histories are recorded
//! against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  bank::Bank,
  store::EntityRef,
  validate::{Op, Violation, is_blank, size_outside},
};

/// The kind of account. Serialized with the upper-case wire names
/// (`CHECKING`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
  Checking,
  Savings,
  Salary,
  Investment,
}

/// A bank account. The owning bank, if any, serializes as a nested object —
/// never as a bare foreign-key scalar — so request and response shapes stay
/// symmetric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  pub id:           i64,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  pub name:         String,
  #[serde(rename = "type")]
  pub kind:         AccountType,
  pub bank:         Option<Bank>,
  pub branch:       Option<String>,
  pub number:       Option<String>,
  pub credit_limit: i64,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Raw create/update body for an account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
  pub name:         Option<String>,
  #[serde(rename = "type")]
  pub kind:         Option<AccountType>,
  pub bank:         Option<EntityRef>,
  pub branch:       Option<String>,
  pub number:       Option<String>,
  pub credit_limit: Option<i64>,
}

impl AccountInput {
  /// Collect the full violation set, then parse into a [`NewAccount`].
  /// Reference resolution for `bank` is the store's concern, not
  /// validation's.
  pub fn validate(&self, op: Op) -> Result<NewAccount, Vec<Violation>> {
    let mut violations = Vec::new();

    let name = self.name.as_deref();
    if is_blank(name) {
      violations.push(Violation::not_blank(op, "name"));
    }
    if size_outside(name, 1, 255) {
      violations.push(Violation::size_between(op, "name", 1, 255));
    }

    if self.kind.is_none() {
      violations.push(Violation::not_null(op, "type"));
    }

    if size_outside(self.branch.as_deref(), 1, 255) {
      violations.push(Violation::size_between(op, "branch", 1, 255));
    }
    if size_outside(self.number.as_deref(), 1, 255) {
      violations.push(Violation::size_between(op, "number", 1, 255));
    }

    if self.credit_limit.is_some_and(|limit| limit < 0) {
      violations.push(Violation::positive_or_zero(op, "creditLimit"));
    }

    match (self.name.clone(), self.kind) {
      (Some(name), Some(kind)) if violations.is_empty() => Ok(NewAccount {
        name,
        kind,
        bank: self.bank,
        branch: self.branch.clone(),
        number: self.number.clone(),
        credit_limit: self.credit_limit.unwrap_or(0),
      }),
      _ => Err(violations),
    }
  }
}

/// A validated account write, ready for the store. `bank` keeps the raw
/// reference: the store resolves it inside the write transaction.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub name:         String,
  pub kind:         AccountType,
  pub bank:         Option<EntityRef>,
  pub branch:       Option<String>,
  pub number:       Option<String>,
  pub credit_limit: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_object_requires_name_and_type() {
    let violations = AccountInput::default().validate(Op::Create).unwrap_err();
    assert_eq!(violations.len(), 2);
    assert!(violations.contains(&Violation::not_blank(Op::Create, "name")));
    assert!(violations.contains(&Violation::not_null(Op::Create, "type")));
  }

  #[test]
  fn optional_text_fields_only_fail_when_present_and_empty() {
    let violations = AccountInput {
      name: Some("Wallet".to_string()),
      kind: Some(AccountType::Checking),
      branch: Some(String::new()),
      number: Some(String::new()),
      ..Default::default()
    }
    .validate(Op::Create)
    .unwrap_err();
    assert_eq!(violations.len(), 2);
    assert!(violations.contains(&Violation::size_between(Op::Create, "branch", 1, 255)));
    assert!(violations.contains(&Violation::size_between(Op::Create, "number", 1, 255)));
  }

  #[test]
  fn negative_credit_limit_is_rejected() {
    let violations = AccountInput {
      name: Some("Wallet".to_string()),
      kind: Some(AccountType::Savings),
      credit_limit: Some(-1),
      ..Default::default()
    }
    .validate(Op::Update)
    .unwrap_err();
    assert_eq!(
      violations,
      vec![Violation::positive_or_zero(Op::Update, "creditLimit")]
    );
  }

  #[test]
  fn omitted_credit_limit_defaults_to_zero() {
    let parsed = AccountInput {
      name: Some("Wallet".to_string()),
      kind: Some(AccountType::Checking),
      ..Default::default()
    }
    .validate(Op::Create)
    .unwrap();
    assert_eq!(parsed.credit_limit, 0);
    assert!(parsed.bank.is_none());
  }
}
