//! Bank — a financial institution that accounts may belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{Op, Violation, is_blank, size_outside};

/// A registered bank. `code` is the three-digit clearing code and is unique
/// among non-deleted rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
  pub id:         i64,
  /// Store-assigned; never accepted from clients.
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub code:       String,
  pub name:       String,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Raw create/update body for a bank. All fields are optional so missing
/// values surface as violations instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BankInput {
  pub code: Option<String>,
  pub name: Option<String>,
}

impl BankInput {
  /// Collect the full violation set, then parse into a [`NewBank`].
  pub fn validate(&self, op: Op) -> Result<NewBank, Vec<Violation>> {
    let mut violations = Vec::new();

    let name = self.name.as_deref();
    if is_blank(name) {
      violations.push(Violation::not_blank(op, "name"));
    }
    if size_outside(name, 1, 150) {
      violations.push(Violation::size_between(op, "name", 1, 150));
    }

    let code = self.code.as_deref();
    if is_blank(code) {
      violations.push(Violation::not_blank(op, "code"));
    }
    if size_outside(code, 3, 3) {
      violations.push(Violation::size_between(op, "code", 3, 3));
    }
    // Exactly three ASCII digits; wrong-length digit strings also fail.
    if code.is_some_and(|c| c.len() != 3 || !c.chars().all(|ch| ch.is_ascii_digit())) {
      violations.push(Violation::only_numbers(op, "code"));
    }

    match (self.code.clone(), self.name.clone()) {
      (Some(code), Some(name)) if violations.is_empty() => Ok(NewBank { code, name }),
      _ => Err(violations),
    }
  }
}

/// A validated bank write, ready for the store.
#[derive(Debug, Clone)]
pub struct NewBank {
  pub code: String,
  pub name: String,
}
