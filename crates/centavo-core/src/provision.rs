//! Provision — a planned amount over a date range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{Op, Violation, is_blank, size_outside};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provision {
  pub id:           i64,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  pub name:         String,
  pub initial_date: DateTime<Utc>,
  pub final_date:   Option<DateTime<Utc>>,
  pub amount:       i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionInput {
  pub name:         Option<String>,
  pub initial_date: Option<DateTime<Utc>>,
  pub final_date:   Option<DateTime<Utc>>,
  pub amount:       Option<i64>,
}

impl ProvisionInput {
  pub fn validate(&self, op: Op) -> Result<NewProvision, Vec<Violation>> {
    let mut violations = Vec::new();

    let name = self.name.as_deref();
    if is_blank(name) {
      violations.push(Violation::not_blank(op, "name"));
    }
    if size_outside(name, 1, 255) {
      violations.push(Violation::size_between(op, "name", 1, 255));
    }

    if self.initial_date.is_none() {
      violations.push(Violation::not_null(op, "initialDate"));
    }
    if self.amount.is_none() {
      violations.push(Violation::not_null(op, "amount"));
    }

    match (self.name.clone(), self.initial_date, self.amount) {
      (Some(name), Some(initial_date), Some(amount)) if violations.is_empty() => {
        Ok(NewProvision {
          name,
          initial_date,
          final_date: self.final_date,
          amount,
        })
      }
      _ => Err(violations),
    }
  }
}

#[derive(Debug, Clone)]
pub struct NewProvision {
  pub name:         String,
  pub initial_date: DateTime<Utc>,
  pub final_date:   Option<DateTime<Utc>>,
  pub amount:       i64,
}
