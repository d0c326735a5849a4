//! Tag — a colored label attached to histories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{Op, Violation, is_blank, size_outside};

/// A label. `name` is unique among non-deleted rows; `color` is a packed
/// 32-bit ARGB value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
  pub id:         i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub name:       String,
  pub color:      u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagInput {
  pub name:  Option<String>,
  pub color: Option<u32>,
}

impl TagInput {
  pub fn validate(&self, op: Op) -> Result<NewTag, Vec<Violation>> {
    let mut violations = Vec::new();

    let name = self.name.as_deref();
    if is_blank(name) {
      violations.push(Violation::not_blank(op, "name"));
    }
    if size_outside(name, 1, 255) {
      violations.push(Violation::size_between(op, "name", 1, 255));
    }

    // The wire contract reports a missing color as `not_blank`.
    if self.color.is_none() {
      violations.push(Violation::not_blank(op, "color"));
    }

    match (self.name.clone(), self.color) {
      (Some(name), Some(color)) if violations.is_empty() => Ok(NewTag { name, color }),
      _ => Err(violations),
    }
  }
}

#[derive(Debug, Clone)]
pub struct NewTag {
  pub name:  String,
  pub color: u32,
}
