//! Input validation vocabulary.
//!
//! The declarative bean-validation layer of the HTTP contract is
//! reimplemented as explicit per-entity `validate` functions (see the entity
//! modules). Each collects the *full* violation set for a body — never
//! fail-fast — and responses compare violations as a set, not a list.
//!
//! The message codes produced here are part of the wire contract and must
//! not change.

use serde::{Deserialize, Serialize};

// ─── Operation prefix ────────────────────────────────────────────────────────

/// Which write operation a violation was collected for. Determines the
/// `create.body.*` / `update.body.*` field prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Create,
  Update,
}

impl Op {
  pub fn prefix(self) -> &'static str {
    match self {
      Op::Create => "create",
      Op::Update => "update",
    }
  }
}

// ─── Violation ───────────────────────────────────────────────────────────────

/// One failed constraint check, as serialized into error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
  pub field:   String,
  pub message: String,
}

impl Violation {
  fn body_field(op: Op, field: &str) -> String {
    format!("{}.body.{}", op.prefix(), field)
  }

  /// The field is absent, empty, or whitespace-only.
  pub fn not_blank(op: Op, field: &str) -> Self {
    Self {
      field:   Self::body_field(op, field),
      message: "not_blank".to_string(),
    }
  }

  /// A required non-text field is absent or null.
  pub fn not_null(op: Op, field: &str) -> Self {
    Self {
      field:   Self::body_field(op, field),
      message: "not_null".to_string(),
    }
  }

  /// Char length outside `[min, max]`.
  pub fn size_between(op: Op, field: &str, min: usize, max: usize) -> Self {
    Self {
      field:   Self::body_field(op, field),
      message: format!("size_between:{min}:{max}"),
    }
  }

  /// Char length different from an exact size.
  pub fn size_equal(op: Op, field: &str, size: usize) -> Self {
    Self {
      field:   Self::body_field(op, field),
      message: format!("size_equal:{size}"),
    }
  }

  /// A numeric field is negative.
  pub fn positive_or_zero(op: Op, field: &str) -> Self {
    Self {
      field:   Self::body_field(op, field),
      message: "positive_or_zero".to_string(),
    }
  }

  /// A text field does not match its required digit pattern.
  pub fn only_numbers(op: Op, field: &str) -> Self {
    Self {
      field:   Self::body_field(op, field),
      message: "only_numbers".to_string(),
    }
  }
}

// ─── Field checks ────────────────────────────────────────────────────────────

/// `true` when the field is absent, empty, or whitespace-only.
pub fn is_blank(value: Option<&str>) -> bool {
  value.is_none_or(|s| s.trim().is_empty())
}

/// `true` when the value is present and its char length falls outside
/// `[min, max]`. Length checks never fire on absent values.
pub fn size_outside(value: Option<&str>, min: usize, max: usize) -> bool {
  value.is_some_and(|s| {
    let len = s.chars().count();
    len < min || len > max
  })
}
