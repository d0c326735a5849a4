//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! This is the single boundary where validation, domain, and storage
//! failures become the uniform wire shape
//! `{"title", "status", "violations": [{field, message}, ...]}` — no raw
//! store error ever reaches a client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use centavo_core::{Error, validate::Violation};
use serde::Serialize;
use thiserror::Error as ThisError;

/// An error returned by an API handler.
#[derive(Debug, ThisError)]
pub enum ApiError {
  /// Missing, unparseable, or type-mismatched request body.
  #[error("malformed request body")]
  MalformedBody,

  /// Field validation failed; carries the full collected set.
  #[error("validation failed with {} violation(s)", .0.len())]
  Validation(Vec<Violation>),

  /// A domain or storage failure reported by the store.
  #[error(transparent)]
  Store(#[from] Error),
}

/// The uniform error body shared by every 4xx response.
#[derive(Debug, Serialize)]
struct ErrorBody {
  title:      &'static str,
  status:     u16,
  violations: Vec<Violation>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, violations) = match self {
      ApiError::MalformedBody => (StatusCode::BAD_REQUEST, Vec::new()),
      ApiError::Validation(violations) => (StatusCode::BAD_REQUEST, violations),
      ApiError::Store(Error::IdNotFound { entity, id }) => (
        StatusCode::NOT_FOUND,
        vec![Violation {
          field:   entity.to_string(),
          message: match id {
            Some(id) => format!("id_not_found:{id}"),
            None => "id_not_found:null".to_string(),
          },
        }],
      ),
      ApiError::Store(Error::UniqueViolation { index }) => (
        StatusCode::BAD_REQUEST,
        vec![Violation {
          field:   index,
          message: "constraint_violation_exception".to_string(),
        }],
      ),
      ApiError::Store(Error::Storage(message)) => (
        StatusCode::BAD_REQUEST,
        vec![Violation {
          field:   message,
          message: "persistence_exception".to_string(),
        }],
      ),
    };

    let body = ErrorBody {
      title: "Constraint Violation",
      status: status.as_u16(),
      violations,
    };
    (status, Json(body)).into_response()
  }
}
