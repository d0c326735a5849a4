//! Handlers for `/banks` endpoints.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/banks/count` | Optional `?term=`, plain-text integer |
//! | `GET`    | `/banks`       | `?page=0&size=20&term=` |
//! | `GET`    | `/banks/{id}`  | 404 when missing or soft-deleted |
//! | `POST`   | `/banks`       | 201 + `Location` header |
//! | `PUT`    | `/banks/{id}`  | Full replace |
//! | `DELETE` | `/banks/{id}`  | Soft delete, 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::IntoResponse,
};
use centavo_core::{
  bank::{Bank, BankInput},
  store::FinanceStore,
  validate::Op,
};

use crate::{
  error::ApiError,
  params::{CountParams, ListParams},
};

/// `GET /banks/count[?term=]`
pub async fn count<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CountParams>,
) -> Result<String, ApiError>
where
  S: FinanceStore,
{
  let count = store.count_banks(params.term).await?;
  Ok(count.to_string())
}

/// `GET /banks[?page=&size=&term=]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Bank>>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.list_banks(params.into_query()).await?))
}

/// `GET /banks/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Bank>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.get_bank(id).await?))
}

/// `POST /banks`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<BankInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Create).map_err(ApiError::Validation)?;
  let bank = store.create_bank(input).await?;
  let location = format!("/banks/{}", bank.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(bank)))
}

/// `PUT /banks/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<BankInput>, JsonRejection>,
) -> Result<Json<Bank>, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Update).map_err(ApiError::Validation)?;
  Ok(Json(store.update_bank(id, input).await?))
}

/// `DELETE /banks/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FinanceStore,
{
  store.delete_bank(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
