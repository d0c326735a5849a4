//! Handlers for `/accounts` endpoints. Same route set as `/banks`; the
//! nested `bank` reference resolves inside the store's write transaction,
//! so an unknown bank id turns the whole request into a 404.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::IntoResponse,
};
use centavo_core::{
  account::{Account, AccountInput},
  store::FinanceStore,
  validate::Op,
};

use crate::{
  error::ApiError,
  params::{CountParams, ListParams},
};

/// `GET /accounts/count[?term=]`
pub async fn count<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CountParams>,
) -> Result<String, ApiError>
where
  S: FinanceStore,
{
  let count = store.count_accounts(params.term).await?;
  Ok(count.to_string())
}

/// `GET /accounts[?page=&size=&term=]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Account>>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.list_accounts(params.into_query()).await?))
}

/// `GET /accounts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Account>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.get_account(id).await?))
}

/// `POST /accounts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<AccountInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Create).map_err(ApiError::Validation)?;
  let account = store.create_account(input).await?;
  let location = format!("/accounts/{}", account.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(account)))
}

/// `PUT /accounts/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<AccountInput>, JsonRejection>,
) -> Result<Json<Account>, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Update).map_err(ApiError::Validation)?;
  Ok(Json(store.update_account(id, input).await?))
}

/// `DELETE /accounts/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FinanceStore,
{
  store.delete_account(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
