//! Handlers for `/histories` endpoints.
//!
//! Listing returns the joined read shape ([`HistoryListItem`]) rather than
//! the full entity; get/create/update return the full entity with its
//! account and tags nested.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::IntoResponse,
};
use centavo_core::{
  history::{History, HistoryInput, HistoryListItem},
  store::FinanceStore,
  validate::Op,
};

use crate::{
  error::ApiError,
  params::{CountParams, ListParams},
};

/// `GET /histories/count[?term=]`
pub async fn count<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CountParams>,
) -> Result<String, ApiError>
where
  S: FinanceStore,
{
  let count = store.count_histories(params.term).await?;
  Ok(count.to_string())
}

/// `GET /histories[?page=&size=&term=]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<HistoryListItem>>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.list_histories(params.into_query()).await?))
}

/// `GET /histories/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<History>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.get_history(id).await?))
}

/// `POST /histories`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<HistoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Create).map_err(ApiError::Validation)?;
  let history = store.create_history(input).await?;
  let location = format!("/histories/{}", history.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(history)))
}

/// `PUT /histories/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<HistoryInput>, JsonRejection>,
) -> Result<Json<History>, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Update).map_err(ApiError::Validation)?;
  Ok(Json(store.update_history(id, input).await?))
}

/// `DELETE /histories/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FinanceStore,
{
  store.delete_history(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
