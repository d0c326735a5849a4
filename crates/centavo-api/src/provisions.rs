//! Handlers for `/provisions` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::IntoResponse,
};
use centavo_core::{
  provision::{Provision, ProvisionInput},
  store::FinanceStore,
  validate::Op,
};

use crate::{
  error::ApiError,
  params::{CountParams, ListParams},
};

/// `GET /provisions/count[?term=]`
pub async fn count<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CountParams>,
) -> Result<String, ApiError>
where
  S: FinanceStore,
{
  let count = store.count_provisions(params.term).await?;
  Ok(count.to_string())
}

/// `GET /provisions[?page=&size=&term=]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Provision>>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.list_provisions(params.into_query()).await?))
}

/// `GET /provisions/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Provision>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.get_provision(id).await?))
}

/// `POST /provisions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<ProvisionInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Create).map_err(ApiError::Validation)?;
  let provision = store.create_provision(input).await?;
  let location = format!("/provisions/{}", provision.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(provision)))
}

/// `PUT /provisions/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<ProvisionInput>, JsonRejection>,
) -> Result<Json<Provision>, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Update).map_err(ApiError::Validation)?;
  Ok(Json(store.update_provision(id, input).await?))
}

/// `DELETE /provisions/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FinanceStore,
{
  store.delete_provision(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
