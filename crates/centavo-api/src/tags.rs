//! Handlers for `/tags` endpoints. Tag names are unique among non-deleted
//! rows; a clash surfaces as a 400 naming the `tags_name_key` index.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::{StatusCode, header},
  response::IntoResponse,
};
use centavo_core::{
  store::FinanceStore,
  tag::{Tag, TagInput},
  validate::Op,
};

use crate::{
  error::ApiError,
  params::{CountParams, ListParams},
};

/// `GET /tags/count[?term=]`
pub async fn count<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CountParams>,
) -> Result<String, ApiError>
where
  S: FinanceStore,
{
  let count = store.count_tags(params.term).await?;
  Ok(count.to_string())
}

/// `GET /tags[?page=&size=&term=]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.list_tags(params.into_query()).await?))
}

/// `GET /tags/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError>
where
  S: FinanceStore,
{
  Ok(Json(store.get_tag(id).await?))
}

/// `POST /tags`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<TagInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Create).map_err(ApiError::Validation)?;
  let tag = store.create_tag(input).await?;
  let location = format!("/tags/{}", tag.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(tag)))
}

/// `PUT /tags/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  body: Result<Json<TagInput>, JsonRejection>,
) -> Result<Json<Tag>, ApiError>
where
  S: FinanceStore,
{
  let Json(input) = body.map_err(|_| ApiError::MalformedBody)?;
  let input = input.validate(Op::Update).map_err(ApiError::Validation)?;
  Ok(Json(store.update_tag(id, input).await?))
}

/// `DELETE /tags/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FinanceStore,
{
  store.delete_tag(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
