//! Handlers for `/api/enrollments`.
//!
//! The body carries the two partial grades but never the `sup` flag:
//! the store derives it on every create and update. The list endpoint
//! joins in student, teacher, cycle and subject names.

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::HeaderMap,
  response::Response,
};
use serde::Deserialize;

use aula_core::{entity::NewEnrollment, store::RecordStore};
use aula_replica::Operation;

use crate::{AppState, envelope, error::ApiError, origin, to_row};

pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Ok(envelope::ok(state.store.list_enrollments().await?))
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewEnrollment>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let enrollment = state.store.create_enrollment(input).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "enrollments",
      Operation::Create(to_row(&enrollment)),
    )
    .await;
  Ok(envelope::created(enrollment))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewEnrollment>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let enrollment = state.store.update_enrollment(input).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "enrollments",
      Operation::Update(to_row(&enrollment)),
    )
    .await;
  Ok(envelope::ok(enrollment))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub id: String,
}

pub async fn remove<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  params: Result<Query<DeleteParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  state.store.delete_enrollment(&params.id).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "enrollments",
      Operation::Delete { key: "id", value: params.id },
    )
    .await;
  Ok(envelope::deleted())
}
