//! Handlers for `/api/teachers`.
//!
//! Same surface as `/api/students`: list, create, full-field update,
//! and delete keyed by `cedula`.

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

use aula_core::{entity::NewTeacher, store::RecordStore};
use aula_replica::Operation;

use crate::{AppState, envelope, error::ApiError, origin, to_row};

pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Ok(envelope::ok(state.store.list_teachers().await?))
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewTeacher>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let teacher = state.store.create_teacher(input).await?;
  state
    .forwarder
    .replicate(origin(&headers), "teachers", Operation::Create(to_row(&teacher)))
    .await;
  Ok(envelope::created(teacher))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewTeacher>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let teacher = state.store.update_teacher(input).await?;
  state
    .forwarder
    .replicate(origin(&headers), "teachers", Operation::Update(to_row(&teacher)))
    .await;
  Ok(envelope::ok(teacher))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub cedula: String,
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
  state.store.delete_teacher(&params.cedula).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "teachers",
      Operation::Delete { key: "cedula", value: params.cedula },
    )
    .await;
  Ok(envelope::deleted())
}
