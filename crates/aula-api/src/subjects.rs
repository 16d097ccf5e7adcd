//! Handlers for `/api/subjects`.
//!
//! | Method   | Path                    | Notes |
//! |----------|-------------------------|-------|
//! | `GET`    | `/api/subjects`         | List all subjects |
//! | `POST`   | `/api/subjects`         | Body: `{"id":..,"name":..}`; 201 |
//! | `PUT`    | `/api/subjects`         | Full-field replacement by `id` |
//! | `DELETE` | `/api/subjects?id=<id>` | Key in the query string |

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

use aula_core::{entity::NewSubject, store::RecordStore};
use aula_replica::Operation;

use crate::{AppState, envelope, error::ApiError, origin, to_row};

pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Ok(envelope::ok(state.store.list_subjects().await?))
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewSubject>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let subject = state.store.create_subject(input).await?;
  state
    .forwarder
    .replicate(origin(&headers), "subjects", Operation::Create(to_row(&subject)))
    .await;
  Ok(envelope::created(subject))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewSubject>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let subject = state.store.update_subject(input).await?;
  state
    .forwarder
    .replicate(origin(&headers), "subjects", Operation::Update(to_row(&subject)))
    .await;
  Ok(envelope::ok(subject))
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
  state.store.delete_subject(&params.id).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "subjects",
      Operation::Delete { key: "id", value: params.id },
    )
    .await;
  Ok(envelope::deleted())
}
