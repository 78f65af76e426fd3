//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | Query: `page_number` (default 1), `page_size` (default 10), `search_term` |
//! | `GET`    | `/persons/{id}` | 404 if unknown or soft-deleted |
//! | `POST`   | `/persons` | Body: [`PersonDraft`]; returns 201 |
//! | `PUT`    | `/persons/{id}` | Full replace with collection reconciliation |
//! | `DELETE` | `/persons/{id}` | Soft delete; 404 if already invisible |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kutumb_core::{
  person::{Person, PersonDraft},
  store::PersonStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  service::{PageView, PersonService},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default = "default_page_number")]
  pub page_number: u32,
  #[serde(default = "default_page_size")]
  pub page_size:   u32,
  /// Case-sensitive substring match over full name, phone, email, aadhaar.
  pub search_term: Option<String>,
}

fn default_page_number() -> u32 { 1 }
fn default_page_size() -> u32 { 10 }

/// `GET /persons[?page_number=..&page_size=..&search_term=..]`
pub async fn list<S>(
  State(service): State<Arc<PersonService<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<PageView>, ApiError>
where
  S: PersonStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = service
    .list(params.page_number, params.page_size, params.search_term)
    .await?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_one<S>(
  State(service): State<Arc<PersonService<S>>>,
  Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(service.get(id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons` — body is a [`PersonDraft`]; returns 201 + the persisted
/// aggregate with assigned identities.
pub async fn create<S>(
  State(service): State<Arc<PersonService<S>>>,
  Json(draft): Json<PersonDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = service.create(draft).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/{id}` — full replace; member drafts with an id are
/// keep/modify, without one are add, and omitted current members are removed.
pub async fn update_one<S>(
  State(service): State<Arc<PersonService<S>>>,
  Path(id): Path<i64>,
  Json(draft): Json<PersonDraft>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(service.update(id, draft).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/{id}` — soft delete; 204 on success, 404 if the person
/// was already invisible.
pub async fn delete_one<S>(
  State(service): State<Arc<PersonService<S>>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if service.delete(id).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("person {id} not found")))
  }
}
