//! [`PersonService`] — thin orchestration between the HTTP handlers and a
//! [`PersonStore`] backend.
//!
//! The service owns input sanitation (page/size bounds, draft validation)
//! and the paginated-result wrapper; all aggregate semantics live in the
//! store. NotFound is surfaced distinctly and never converted into anything
//! else; store failures propagate unchanged.

use std::sync::Arc;

use kutumb_core::{
  person::{Person, PersonDraft},
  store::{PageRequest, PersonStore},
};
use serde::Serialize;

use crate::{error::ApiError, validate};

// ─── Pagination wrapper ──────────────────────────────────────────────────────

/// One page of results plus the numbers the caller needs to page further.
/// The page count is derivable (`ceil(total_records / page_size)`), so it is
/// not stored.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
  pub items:         Vec<Person>,
  pub total_records: u64,
  pub page_number:   u32,
  pub page_size:     u32,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct PersonService<S> {
  store: Arc<S>,
}

impl<S> PersonService<S>
where
  S: PersonStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// List one page of visible persons. Rejects non-positive page numbers and
  /// sizes before they reach the store, which documents them as a
  /// precondition.
  pub async fn list(
    &self,
    page_number: u32,
    page_size: u32,
    search_term: Option<String>,
  ) -> Result<PageView, ApiError> {
    if page_number < 1 {
      return Err(ApiError::BadRequest("page_number must be at least 1".into()));
    }
    if page_size < 1 {
      return Err(ApiError::BadRequest("page_size must be at least 1".into()));
    }

    let page = self
      .store
      .list_page(PageRequest {
        page_number,
        page_size,
        search: search_term,
      })
      .await
      .map_err(store_err)?;

    Ok(PageView {
      items: page.items,
      total_records: page.total_count,
      page_number,
      page_size,
    })
  }

  pub async fn get(&self, id: i64) -> Result<Person, ApiError> {
    self
      .store
      .get_person(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
  }

  pub async fn create(&self, draft: PersonDraft) -> Result<Person, ApiError> {
    validate::check_draft(&draft)?;
    let person = self.store.create_person(draft).await.map_err(store_err)?;
    tracing::info!(id = person.id, "created person");
    Ok(person)
  }

  /// Full-replace update. The current aggregate is loaded first so an
  /// unknown or soft-deleted id surfaces as NotFound before any write is
  /// attempted.
  pub async fn update(
    &self,
    id: i64,
    draft: PersonDraft,
  ) -> Result<Person, ApiError> {
    validate::check_draft(&draft)?;

    self
      .store
      .get_person(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

    let updated = self
      .store
      .update_person(id, draft)
      .await
      .map_err(store_err)?
      // The person can vanish between the load and the write.
      .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

    tracing::info!(id, "updated person");
    Ok(updated)
  }

  /// Soft-delete. Returns `true` if the person was visible and is now
  /// deleted, `false` if it was already invisible.
  pub async fn delete(&self, id: i64) -> Result<bool, ApiError> {
    let deleted = self.store.delete_person(id).await.map_err(store_err)?;
    if deleted {
      tracing::info!(id, "soft-deleted person");
    }
    Ok(deleted)
  }
}

fn store_err<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}
