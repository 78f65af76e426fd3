//! The `PersonStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `kutumb-store-sqlite`).
//! The service layer (`kutumb-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::person::{Person, PersonDraft};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`PersonStore::list_page`].
///
/// `page_number` and `page_size` are 1-based and must both be at least 1;
/// that is a caller contract, checked by the service layer, not clamped here.
#[derive(Debug, Clone)]
pub struct PageRequest {
  pub page_number: u32,
  pub page_size:   u32,
  /// Free-text filter matched case-sensitively as a substring of full name,
  /// phone number, email, or aadhaar number. Trimmed before use; a value
  /// that is empty after trimming is treated as absent.
  pub search:      Option<String>,
}

/// One page of visible persons plus the total count under the same filter.
#[derive(Debug, Clone)]
pub struct Page {
  /// Ordered by creation time descending, ties broken by id descending.
  pub items:       Vec<Person>,
  /// Count of all rows matching the visibility + search predicate, before
  /// pagination. May be computed against a marginally different database
  /// state than `items` under concurrent writes.
  pub total_count: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a person-registry storage backend.
///
/// Every read path applies the soft-delete visibility filter: a deleted
/// person behaves exactly like one that never existed, and no bypass is
/// exposed. Each write method is one atomic unit of work.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Return one page of visible persons, fully hydrated, plus the total
  /// count under the same predicate.
  fn list_page(
    &self,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page, Self::Error>> + Send + '_;

  /// Retrieve a visible person by id, fully hydrated. Returns `None` if the
  /// id is unknown or soft-deleted.
  fn get_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Visibility-filtered existence check, without hydration cost.
  fn person_exists(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert a new person with its member rows and return the persisted
  /// aggregate. Identities are assigned by the store; ids on member drafts
  /// are ignored.
  fn create_person(
    &self,
    draft: PersonDraft,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Full-replace update: overwrite every scalar field, reconcile both
  /// member collections against the supplied lists, and stamp `updated_at`,
  /// all in one transaction. Returns `None` (with no row written) if `id`
  /// does not resolve to a visible person.
  ///
  /// A member draft whose id does not belong to this person's current
  /// collection fails the whole update.
  fn update_person(
    &self,
    id: i64,
    draft: PersonDraft,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Soft-delete: mark the row deleted and stamp `deleted_at`. Returns
  /// `true` if the person was visible and is now deleted, `false` (without
  /// mutation) if it was already invisible. Member rows are untouched.
  fn delete_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
