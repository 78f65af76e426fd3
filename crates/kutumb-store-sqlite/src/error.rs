//! Error type for `kutumb-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] kutumb_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An update supplied a spouse id that is not part of the target person's
  /// current collection. The transaction is rolled back.
  #[error("spouse {spouse_id} does not belong to person {person_id}")]
  ForeignSpouse { spouse_id: i64, person_id: i64 },

  /// Same as [`Error::ForeignSpouse`], for the children collection.
  #[error("child {child_id} does not belong to person {person_id}")]
  ForeignChild { child_id: i64, person_id: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
