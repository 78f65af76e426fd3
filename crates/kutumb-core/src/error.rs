//! Error types for `kutumb-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A stored enum column held a value no variant maps to.
  #[error("unknown {field} value: {value:?}")]
  UnknownVariant {
    field: &'static str,
    value: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
