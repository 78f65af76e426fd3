//! SQLite backend for the Kutumb person store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each write method executes as a single
//! SQLite transaction, which is what makes the update's scalar overwrite,
//! both collection reconciliations, and the `updated_at` stamp atomic.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
