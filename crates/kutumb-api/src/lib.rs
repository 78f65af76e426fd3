//! JSON REST API for the Kutumb person registry.
//!
//! Exposes an axum [`Router`] backed by any [`kutumb_core::store::PersonStore`]
//! through a [`PersonService`]. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kutumb_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod persons;
pub mod service;
pub mod validate;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use kutumb_core::store::PersonStore;
use serde::Deserialize;

pub use error::ApiError;
pub use service::{PageView, PersonService};

/// Runtime configuration for the server binary, loaded from `config.toml`
/// and `KUTUMB_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<PersonService<S>>) -> Router<()>
where
  S: PersonStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update_one::<S>)
        .delete(persons::delete_one::<S>),
    )
    .with_state(service)
}

#[cfg(test)]
mod tests;
