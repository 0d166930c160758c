//! JSON REST API for augur.
//!
//! Exposes an axum [`Router`] backed by any
//! [`augur_core::store::PersonStore`] plus the enrichment pipeline.
//! Transport concerns (TLS, tracing layers) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = augur_api::api_router(state);
//! ```

pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};

use augur_core::store::PersonStore;
use augur_enrich::Enricher;

pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: PersonStore> {
  pub store:    Arc<S>,
  pub enricher: Arc<Enricher<S>>,
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: PersonStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/persons", get(persons::read::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      delete(persons::delete_by_id::<S>).put(persons::update::<S>),
    )
    .with_state(state)
}
