//! JSON REST API for the seismic reading store.
//!
//! Exposes an axum [`Router`] backed by any [`seis_core::store::ReadingStore`].
//! CORS, body limits and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", seis_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod load;
pub mod stats;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use seis_core::store::ReadingStore;
use serde_json::{Value, json};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ReadingStore + 'static,
{
  Router::new()
    .route("/", get(welcome))
    .route("/load-data", post(load::handler::<S>))
    .route("/stats/daily", get(stats::daily::<S>))
    .route("/stats/monthly", get(stats::monthly::<S>))
    .route("/stats/month/{year}/{month}", get(stats::month::<S>))
    .route("/stats/day/{year}/{month}/{day}", get(stats::day::<S>))
    .with_state(store)
}

/// `GET /` — liveness banner.
async fn welcome() -> Json<Value> {
  Json(json!({
    "status":  200,
    "message": "Welcome to this route",
  }))
}

#[cfg(test)]
mod tests;
