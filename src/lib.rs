//! fitsnap: upload a photo, get back an AI-generated description and a
//! workout suggestion.
//!
//! One axum service: static front end under `/`, one JSON endpoint at
//! `POST /analyse` that relays the uploaded image to an external multimodal
//! completion API.

pub mod config;
pub mod errors;
pub mod provider;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tokio::sync::Semaphore;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use config::Config;
use provider::Provider;

/// Shared per-process state: configuration, the one provider client, and the
/// cap on concurrent outbound provider calls.
pub struct AppState {
    pub config: Config,
    pub provider: Provider,
    pub provider_permits: Semaphore,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let provider = Provider::new(&config)?;
        let provider_permits = Semaphore::new(config.max_in_flight);
        Ok(Arc::new(Self {
            config,
            provider,
            provider_permits,
        }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/analyse", post(routes::analyse))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .fallback_service(assets)
        .with_state(state)
}
