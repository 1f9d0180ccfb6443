//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the image store
//! - Error-to-response mapping
//! - Response types

pub mod error;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use imgstore_core::images::ImageStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Image store backing every route.
    pub images: ImageStore,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create state with the given body limit.
    #[must_use]
    pub fn new(images: ImageStore, max_upload_bytes: usize) -> Self {
        Self {
            images,
            max_upload_bytes,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
