//! Health check endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check handler; degraded when the storage root has gone away.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = tokio::fs::metadata(state.images.config().root())
        .await
        .is_ok_and(|meta| meta.is_dir());

    let (code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use imgstore_core::images::{ImageStore, ImageStoreConfig};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        let store = ImageStore::open(ImageStoreConfig::new(dir.path())).unwrap();
        Router::new()
            .merge(routes())
            .with_state(AppState::new(store, 1024))
    }

    #[tokio::test]
    async fn test_health_ok() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_degraded_without_root() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        std::fs::remove_dir_all(dir.path()).unwrap();

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
