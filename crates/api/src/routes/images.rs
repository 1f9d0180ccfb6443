//! Image upload, download, and listing routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use imgstore_core::images::parse_width;
use imgstore_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::AppState;
use crate::error::{ErrorBody, error_response};

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

/// Creates the image routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .route("/image/{id}", get(download_image))
        .route("/images", get(list_images))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A single image identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Canonical identifier.
    pub uuid: String,
}

/// Every stored image identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageListResponse {
    /// Identifiers, sorted.
    pub items: Vec<ImageResponse>,
}

/// Query parameters for downloads.
#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    /// Target width; absent or zero means original size.
    pub width: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pulls the `file` field out of the form, with its declared name.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<(String, Bytes)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}

fn multipart_error_response(err: &MultipartError) -> Response {
    let status = err.status();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "PAYLOAD_TOO_LARGE"
    } else {
        "VALIDATION_ERROR"
    };
    (
        status,
        Json(ErrorBody {
            error: code,
            message: err.body_text(),
        }),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/image`
/// Store the multipart `file` field and return its identifier.
async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let (filename, content) = match read_file_field(&mut multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            warn!("Upload request without a file field");
            return error_response(
                &AppError::Validation("missing file field".into()),
                "no file received",
            );
        }
        Err(e) => {
            warn!(error = %e, "Failed to read multipart upload");
            return multipart_error_response(&e);
        }
    };

    match state.images.upload(content, &filename).await {
        Ok(id) => {
            info!(id = %id, filename = %filename, "Image uploaded");
            (
                StatusCode::OK,
                Json(ImageResponse {
                    uuid: id.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, filename = %filename, "File upload failed");
            let err = AppError::from(e);
            let message = if err.is_client_error() {
                "invalid image data"
            } else {
                "file upload failed"
            };
            error_response(&err, message)
        }
    }
}

/// GET `/image/{id}?width=<n>`
/// Download the image matching an id or id prefix, optionally resized.
///
/// The attachment name always ends in `.jpg`, whatever the stored format.
async fn download_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let width = match parse_width(params.width.as_deref()) {
        Ok(width) => width,
        Err(e) => {
            warn!(error = %e, "Image width not supported");
            return error_response(&AppError::from(e), "image width not supported");
        }
    };

    match state.images.download(&id, width).await {
        Ok(data) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={id}.jpg"),
                ),
            ],
            data,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, id = %id, width, "Image download failed");
            let err = AppError::from(e);
            let message = match err {
                AppError::NotFound(_) => "image not found",
                AppError::Validation(_) => "image width not supported",
                _ => "error fetching image",
            };
            error_response(&err, message)
        }
    }
}

/// GET `/images`
/// List every stored identifier.
async fn list_images(State(state): State<AppState>) -> Response {
    match state.images.list_ids().await {
        Ok(ids) => {
            let items = ids
                .into_iter()
                .map(|uuid| ImageResponse { uuid })
                .collect();
            (StatusCode::OK, Json(ImageListResponse { items })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Cannot get ids");
            error_response(&AppError::from(e), "error fetching ids")
        }
    }
}
