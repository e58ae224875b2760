// src/http.rs
//! HTTP surface over the pipeline
//!
//! - `GET  /`              : every record as `{ id, data }`, `data` = base64 of the source artifact
//! - `POST /upload`        : multipart field `file`; runs the full ingestion
//! - `GET  /download/{id}` : raw bytes of the decrypted artifact
//!
//! Pipeline calls do blocking file and SQLite I/O, so they run on the
//! blocking pool. A request that is dropped mid-ingestion does not cancel
//! the blocking task; it runs to completion or failure, and only a completed
//! ingestion registers a record.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Server;
use crate::db::RecordRegistry;
use crate::error::CoreError;
use crate::pipeline::{EncryptionPipeline, ImagePreview};

pub type SharedPipeline = Arc<EncryptionPipeline<Arc<dyn RecordRegistry>>>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: SharedPipeline,
}

impl AppState {
    pub fn new(pipeline: EncryptionPipeline<Arc<dyn RecordRegistry>>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Response-level error. Bodies are short fixed strings; internal details
/// (paths, error kinds) go to the log only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    PayloadTooLarge(&'static str),

    #[error("{0}")]
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub fn router(state: AppState, server: &Server) -> Router {
    let mut app = Router::new()
        .route("/", get(list_images))
        .route("/upload", post(upload_image))
        .route("/download/{id}", get(download_image))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if server.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}

/// Run a pipeline call on the blocking pool
async fn blocking<T, F>(state: &AppState, f: F) -> Result<Result<T, CoreError>, AppError>
where
    T: Send + 'static,
    F: FnOnce(&EncryptionPipeline<Arc<dyn RecordRegistry>>) -> Result<T, CoreError>
        + Send
        + 'static,
{
    let pipeline = Arc::clone(&state.pipeline);
    tokio::task::spawn_blocking(move || f(&pipeline))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "pipeline task panicked");
            AppError::Internal("Internal server error")
        })
}

async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImagePreview>>, AppError> {
    let previews = blocking(&state, |p| p.list_previews())
        .await?
        .map_err(|e| {
            tracing::error!(kind = e.kind(), error = %e, "listing failed");
            AppError::Internal("Error fetching images")
        })?;
    Ok(Json(previews))
}

async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<&'static str, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_owned();
        let data = field.bytes().await.map_err(upload_error)?;
        upload = Some((name, data));
        break;
    }

    let Some((name, data)) = upload else {
        tracing::info!("no file uploaded");
        return Err(AppError::BadRequest("No file uploaded"));
    };

    blocking(&state, move |p| p.ingest(&name, &data))
        .await?
        .map_err(|e| match e {
            CoreError::InvalidName(_) => AppError::BadRequest("Invalid file name"),
            // kind and stage were already logged by the pipeline
            _ => AppError::Internal("Error saving image data"),
        })?;

    Ok("Image uploaded and encrypted successfully")
}

/// Oversized bodies (past `max_upload_bytes`) are 413, anything else is 400
fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %e, "upload exceeds body limit");
        AppError::PayloadTooLarge("File too large")
    } else {
        tracing::warn!(error = %e, "malformed multipart body");
        AppError::BadRequest("Malformed upload")
    }
}

async fn download_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::NotFound("Image not found"));
    };

    let image = blocking(&state, move |p| p.recover_named(id))
        .await?
        .map_err(|e| match e {
            CoreError::NotFound(detail) => {
                tracing::info!(id, detail = %detail, "download of unknown image");
                AppError::NotFound("Image not found")
            }
            e => {
                tracing::error!(id, kind = e.kind(), error = %e, "download failed");
                AppError::Internal("Error fetching decrypted image")
            }
        })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        image.file_name.replace(|c: char| c == '"' || c == '\\', "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        image.bytes,
    )
        .into_response())
}
