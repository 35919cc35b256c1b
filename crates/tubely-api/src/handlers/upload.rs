//! Shared multipart-to-pipeline plumbing for the upload routes.

use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::Json;
use futures::TryStreamExt;
use std::io;
use std::sync::{Arc, OnceLock};
use tokio_util::io::StreamReader;
use tubely_core::{AppError, AssetKind, Video};
use tubely_processing::IngestRequest;
use uuid::Uuid;

/// Find the kind's form field and stream it through the ingestion pipeline.
///
/// Checks run in request order: the path id, then the bearer token, then the
/// multipart framing. The field is never buffered in memory: its chunks are
/// adapted into an `AsyncRead` that the pipeline consumes at most once.
pub(crate) async fn ingest_multipart(
    state: &AppState,
    user: Result<AuthenticatedUser, HttpAppError>,
    video_id: &str,
    multipart: Result<Multipart, MultipartRejection>,
    kind: AssetKind,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = Uuid::parse_str(video_id).map_err(AppError::from)?;
    let user = user?;
    let mut multipart = multipart?;

    let field = loop {
        match multipart.next_field().await? {
            Some(field) if field.name() == Some(kind.form_field()) => break field,
            Some(_) => continue,
            None => {
                return Err(AppError::BadRequest(format!(
                    "Missing form field {:?}",
                    kind.form_field()
                ))
                .into())
            }
        }
    };

    let content_type = field.content_type().unwrap_or_default().to_string();
    tracing::debug!(
        video_id = %video_id,
        kind = %kind,
        content_type = %content_type,
        file_name = ?field.file_name(),
        "Upload field received"
    );

    // Body errors surface to the pipeline as plain io errors; keep the status
    // so an oversized body is still reported as 413.
    let body_error: Arc<OnceLock<StatusCode>> = Arc::new(OnceLock::new());
    let recorded = Arc::clone(&body_error);
    let chunks = field.map_err(move |err| {
        let _ = recorded.set(err.status());
        io::Error::other(err)
    });
    let mut reader = StreamReader::new(Box::pin(chunks));

    let request = IngestRequest {
        video_id,
        user_id: user.user_id,
        kind,
        content_type,
    };

    match state.pipeline.ingest(request, &mut reader).await {
        Ok(video) => Ok(Json(video)),
        Err(err) => match body_error.get() {
            Some(&status) => Err(body_read_error(status, &err).into()),
            None => Err(err.into()),
        },
    }
}

fn body_read_error(status: StatusCode, cause: &AppError) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read upload body: {}", cause))
    }
}
