use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::handlers::upload::ingest_multipart;
use crate::state::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use std::sync::Arc;
use tubely_core::{AssetKind, Video};

/// `POST /api/thumbnail_upload/{video_id}` with the image in the `thumbnail` field.
#[tracing::instrument(skip_all, fields(video_id = %video_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: Result<AuthenticatedUser, HttpAppError>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    ingest_multipart(&state, user, &video_id, multipart, AssetKind::Thumbnail).await
}
