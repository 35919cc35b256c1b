//! Upload ingestion: validate → authorize → name → stage → classify → store → commit.
//!
//! A record only ever points at bytes that were completely stored. If the
//! final metadata update fails the stored object is left behind as an orphan
//! and reported in the logs; nothing removes it later.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tubely_core::{AppError, AssetKind, Video};
use tubely_db::VideoRepository;
use tubely_storage::keys::asset_key;
use tubely_storage::{AssetName, AssetStores, StoredObject};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::probe::MediaProbe;
use crate::staging::StagedUpload;

/// Stages an upload passes through, in order. Used as the `stage` log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Validating,
    Authorizing,
    Naming,
    Staging,
    Classifying,
    Storing,
    CommittingMetadata,
    Done,
}

impl Display for IngestStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            IngestStage::Validating => "validating",
            IngestStage::Authorizing => "authorizing",
            IngestStage::Naming => "naming",
            IngestStage::Staging => "staging",
            IngestStage::Classifying => "classifying",
            IngestStage::Storing => "storing",
            IngestStage::CommittingMetadata => "committing_metadata",
            IngestStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Who is uploading what, for which record.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub video_id: Uuid,
    /// Authenticated caller
    pub user_id: Uuid,
    pub kind: AssetKind,
    /// Declared content type, as sent by the client
    pub content_type: String,
}

/// Strip media-type parameters and lowercase, e.g. `Video/MP4; codecs=avc1` → `video/mp4`.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub struct IngestionPipeline {
    stores: AssetStores,
    classifier: Classifier,
    repository: Arc<dyn VideoRepository>,
    staging_dir: PathBuf,
}

impl IngestionPipeline {
    pub fn new(
        stores: AssetStores,
        probe: Arc<dyn MediaProbe>,
        repository: Arc<dyn VideoRepository>,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            stores,
            classifier: Classifier::new(probe),
            repository,
            staging_dir: staging_dir.into(),
        }
    }

    /// Run one upload to completion and return the updated record.
    ///
    /// `reader` is consumed at most once. Nothing is read from it, and no
    /// storage I/O happens, until the content type and ownership checks pass.
    #[tracing::instrument(skip(self, request, reader), fields(
        video_id = %request.video_id,
        user_id = %request.user_id,
        kind = %request.kind,
    ))]
    pub async fn ingest(
        &self,
        request: IngestRequest,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<Video, AppError> {
        let start = std::time::Instant::now();
        let kind = request.kind;

        tracing::debug!(stage = %IngestStage::Validating, content_type = %request.content_type);
        let content_type = normalize_content_type(&request.content_type);
        if !kind.accepts(&content_type) {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type {:?} for {}; expected one of: {}",
                content_type,
                kind,
                kind.allowed_content_types().join(", ")
            )));
        }

        tracing::debug!(stage = %IngestStage::Authorizing);
        let mut video = self
            .repository
            .get_video(request.video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", request.video_id)))?;
        if !video.is_owned_by(request.user_id) {
            return Err(AppError::Unauthorized(
                "Not authorized to update this video".to_string(),
            ));
        }

        tracing::debug!(stage = %IngestStage::Naming);
        let name = AssetName::generate(&content_type);

        let stored = if kind.requires_classification() {
            self.store_classified(&name, &content_type, reader).await?
        } else {
            let key = asset_key(None, &name);
            self.store(kind, &key, &content_type, reader).await?
        };

        tracing::debug!(
            stage = %IngestStage::CommittingMetadata,
            asset_key = %stored.key,
        );
        match kind {
            AssetKind::Thumbnail => video.thumbnail_url = Some(stored.url.clone()),
            AssetKind::Video => video.video_url = Some(stored.url.clone()),
        }
        let updated = match self.repository.update_video(&video).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    asset_key = %stored.key,
                    backend = %kind.backend(),
                    "Metadata commit failed, stored asset is orphaned"
                );
                return Err(e);
            }
        };

        tracing::info!(
            stage = %IngestStage::Done,
            asset_key = %stored.key,
            url = %stored.url,
            size_bytes = stored.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload ingested"
        );

        Ok(updated)
    }

    /// Stage to disk, probe, then store under the aspect-ratio partition.
    async fn store_classified(
        &self,
        name: &AssetName,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredObject, AppError> {
        tracing::debug!(stage = %IngestStage::Staging, staging_dir = %self.staging_dir.display());
        let mut staged = StagedUpload::stage(&self.staging_dir, reader)
            .await
            .map_err(|e| AppError::InternalWithSource {
                message: "Couldn't write upload to disk".to_string(),
                source: e.into(),
            })?;

        tracing::debug!(stage = %IngestStage::Classifying, size_bytes = staged.size_bytes());
        let aspect_ratio = self
            .classifier
            .classify(staged.path())
            .await
            .map_err(|e| AppError::media_probe("Couldn't read video size", e))?;

        let key = asset_key(Some(aspect_ratio.partition()), name);
        let file = staged.rewind().await.map_err(|e| AppError::InternalWithSource {
            message: "Couldn't reset staged upload".to_string(),
            source: e.into(),
        })?;

        self.store(AssetKind::Video, &key, content_type, file).await
    }

    async fn store(
        &self,
        kind: AssetKind,
        key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredObject, AppError> {
        let storage = self.stores.for_kind(kind);
        tracing::debug!(
            stage = %IngestStage::Storing,
            asset_key = %key,
            backend = %storage.backend_type(),
        );

        storage
            .store(key, content_type, reader)
            .await
            .map_err(|e| AppError::storage(format!("Failed to store asset {}", key), e))
    }
}
