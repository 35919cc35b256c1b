use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Lookup and update of the video records that uploaded assets attach to.
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of `video` and return the stored row.
    ///
    /// Fails with [`AppError::NotFound`] if the record disappeared in the meantime.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;
}

/// Repository for video records in PostgreSQL
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url,
                   created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let updated = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                thumbnail_url = $4,
                video_url = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail_url, video_url,
                      created_at, updated_at
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, video_id = %video.id, "Failed to update video");
            AppError::Database(e)
        })?;

        updated.ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))
    }
}
