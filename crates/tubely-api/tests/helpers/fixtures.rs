//! In-memory collaborators standing in for Postgres and ffprobe.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tubely_core::{AppError, Video};
use tubely_db::VideoRepository;
use tubely_processing::{MediaProbe, ProbeError, ProbeOutput};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn insert_video(&self, user_id: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: "Launch trailer".to_string(),
            description: "A test video".to_string(),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos
            .lock()
            .unwrap()
            .insert(video.id, video.clone());
        video
    }

    pub fn video(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.video(id))
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.lock().unwrap();
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;
        *stored = Video {
            updated_at: Utc::now(),
            ..video.clone()
        };
        Ok(stored.clone())
    }
}

/// Reports the same dimensions for every file.
pub struct FixedProbe {
    pub width: u32,
    pub height: u32,
}

#[async_trait]
impl MediaProbe for FixedProbe {
    async fn probe(&self, _path: &Path) -> Result<ProbeOutput, ProbeError> {
        Ok(ProbeOutput {
            width: self.width,
            height: self.height,
        })
    }
}

/// Behaves like ffprobe on a file with no video stream.
pub struct NoStreamProbe;

#[async_trait]
impl MediaProbe for NoStreamProbe {
    async fn probe(&self, _path: &Path) -> Result<ProbeOutput, ProbeError> {
        Err(ProbeError::NoStreamFound)
    }
}

/// A few bytes with a PNG signature; the pipeline never decodes images.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend((0..256u32).map(|i| (i % 251) as u8));
    data
}

/// Stand-in MP4 payload; [`FixedProbe`] decides its dimensions.
pub fn mp4_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 241) as u8).collect()
}
