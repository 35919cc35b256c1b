use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::storage_types::StorageBackend;

const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];
const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

/// The two kinds of asset that can be attached to a video record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Thumbnail,
    Video,
}

impl AssetKind {
    /// Multipart form field carrying the payload.
    pub fn form_field(&self) -> &'static str {
        match self {
            AssetKind::Thumbnail => "thumbnail",
            AssetKind::Video => "video",
        }
    }

    /// Exact content types accepted for this kind (already normalized).
    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Thumbnail => THUMBNAIL_CONTENT_TYPES,
            AssetKind::Video => VIDEO_CONTENT_TYPES,
        }
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        self.allowed_content_types().contains(&content_type)
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            AssetKind::Thumbnail => StorageBackend::Local,
            AssetKind::Video => StorageBackend::S3,
        }
    }

    /// Videos are probed and partitioned by aspect ratio before storage.
    pub fn requires_classification(&self) -> bool {
        matches!(self, AssetKind::Video)
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.form_field())
    }
}

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const RATIO_TOLERANCE: f64 = 0.1;

/// Aspect ratio category of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// 16:9
    Landscape,
    /// 9:16
    Portrait,
    Other,
}

impl AspectRatio {
    /// Classify a width/height ratio. Bands are open intervals of
    /// `RATIO_TOLERANCE` around each reference ratio, checked landscape first.
    pub fn from_ratio(ratio: f64) -> Self {
        if (ratio - LANDSCAPE_RATIO).abs() < RATIO_TOLERANCE {
            AspectRatio::Landscape
        } else if (ratio - PORTRAIT_RATIO).abs() < RATIO_TOLERANCE {
            AspectRatio::Portrait
        } else {
            AspectRatio::Other
        }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height == 0 {
            return AspectRatio::Other;
        }
        Self::from_ratio(f64::from(width) / f64::from(height))
    }

    /// Storage partition (path / key prefix) for this category.
    pub fn partition(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AspectRatio::Landscape => write!(f, "16:9"),
            AspectRatio::Portrait => write!(f, "9:16"),
            AspectRatio::Other => write!(f, "other"),
        }
    }
}
