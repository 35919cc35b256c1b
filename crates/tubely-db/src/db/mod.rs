//! Database repositories for data access layer
//
// Video records (ownership lookup and asset URL updates)
pub mod video;

pub use video::{PgVideoRepository, VideoRepository};
