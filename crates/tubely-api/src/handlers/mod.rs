pub mod health;
pub mod thumbnail_upload;
mod upload;
pub mod video_upload;
