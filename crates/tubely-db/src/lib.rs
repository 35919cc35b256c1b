//! Tubely Database Library
//!
//! Persistence for video records. The ingestion pipeline depends only on the
//! [`VideoRepository`] trait; [`PgVideoRepository`] is the Postgres implementation.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
