//! Tubely Processing Library
//!
//! Everything between an accepted upload stream and a committed asset URL:
//! probing and classifying videos, staging them on disk, and the ingestion
//! pipeline that ties naming, storage and the video record together.

pub mod classify;
pub mod ingest;
pub mod probe;
pub mod staging;

pub use classify::Classifier;
pub use ingest::{normalize_content_type, IngestRequest, IngestStage, IngestionPipeline};
pub use probe::{FfprobeProbe, MediaProbe, ProbeError, ProbeOutput};
pub use staging::StagedUpload;
