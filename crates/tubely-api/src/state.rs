//! Shared application state handed to every handler.

use std::sync::Arc;
use tubely_core::Config;
use tubely_processing::IngestionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<IngestionPipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: IngestionPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}
