use std::path::Path;
use std::sync::Arc;

use tubely_core::AspectRatio;

use crate::probe::{MediaProbe, ProbeError};

/// Sorts videos into aspect-ratio partitions.
#[derive(Clone)]
pub struct Classifier {
    probe: Arc<dyn MediaProbe>,
}

impl Classifier {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        Self { probe }
    }

    pub async fn classify(&self, path: &Path) -> Result<AspectRatio, ProbeError> {
        let dimensions = self.probe.probe(path).await?;
        let aspect_ratio = AspectRatio::from_dimensions(dimensions.width, dimensions.height);

        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            aspect_ratio = %aspect_ratio,
            "Video classified"
        );

        Ok(aspect_ratio)
    }
}
