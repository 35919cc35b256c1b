//! Video stream dimensions via `ffprobe`.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Dimensions of the primary video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutput {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffprobe failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("couldn't parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no video streams found")]
    NoStreamFound,

    #[error("video stream has no dimensions")]
    MissingDimensions,
}

/// Reads the dimensions of the first video stream in a file.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Pick the first video stream out of `ffprobe -print_format json -show_streams`
/// output. Streams without a `codec_type` are treated as video.
pub fn parse_ffprobe_output(stdout: &[u8]) -> Result<ProbeOutput, ProbeError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)?;

    let stream = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .ok_or(ProbeError::NoStreamFound)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(ProbeOutput { width, height }),
        _ => Err(ProbeError::MissingDimensions),
    }
}

/// [`MediaProbe`] backed by the `ffprobe` executable.
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
    ))]
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError> {
        let start = std::time::Instant::now();

        // The child is killed if the request future is dropped mid-probe.
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                program: self.ffprobe_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let dimensions = parse_ffprobe_output(&output.stdout)?;

        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe completed"
        );

        Ok(dimensions)
    }
}
