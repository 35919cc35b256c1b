//! Scoped on-disk staging for uploads that must be inspected before storage.

use std::io;
use std::io::SeekFrom;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWriteExt};

/// An upload copied to a temporary file.
///
/// The file is deleted when the value is dropped, whichever way the owning
/// request ends.
pub struct StagedUpload {
    // Declared first so the handle closes before the path is removed.
    file: File,
    temp: NamedTempFile,
    size_bytes: u64,
}

impl StagedUpload {
    /// Copy `reader` to EOF into a new temp file under `dir`.
    pub async fn stage(dir: &Path, reader: &mut (dyn AsyncRead + Send + Unpin)) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let staging_dir = dir.to_path_buf();
        let (temp, std_file) = tokio::task::spawn_blocking(move || {
            let temp = tempfile::Builder::new()
                .prefix("tubely-upload-")
                .suffix(".tmp")
                .tempfile_in(&staging_dir)?;
            let std_file = temp.as_file().try_clone()?;
            Ok::<_, io::Error>((temp, std_file))
        })
        .await
        .map_err(io::Error::other)??;
        let mut file = File::from_std(std_file);

        let size_bytes = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;

        tracing::debug!(
            path = %temp.path().display(),
            size_bytes,
            "Upload staged"
        );

        Ok(Self {
            file,
            temp,
            size_bytes,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Rewind to the first byte and hand out the file for reading.
    pub async fn rewind(&mut self) -> io::Result<&mut File> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(&mut self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_stage_rewind_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..70_000u32).map(|i| (i % 13) as u8).collect();
        let mut reader = io::Cursor::new(data.clone());

        let mut staged = StagedUpload::stage(dir.path(), &mut reader).await.unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert_eq!(staged.size_bytes(), data.len() as u64);
        assert_eq!(std::fs::read(&path).unwrap(), data);

        let mut read_back = Vec::new();
        staged
            .rewind()
            .await
            .unwrap()
            .read_to_end(&mut read_back)
            .await
            .unwrap();
        assert_eq!(read_back, data);

        drop(staged);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_staging_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("staging");
        let mut reader: &[u8] = b"abc";

        let staged = StagedUpload::stage(&nested, &mut reader).await.unwrap();
        assert!(staged.path().starts_with(&nested));
    }
}
