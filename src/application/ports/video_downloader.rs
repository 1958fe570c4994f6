use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::VideoSource;

/// Acquires a remote video into a local file chosen by the caller.
#[async_trait]
pub trait VideoDownloader: Send + Sync {
    async fn download(
        &self,
        source: &VideoSource,
        destination: &Path,
    ) -> Result<PathBuf, DownloadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("unsupported url: {0}")]
    UnsupportedUrl(String),
    #[error("download failed: {0}")]
    Failed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
