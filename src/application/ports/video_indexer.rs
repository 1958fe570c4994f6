use std::path::Path;

use async_trait::async_trait;

use crate::domain::{IndexingJobId, IndexingJobState, VideoIndex};

/// External asynchronous video-intelligence job service.
#[async_trait]
pub trait VideoIndexer: Send + Sync {
    async fn submit(
        &self,
        video_path: &Path,
        name: &str,
    ) -> Result<IndexingJobId, VideoIndexerError>;

    async fn poll(&self, job_id: &IndexingJobId) -> Result<JobStatusReport, VideoIndexerError>;
}

#[derive(Debug, Clone)]
pub struct JobStatusReport {
    pub state: IndexingJobState,
    /// Present once the job reached `Processed`.
    pub payload: Option<VideoIndex>,
}

#[derive(Debug, thiserror::Error)]
pub enum VideoIndexerError {
    #[error("http client initialization failed: {0}")]
    ClientInit(String),
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("status request failed: {0}")]
    StatusRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
