use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::application::ports::{DownloadError, VideoDownloader, VideoIndexer, VideoIndexerError};
use crate::domain::{
    AuditState, AuditStatus, IndexingJobId, IndexingJobState, StateUpdate, UnsupportedSource,
    VideoIndex, VideoInsights, VideoSource,
};

use super::{NodeError, PipelineNode};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(3600);

const SCRATCH_PREFIX: &str = "brand-audit-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Upper bound on the whole wait for a terminal job state.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Downloads the video, hands it to the indexing service and waits for the
/// transcript and on-screen text.
pub struct IndexingStage {
    downloader: Arc<dyn VideoDownloader>,
    indexer: Arc<dyn VideoIndexer>,
    poll_policy: PollPolicy,
    work_dir: Option<PathBuf>,
}

struct IndexingOutput {
    local_path: PathBuf,
    insights: VideoInsights,
}

impl IndexingStage {
    pub fn new(
        downloader: Arc<dyn VideoDownloader>,
        indexer: Arc<dyn VideoIndexer>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            downloader,
            indexer,
            poll_policy,
            work_dir: None,
        }
    }

    /// Places per-run scratch directories under `work_dir` instead of the
    /// system temp directory.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    async fn index(
        &self,
        video_url: &str,
        video_id: &str,
    ) -> Result<IndexingOutput, IndexingError> {
        let source = VideoSource::parse(video_url)?;

        let scratch = ScratchVideo::create(self.work_dir.as_deref(), video_id)
            .await
            .map_err(IndexingError::Scratch)?;
        let submitted = self.download_and_submit(&source, scratch.path(), video_id).await;
        let scratch_path = scratch.path().to_path_buf();
        let released = scratch.release().await;

        let (local_path, job_id) = match (submitted, released) {
            (Ok(submitted), Ok(())) => submitted,
            (Ok(_), Err(source)) => {
                return Err(IndexingError::Cleanup {
                    path: scratch_path,
                    source,
                });
            }
            (Err(e), released) => {
                if let Err(cleanup) = released {
                    tracing::error!(
                        error = %cleanup,
                        path = %scratch_path.display(),
                        "Failed to remove local video after failed submission"
                    );
                }
                return Err(e);
            }
        };
        tracing::debug!(path = %local_path.display(), "Local video removed");

        let index = self.wait_for_processing(&job_id).await?;
        let insights = index.extract(source.platform());

        Ok(IndexingOutput {
            local_path,
            insights,
        })
    }

    async fn download_and_submit(
        &self,
        source: &VideoSource,
        destination: &Path,
        video_id: &str,
    ) -> Result<(PathBuf, IndexingJobId), IndexingError> {
        tracing::info!(source = %source, "Downloading video");
        let local_path = self
            .downloader
            .download(source, destination)
            .await
            .map_err(IndexingError::Download)?;

        let job_id = self
            .indexer
            .submit(&local_path, video_id)
            .await
            .map_err(IndexingError::Upload)?;
        tracing::info!(job_id = %job_id, "Video submitted for indexing");

        Ok((local_path, job_id))
    }

    async fn wait_for_processing(
        &self,
        job_id: &IndexingJobId,
    ) -> Result<VideoIndex, IndexingError> {
        let interval = self.poll_policy.interval;

        let poll_future = async {
            let mut attempt: u32 = 0;

            loop {
                attempt += 1;
                let report = self
                    .indexer
                    .poll(job_id)
                    .await
                    .map_err(IndexingError::Status)?;

                if !report.state.is_terminal() {
                    tracing::info!(
                        job_id = %job_id,
                        state = %report.state,
                        attempt,
                        wait_ms = interval.as_millis() as u64,
                        "Indexing job not finished, waiting"
                    );
                    tokio::time::sleep(interval).await;
                    continue;
                }

                return match report.state {
                    IndexingJobState::Processed => {
                        tracing::info!(job_id = %job_id, attempt, "Indexing job processed");
                        report
                            .payload
                            .ok_or_else(|| IndexingError::MissingPayload(job_id.clone()))
                    }
                    IndexingJobState::Quarantined => {
                        Err(IndexingError::JobQuarantined(job_id.clone()))
                    }
                    _ => Err(IndexingError::JobFailed(job_id.clone())),
                };
            }
        };

        tokio::time::timeout(self.poll_policy.timeout, poll_future)
            .await
            .map_err(|_| IndexingError::PollTimedOut {
                job_id: job_id.clone(),
                timeout: self.poll_policy.timeout,
            })?
    }
}

#[async_trait]
impl PipelineNode for IndexingStage {
    fn name(&self) -> &'static str {
        "indexer"
    }

    #[tracing::instrument(skip(self, state), fields(video_url = %state.video_url))]
    async fn run(&self, state: &AuditState) -> Result<StateUpdate, NodeError> {
        match self.index(&state.video_url, &state.video_id).await {
            Ok(indexed) => {
                tracing::info!(
                    transcript_chars = indexed.insights.transcript.len(),
                    ocr_lines = indexed.insights.ocr_text.len(),
                    "Extraction complete"
                );
                Ok(StateUpdate {
                    local_file_path: Some(indexed.local_path),
                    video_metadata: Some(indexed.insights.metadata),
                    transcript: Some(indexed.insights.transcript),
                    ocr_text: Some(indexed.insights.ocr_text),
                    ..StateUpdate::default()
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Video indexing failed");
                Ok(StateUpdate {
                    errors: vec![e.to_string()],
                    final_status: Some(AuditStatus::Fail),
                    transcript: Some(String::new()),
                    ocr_text: Some(Vec::new()),
                    ..StateUpdate::default()
                })
            }
        }
    }
}

/// Per-run scratch location for the downloaded video. The directory is
/// removed by `release`, or on drop if `release` is never reached.
struct ScratchVideo {
    dir: TempDir,
    path: PathBuf,
}

impl ScratchVideo {
    async fn create(work_dir: Option<&Path>, video_id: &str) -> io::Result<Self> {
        let work_dir = work_dir.map(Path::to_path_buf);
        let file_name = format!("{}.mp4", file_stem(video_id));

        tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix(SCRATCH_PREFIX);

            let dir = match work_dir {
                Some(root) => {
                    std::fs::create_dir_all(&root)?;
                    builder.tempdir_in(&root)?
                }
                None => builder.tempdir()?,
            };
            let path = dir.path().join(file_name);

            Ok(Self { dir, path })
        })
        .await
        .map_err(io::Error::other)?
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn release(self) -> io::Result<()> {
        let dir = self.dir;
        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(io::Error::other)?
    }
}

fn file_stem(video_id: &str) -> String {
    let stem: String = video_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "video".to_string()
    } else {
        stem
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
    #[error(transparent)]
    UnsupportedSource(#[from] UnsupportedSource),
    #[error("scratch storage: {0}")]
    Scratch(io::Error),
    #[error("download: {0}")]
    Download(DownloadError),
    #[error("upload: {0}")]
    Upload(VideoIndexerError),
    #[error("job status: {0}")]
    Status(VideoIndexerError),
    #[error("video indexing failed for job {0}")]
    JobFailed(IndexingJobId),
    #[error("video quarantined for job {0}: copyright or content policy violation")]
    JobQuarantined(IndexingJobId),
    #[error("job {0} reported processed without insights")]
    MissingPayload(IndexingJobId),
    #[error("job {job_id} not processed within {}s", .timeout.as_secs())]
    PollTimedOut {
        job_id: IndexingJobId,
        timeout: Duration,
    },
    #[error("failed to remove local video {}: {source}", .path.display())]
    Cleanup { path: PathBuf, source: io::Error },
}
