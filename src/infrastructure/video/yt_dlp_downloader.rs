use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{DownloadError, VideoDownloader};
use crate::domain::{Platform, VideoSource};

const DEFAULT_PROGRAM: &str = "yt-dlp";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const MAX_STDERR_CHARS: usize = 500;

/// Fetches videos by shelling out to the `yt-dlp` executable.
pub struct YtDlpDownloader {
    program: PathBuf,
}

impl YtDlpDownloader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl VideoDownloader for YtDlpDownloader {
    #[tracing::instrument(skip(self, source, destination), fields(source = %source))]
    async fn download(
        &self,
        source: &VideoSource,
        destination: &Path,
    ) -> Result<PathBuf, DownloadError> {
        if source.platform() != Platform::YouTube {
            return Err(DownloadError::UnsupportedUrl(source.to_string()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args([
            "--format",
            "best",
            "--no-playlist",
            "--force-overwrites",
            "--extractor-args",
            "youtube:player_client=android,web",
            "--user-agent",
            USER_AGENT,
            "--output",
        ])
        .arg(destination)
        .arg(source.as_str())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| {
            DownloadError::Failed(format!(
                "could not run {}: {}",
                self.program.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                tail(stderr.trim(), MAX_STDERR_CHARS)
            )));
        }

        if !tokio::fs::try_exists(destination).await? {
            return Err(DownloadError::Failed(format!(
                "no file written to {}",
                destination.display()
            )));
        }

        tracing::info!(path = %destination.display(), "Download complete");
        Ok(destination.to_path_buf())
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = text
        .char_indices()
        .nth(count - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[skip..]
}
