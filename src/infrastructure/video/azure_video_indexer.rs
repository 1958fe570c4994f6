use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, multipart};
use serde::Deserialize;
use serde_json::Value;
use tokio_util::io::ReaderStream;

use crate::application::ports::{JobStatusReport, VideoIndexer, VideoIndexerError};
use crate::domain::{IndexingJobId, IndexingJobState, VideoIndex};

pub const DEFAULT_API_BASE_URL: &str = "https://api.videoindexer.ai";
pub const DEFAULT_MANAGEMENT_BASE_URL: &str = "https://management.azure.com";
pub const MANAGEMENT_API_VERSION: &str = "2024-01-01";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(900);

/// Account coordinates of an ARM-based Azure Video Indexer resource.
#[derive(Debug, Clone)]
pub struct AzureVideoIndexerConfig {
    pub api_base_url: String,
    pub management_base_url: String,
    pub location: String,
    pub account_id: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    /// Bearer token for the management plane, obtained outside this service.
    pub arm_access_token: String,
}

pub struct AzureVideoIndexer {
    client: Client,
    config: AzureVideoIndexerConfig,
}

#[derive(Deserialize)]
struct AccountTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

impl AzureVideoIndexer {
    pub fn new(config: AzureVideoIndexerConfig) -> Result<Self, VideoIndexerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VideoIndexerError::ClientInit(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn videos_url(&self) -> String {
        format!(
            "{}/{}/Accounts/{}/Videos",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.location,
            self.config.account_id
        )
    }

    /// Exchanges the management token for a short-lived account token.
    async fn account_token(&self) -> Result<String, VideoIndexerError> {
        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.VideoIndexer/accounts/{}/generateAccessToken?api-version={}",
            self.config.management_base_url.trim_end_matches('/'),
            self.config.subscription_id,
            self.config.resource_group,
            self.config.account_name,
            MANAGEMENT_API_VERSION
        );
        let body = serde_json::json!({ "permissionType": "Contributor", "scope": "Account" });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.arm_access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| VideoIndexerError::AuthorizationFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VideoIndexerError::AuthorizationFailed(format!(
                "status {status}: {text}"
            )));
        }

        let token: AccountTokenResponse = response
            .json()
            .await
            .map_err(|e| VideoIndexerError::InvalidResponse(format!("account token: {e}")))?;

        token.access_token.ok_or_else(|| {
            VideoIndexerError::InvalidResponse("account token response without accessToken".into())
        })
    }
}

#[async_trait]
impl VideoIndexer for AzureVideoIndexer {
    #[tracing::instrument(skip(self, video_path), fields(path = %video_path.display()))]
    async fn submit(
        &self,
        video_path: &Path,
        name: &str,
    ) -> Result<IndexingJobId, VideoIndexerError> {
        let access_token = self.account_token().await?;
        let file = tokio::fs::File::open(video_path).await?;
        let size = file.metadata().await?.len();
        let file_name = video_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        tracing::info!(bytes = size, "Uploading video to Azure Video Indexer");

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let file_part = multipart::Part::stream_with_length(body, size)
            .file_name(file_name)
            .mime_str("video/mp4")
            .map_err(|e| VideoIndexerError::UploadFailed(format!("mime: {e}")))?;
        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(self.videos_url())
            .timeout(UPLOAD_TIMEOUT)
            .query(&[
                ("accessToken", access_token.as_str()),
                ("name", name),
                ("privacy", "Private"),
                ("indexingPreset", "Default"),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(|e| VideoIndexerError::UploadFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VideoIndexerError::UploadFailed(format!(
                "status {status}: {text}"
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| VideoIndexerError::InvalidResponse(format!("upload: {e}")))?;

        uploaded
            .id
            .filter(|id| !id.is_empty())
            .map(IndexingJobId::new)
            .ok_or_else(|| VideoIndexerError::InvalidResponse("upload response without id".into()))
    }

    #[tracing::instrument(skip(self), fields(job_id = %job_id))]
    async fn poll(&self, job_id: &IndexingJobId) -> Result<JobStatusReport, VideoIndexerError> {
        let access_token = self.account_token().await?;
        let url = format!("{}/{}/Index", self.videos_url(), job_id.as_str());

        let response = self
            .client
            .get(&url)
            .query(&[("accessToken", access_token.as_str())])
            .send()
            .await
            .map_err(|e| VideoIndexerError::StatusRequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VideoIndexerError::StatusRequestFailed(format!(
                "status {status}: {text}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VideoIndexerError::InvalidResponse(format!("index: {e}")))?;

        let state = body
            .get("state")
            .and_then(Value::as_str)
            .ok_or_else(|| VideoIndexerError::InvalidResponse("index response without state".into()))?
            .parse::<IndexingJobState>()
            .unwrap_or_else(|never| match never {});

        let payload = if state == IndexingJobState::Processed {
            let index: VideoIndex = serde_json::from_value(body)
                .map_err(|e| VideoIndexerError::InvalidResponse(format!("insights: {e}")))?;
            Some(index)
        } else {
            None
        };

        Ok(JobStatusReport { state, payload })
    }
}
