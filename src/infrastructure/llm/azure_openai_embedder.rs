use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Embedder, EmbedderError};

/// Query embeddings from an Azure OpenAI embedding deployment.
pub struct AzureOpenAiEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl AzureOpenAiEmbedder {
    pub fn new(
        base_url: &str,
        deployment: &str,
        api_key: &str,
        api_version: &str,
    ) -> Result<Self, EmbedderError> {
        if deployment.trim().is_empty() {
            return Err(EmbedderError::NotConfigured);
        }

        let endpoint = format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        tracing::info!(deployment = %deployment, "Using Azure OpenAI embedding deployment");

        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for AzureOpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&EmbeddingRequest { input: text })
            .send()
            .await
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbedderError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedderError::InvalidResponse(e.to_string()))?;

        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbedderError::InvalidResponse("empty response".to_string()))
    }
}
