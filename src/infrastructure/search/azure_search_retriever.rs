use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ports::{Embedder, RetrievalError, RuleRetriever};

pub const DEFAULT_CONTENT_FIELD: &str = "content";
pub const DEFAULT_VECTOR_FIELD: &str = "content_vector";

/// Vector search over an Azure AI Search index holding the rule corpus.
pub struct AzureSearchRetriever {
    client: Client,
    endpoint: String,
    api_key: String,
    embedder: Arc<dyn Embedder>,
    content_field: String,
    vector_field: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    select: &'a str,
    top: usize,
    #[serde(rename = "vectorQueries")]
    vector_queries: [VectorQuery<'a>; 1],
}

#[derive(Serialize)]
struct VectorQuery<'a> {
    kind: &'static str,
    vector: &'a [f32],
    fields: &'a str,
    k: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<Map<String, Value>>,
}

impl AzureSearchRetriever {
    pub fn new(
        service_endpoint: &str,
        index_name: &str,
        api_key: &str,
        api_version: &str,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let endpoint = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            service_endpoint.trim_end_matches('/'),
            index_name,
            api_version,
        );
        Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.to_string(),
            embedder,
            content_field: DEFAULT_CONTENT_FIELD.to_string(),
            vector_field: DEFAULT_VECTOR_FIELD.to_string(),
        }
    }

    pub fn with_fields(
        mut self,
        content_field: impl Into<String>,
        vector_field: impl Into<String>,
    ) -> Self {
        self.content_field = content_field.into();
        self.vector_field = vector_field.into();
        self
    }
}

#[async_trait]
impl RuleRetriever for AzureSearchRetriever {
    #[tracing::instrument(skip(self, query))]
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>, RetrievalError> {
        let vector = self.embedder.embed(query).await?;

        let request_body = SearchRequest {
            select: &self.content_field,
            top: top_k,
            vector_queries: [VectorQuery {
                kind: "vector",
                vector: &vector,
                fields: &self.vector_field,
                k: top_k,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RetrievalError::SearchFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::SearchFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        let passages: Vec<String> = search_response
            .value
            .into_iter()
            .filter_map(|mut document| match document.remove(&self.content_field) {
                Some(Value::String(text)) => Some(text),
                _ => None,
            })
            .take(top_k)
            .collect();

        tracing::debug!(passages = passages.len(), "Search complete");
        Ok(passages)
    }
}
