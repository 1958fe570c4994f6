use async_trait::async_trait;

/// Read side of the compliance-rule knowledge base.
#[async_trait]
pub trait RuleRetriever: Send + Sync {
    /// Returns up to `top_k` rule passages, most relevant first.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>, RetrievalError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding: {0}")]
    Embedding(#[from] super::EmbedderError),
    #[error("search request failed: {0}")]
    SearchFailed(String),
    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}
