use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("embedding deployment not configured")]
    NotConfigured,
    #[error("embedding api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("embedding rate limited")]
    RateLimited,
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}
