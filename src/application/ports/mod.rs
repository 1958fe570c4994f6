mod embedder;
mod llm_client;
mod rule_retriever;
mod video_downloader;
mod video_indexer;

pub use embedder::{Embedder, EmbedderError};
pub use llm_client::{LlmClient, LlmClientError};
pub use rule_retriever::{RetrievalError, RuleRetriever};
pub use video_downloader::{DownloadError, VideoDownloader};
pub use video_indexer::{JobStatusReport, VideoIndexer, VideoIndexerError};
