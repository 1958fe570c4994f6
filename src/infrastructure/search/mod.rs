mod azure_search_retriever;

pub use azure_search_retriever::{AzureSearchRetriever, DEFAULT_CONTENT_FIELD, DEFAULT_VECTOR_FIELD};
