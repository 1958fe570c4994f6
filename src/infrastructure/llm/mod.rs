mod azure_chat_client;
mod azure_openai_embedder;

pub use azure_chat_client::AzureChatClient;
pub use azure_openai_embedder::AzureOpenAiEmbedder;
