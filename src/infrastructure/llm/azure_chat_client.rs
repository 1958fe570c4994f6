use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};

/// Chat completions against an Azure OpenAI chat deployment.
pub struct AzureChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureChatClient {
    pub fn new(
        base_url: &str,
        deployment: &str,
        api_key: &str,
        api_version: &str,
        temperature: f32,
    ) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl LlmClient for AzureChatClient {
    #[tracing::instrument(skip_all)]
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmClientError> {
        let request_body = ChatCompletionRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let content = completion_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))?;

        tracing::debug!(chars = content.len(), "Chat completion received");
        Ok(content)
    }
}
