//! Chat-completions client using the structured response convention

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::{ChatMessage, ChatPrompt};

use super::llm::{CompletionOptions, LlmClient};
use super::error_for_status;

/// Model API client with typed response deserialization
pub struct ChatApiClient {
    /// HTTP client, carries the per-call timeout
    client: Client,
    api_base: String,
    api_key: String,
    max_retries: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

impl ChatApiClient {
    /// Create a new client from configuration and a resolved credential
    pub fn new(config: &LlmConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            max_retries: config.max_retries,
        }
    }

    /// Retry transport-class failures with exponential backoff. Auth and
    /// response-shape failures abort immediately.
    async fn retry_transport<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e @ Error::Transport(_)) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Transport failure (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::transport("unknown transport failure")))
    }

    async fn send_once(&self, prompt: &ChatPrompt, options: &CompletionOptions) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base);
        let request = CompletionRequest {
            model: &options.model,
            messages: &prompt.messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(format!("completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("failed to parse completion response: {}", e)))?;

        extract_content(completion)
    }
}

/// Pull the first completion's trimmed text out of the typed response
fn extract_content(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .ok_or_else(|| Error::api("no completion choices in response"))
}

#[async_trait]
impl LlmClient for ChatApiClient {
    async fn complete(&self, prompt: &ChatPrompt, options: &CompletionOptions) -> Result<String> {
        tracing::debug!("Requesting completion from model: {}", options.model);

        self.retry_transport(|| self.send_once(prompt, options)).await
    }

    fn name(&self) -> &str {
        "chat-api"
    }
}
