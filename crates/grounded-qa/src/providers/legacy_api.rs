//! Chat-completions client using the older nested-map response convention
//!
//! Functionally equivalent to `ChatApiClient`; kept for deployments pinned
//! to the older client-library convention where the response is navigated
//! as a keyed map rather than deserialized into structs.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::ChatPrompt;

use super::llm::{CompletionOptions, LlmClient};
use super::error_for_status;

/// Model API client navigating the response as a nested JSON map
pub struct LegacyChatClient {
    client: Client,
    api_base: String,
    api_key: String,
    max_retries: u32,
}

impl LegacyChatClient {
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

    async fn send_once(&self, prompt: &ChatPrompt, options: &CompletionOptions) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base);
        let request = json!({
            "model": options.model,
            "messages": prompt.messages,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
        });

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

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::api(format!("failed to parse completion response: {}", e)))?;

        extract_content(&body)
    }
}

/// Walk `choices[0].message.content` out of the keyed map
fn extract_content(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| Error::api("no completion content in response"))
}

#[async_trait]
impl LlmClient for LegacyChatClient {
    async fn complete(&self, prompt: &ChatPrompt, options: &CompletionOptions) -> Result<String> {
        tracing::debug!("Requesting completion from model: {}", options.model);

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.send_once(prompt, options).await {
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

    fn name(&self) -> &str {
        "legacy-chat-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_map_walk_yields_trimmed_content() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": " grounded answer "}}
            ]
        });
        assert_eq!(extract_content(&body).unwrap(), "grounded answer");
    }

    #[test]
    fn missing_path_is_an_api_error() {
        let body = json!({"choices": []});
        assert!(matches!(extract_content(&body), Err(Error::Api(_))));

        let body = json!({"error": {"message": "boom"}});
        assert!(matches!(extract_content(&body), Err(Error::Api(_))));
    }
}
