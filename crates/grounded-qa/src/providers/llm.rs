//! Model client trait for answer generation

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::ChatPrompt;

/// Per-call generation options
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Model identifier
    pub model: String,
    /// Maximum output token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionOptions {
    /// Options for grounded answer generation
    pub fn answer(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Options for the relevance classification call: zero temperature and a
    /// small budget suited to short categorical answers.
    pub fn classification(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.classify_max_tokens,
            temperature: 0.0,
        }
    }
}

/// Trait for generative-model clients
///
/// Implementations:
/// - `ChatApiClient`: structured response deserialized into typed structs
/// - `LegacyChatClient`: response walked as a nested keyed JSON map
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Perform one completion round trip and return the first completion's
    /// trimmed text. Transport failures are retried with bounded backoff
    /// inside the client; authentication failures are never retried.
    async fn complete(&self, prompt: &ChatPrompt, options: &CompletionOptions) -> Result<String>;

    /// Client name for logging
    fn name(&self) -> &str;
}
