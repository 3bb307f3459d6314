//! Per-request orchestration: validate, gate, assemble, complete
//!
//! Every path through the pipeline terminates in exactly one answer string;
//! no state persists across requests.

use std::sync::Arc;

use crate::config::QaConfig;
use crate::document::ReferenceDocument;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{CompletionOptions, LlmClient};
use crate::relevance::RelevanceGate;

/// Fixed reply for empty or whitespace-only questions
pub const INVALID_QUESTION_MESSAGE: &str = "Please ask a valid question.";

/// The question-answering request pipeline
pub struct QaPipeline {
    /// Shared read-only reference document, loaded once at startup
    document: Arc<ReferenceDocument>,
    gate: RelevanceGate,
    prompt: PromptBuilder,
    client: Arc<dyn LlmClient>,
    answer_options: CompletionOptions,
    out_of_scope_message: String,
}

impl QaPipeline {
    /// Assemble the pipeline from configuration and its injected
    /// dependencies: the pre-loaded document and the model client.
    pub fn new(
        config: &QaConfig,
        document: Arc<ReferenceDocument>,
        client: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            gate: RelevanceGate::from_config(&config.relevance, &config.llm, Arc::clone(&client)),
            prompt: PromptBuilder::from_config(&config.prompt),
            answer_options: CompletionOptions::answer(&config.llm),
            out_of_scope_message: config.relevance.out_of_scope_message.clone(),
            document,
            client,
        }
    }

    /// Handle one raw question, always producing an answer string.
    ///
    /// This is the `/ask` contract: every failure below the HTTP layer is
    /// converted to an ordinary in-band message, never a transport-level
    /// error.
    pub async fn handle(&self, raw_question: &str) -> String {
        let question = raw_question.trim();
        if question.is_empty() {
            return INVALID_QUESTION_MESSAGE.to_string();
        }

        match self.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Answer generation failed: {}", e);
                e.user_message()
            }
        }
    }

    /// Strict variant used by `/chat`: empty input and adapter failures
    /// propagate as errors for status-coded responses.
    pub async fn answer_checked(&self, raw_question: &str) -> Result<String> {
        let question = raw_question.trim();
        if question.is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()));
        }
        self.answer(question).await
    }

    async fn answer(&self, question: &str) -> Result<String> {
        if !self.gate.is_relevant(question).await {
            tracing::info!("Question gated as out of scope");
            return Ok(self.out_of_scope_message.clone());
        }

        let prompt = self.prompt.build(question, self.document.text());
        self.client.complete(&prompt, &self.answer_options).await
    }
}
