//! Topical relevance gating
//!
//! Decides whether an incoming question is in scope before the grounded
//! answer path is entered. Three interchangeable strategies, selected by
//! configuration; the decision is recomputed per question and never cached.

use std::sync::Arc;

use crate::config::{GateMode, LlmConfig, RelevanceConfig};
use crate::generation::ChatPrompt;
use crate::providers::{CompletionOptions, LlmClient};

/// Configured relevance gate
pub enum RelevanceGate {
    /// No gate configured: every question is relevant
    Passthrough,
    /// Deterministic keyword containment, no network call
    Keyword(KeywordGate),
    /// One short model classification call per question
    Model(ModelGate),
}

impl RelevanceGate {
    /// Build the gate selected by configuration
    pub fn from_config(
        relevance: &RelevanceConfig,
        llm_config: &LlmConfig,
        client: Arc<dyn LlmClient>,
    ) -> Self {
        match relevance.mode {
            GateMode::Off => Self::Passthrough,
            GateMode::Keyword => Self::Keyword(KeywordGate::new(relevance.keywords.clone())),
            GateMode::Model => Self::Model(ModelGate::new(
                relevance.topics.clone(),
                client,
                CompletionOptions::classification(llm_config),
            )),
        }
    }

    /// Whether the question is in scope
    pub async fn is_relevant(&self, question: &str) -> bool {
        match self {
            Self::Passthrough => true,
            Self::Keyword(gate) => gate.is_relevant(question),
            Self::Model(gate) => gate.is_relevant(question).await,
        }
    }
}

/// Case-insensitive keyword containment against a fixed topic list
pub struct KeywordGate {
    /// Keywords, lowercased at construction
    keywords: Vec<String>,
}

impl KeywordGate {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// True when any keyword occurs in the question. An empty keyword set
    /// never matches.
    pub fn is_relevant(&self, question: &str) -> bool {
        let question = question.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| question.contains(k.as_str()))
    }
}

/// Relevance classification delegated to the generative model
pub struct ModelGate {
    topics: String,
    client: Arc<dyn LlmClient>,
    options: CompletionOptions,
}

impl ModelGate {
    pub fn new(topics: String, client: Arc<dyn LlmClient>, options: CompletionOptions) -> Self {
        Self {
            topics,
            client,
            options,
        }
    }

    /// One short classification round trip.
    ///
    /// The reply is matched for the affirmative token by case-insensitive
    /// substring containment, not exact equality: verbose replies like
    /// "Yes, it is." must still classify as relevant. Any failure is
    /// treated as "not relevant" (fail closed); an inconclusive check must
    /// not leak an off-topic question into the grounded answer path.
    pub async fn is_relevant(&self, question: &str) -> bool {
        let prompt = ChatPrompt::user_only(format!(
            "Determine if the following question is related to {}. \
             Respond with 'yes' if it is related and 'no' if it is not.\n\nQuestion: {}",
            self.topics, question
        ));

        match self.client.complete(&prompt, &self.options).await {
            Ok(reply) => {
                let relevant = reply.to_lowercase().contains("yes");
                tracing::debug!("Relevance check reply {:?} -> {}", reply, relevant);
                relevant
            }
            Err(e) => {
                tracing::warn!("Relevance check failed, treating as not relevant: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::{Error, Result};

    struct FixedReply(&'static str);

    #[async_trait]
    impl LlmClient for FixedReply {
        async fn complete(&self, _: &ChatPrompt, _: &CompletionOptions) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Failing;

    #[async_trait]
    impl LlmClient for Failing {
        async fn complete(&self, _: &ChatPrompt, _: &CompletionOptions) -> Result<String> {
            Err(Error::transport("connection refused"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn classification_options() -> CompletionOptions {
        CompletionOptions {
            model: "test-model".to_string(),
            max_tokens: 10,
            temperature: 0.0,
        }
    }

    fn model_gate(client: impl LlmClient + 'static) -> ModelGate {
        ModelGate::new(
            "opioids and related topics".to_string(),
            Arc::new(client),
            classification_options(),
        )
    }

    #[test]
    fn keyword_gate_matches_case_insensitively() {
        let gate = KeywordGate::new(vec!["naloxone".to_string(), "overdose".to_string()]);
        assert!(gate.is_relevant("What is NALOXONE used for?"));
        assert!(gate.is_relevant("how do I recognize an Overdose"));
        assert!(!gate.is_relevant("What's the weather today?"));
    }

    #[test]
    fn empty_keyword_set_never_matches() {
        let gate = KeywordGate::new(Vec::new());
        assert!(!gate.is_relevant("anything at all"));
    }

    #[tokio::test]
    async fn affirmative_substring_classifies_as_relevant() {
        let gate = model_gate(FixedReply("Yes, it is."));
        assert!(gate.is_relevant("What is naloxone?").await);
    }

    #[tokio::test]
    async fn negative_reply_without_affirmative_token_is_not_relevant() {
        // "No, not related." contains no "yes" substring
        let gate = model_gate(FixedReply("No, not related."));
        assert!(!gate.is_relevant("What's the weather today?").await);
    }

    #[tokio::test]
    async fn affirmative_match_ignores_case() {
        let gate = model_gate(FixedReply("YES"));
        assert!(gate.is_relevant("q").await);
    }

    #[tokio::test]
    async fn gate_fails_closed_on_transport_errors() {
        let gate = model_gate(Failing);
        assert!(!gate.is_relevant("What is naloxone?").await);
    }

    #[tokio::test]
    async fn passthrough_accepts_everything() {
        let gate = RelevanceGate::Passthrough;
        assert!(gate.is_relevant("What's the weather today?").await);
    }
}
