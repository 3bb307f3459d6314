//! JSON chat endpoint with the status-coded parallel contract
//!
//! Unlike `/ask`, this surface signals failure through status codes: 400 for
//! an empty message, 500 for upstream failures, `{"error": ...}` bodies.
//! The two contracts are deliberately kept separate.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::server::state::AppState;

/// JSON body for `/chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Client rendering mode, echoed back: "text" or "speech"
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "text".to_string()
}

/// JSON body returned by `/chat` on success
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub mode: String,
}

/// POST /chat with a JSON `{"message", "mode"}` body
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let reply = state.pipeline().answer_checked(&request.message).await?;

    Ok(Json(ChatReply {
        reply,
        mode: request.mode,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::Arc;

    use crate::config::{GateMode, QaConfig};
    use crate::document::ReferenceDocument;
    use crate::error::{Error, Result};
    use crate::generation::ChatPrompt;
    use crate::pipeline::QaPipeline;
    use crate::providers::{CompletionOptions, LlmClient};

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

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn complete(&self, _: &ChatPrompt, _: &CompletionOptions) -> Result<String> {
            Err(Error::transport("connection refused"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn state_with(client: impl LlmClient + 'static) -> AppState {
        let mut config = QaConfig::default();
        config.relevance.mode = GateMode::Off;
        let document = Arc::new(ReferenceDocument::from_text("reference text"));
        let pipeline = QaPipeline::new(&config, document, Arc::new(client));
        AppState::from_parts(config, pipeline)
    }

    #[tokio::test]
    async fn success_echoes_the_mode_back() {
        let state = state_with(FixedReply("grounded answer"));
        let request = ChatRequest {
            message: "What is naloxone?".to_string(),
            mode: "speech".to_string(),
        };

        let reply = chat(State(state), Json(request)).await.unwrap();
        assert_eq!(reply.0.reply, "grounded answer");
        assert_eq!(reply.0.mode, "speech");
    }

    #[tokio::test]
    async fn empty_message_is_a_400() {
        let state = state_with(FixedReply("unused"));
        let request = ChatRequest {
            message: "  ".to_string(),
            mode: default_mode(),
        };

        let err = chat(State(state), Json(request)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_500() {
        let state = state_with(FailingClient);
        let request = ChatRequest {
            message: "What is naloxone?".to_string(),
            mode: default_mode(),
        };

        let err = chat(State(state), Json(request)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
