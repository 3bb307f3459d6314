//! Form endpoint returning every outcome as a 200 JSON answer

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};

use crate::server::state::AppState;

/// Form body for `/ask`
#[derive(Debug, Deserialize)]
pub struct AskForm {
    /// The user's question; missing field behaves like an empty question
    #[serde(default)]
    pub question: String,
}

/// JSON body returned by `/ask`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// POST /ask with a form-encoded `question` field.
///
/// Always responds `200 OK` with an `answer` field: validation failures,
/// out-of-scope questions, and upstream model failures are all delivered as
/// ordinary answers. The caller contract never signals failure via status
/// code.
pub async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Json<AskResponse> {
    let answer = state.pipeline().handle(&form.question).await;
    Json(AskResponse { answer })
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
    use crate::error::{Error, Result, AUTH_USER_MESSAGE};
    use crate::generation::ChatPrompt;
    use crate::pipeline::{QaPipeline, INVALID_QUESTION_MESSAGE};
    use crate::providers::{CompletionOptions, LlmClient};

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn complete(&self, _: &ChatPrompt, _: &CompletionOptions) -> Result<String> {
            Err(Error::Auth("401".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn state_with_failing_client() -> AppState {
        let mut config = QaConfig::default();
        config.relevance.mode = GateMode::Off;
        let document = Arc::new(ReferenceDocument::from_text("reference text"));
        let pipeline = QaPipeline::new(&config, document, Arc::new(FailingClient));
        AppState::from_parts(config, pipeline)
    }

    #[tokio::test]
    async fn upstream_auth_failure_is_still_a_200_answer() {
        let state = state_with_failing_client();
        let form = AskForm {
            question: "What is naloxone?".to_string(),
        };

        let response = ask(State(state), Form(form)).await;
        assert_eq!(response.0.answer, AUTH_USER_MESSAGE);

        let http = Json(response.0).into_response();
        assert_eq!(http.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_question_is_still_a_200_answer() {
        let state = state_with_failing_client();
        let form = AskForm {
            question: "   ".to_string(),
        };

        let response = ask(State(state), Form(form)).await;
        assert_eq!(response.0.answer, INVALID_QUESTION_MESSAGE);
    }
}
