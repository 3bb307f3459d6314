//! Model client adapters
//!
//! Two wire conventions are in circulation for the hosted model API; both
//! are normalized behind the `LlmClient` trait so callers never see the
//! difference.

pub mod chat_api;
pub mod legacy_api;
pub mod llm;

pub use chat_api::ChatApiClient;
pub use legacy_api::LegacyChatClient;
pub use llm::{CompletionOptions, LlmClient};

use std::sync::Arc;

use crate::config::{LlmConfig, WireFormat};
use crate::error::Error;

/// Build the configured client behind the adapter interface
pub fn build_client(config: &LlmConfig, api_key: String) -> Arc<dyn LlmClient> {
    match config.wire_format {
        WireFormat::Chat => Arc::new(ChatApiClient::new(config, api_key)),
        WireFormat::Legacy => Arc::new(LegacyChatClient::new(config, api_key)),
    }
}

/// Map a non-success HTTP status to the adapter error taxonomy.
///
/// 401/403 are authentication failures and must not be retried; 429 and
/// server errors are transport-class and eligible for retry.
pub(crate) fn error_for_status(status: reqwest::StatusCode, detail: String) -> Error {
    match status.as_u16() {
        401 | 403 => Error::Auth(format!("HTTP {}: {}", status, detail)),
        429 => Error::Transport(format!("HTTP 429 rate limited: {}", detail)),
        500..=599 => Error::Transport(format!("HTTP {}: {}", status, detail)),
        _ => Error::Api(format!("HTTP {}: {}", status, detail)),
    }
}
