//! Error types for the question-answering service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fixed user-facing message for credential failures
pub const AUTH_USER_MESSAGE: &str =
    "Authentication error: check the configured model API credentials.";

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request input
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Reference document could not be loaded or parsed
    #[error("Document load error: {0}")]
    DocumentLoad(String),

    /// Model API rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Model API unreachable, timed out, or rate limited
    #[error("Transport error: {0}")]
    Transport(String),

    /// Model API responded with an unexpected shape
    #[error("Unexpected API response: {0}")]
    Api(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create an API-shape error
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// Map the failure to the in-band answer text returned by `/ask`.
    ///
    /// The user-facing contract never signals failure through the status
    /// code, only through message content.
    pub fn user_message(&self) -> String {
        match self {
            Error::Auth(_) => AUTH_USER_MESSAGE.to_string(),
            Error::Transport(detail) => {
                format!("The model service could not be reached: {}", detail)
            }
            other => format!("An error occurred: {}", other),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Status mapping for the /chat contract only; /ask never reaches this.
        let status = match &self {
            Error::Validation(_) | Error::Config(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
