//! API routes for the QA server

pub mod ask;
pub mod chat;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build the question-answering routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Browser form endpoint: always 200, answer in-band
        .route("/ask", post(ask::ask))
        // JSON endpoint with the status-coded parallel contract
        .route("/chat", post(chat::chat))
}
