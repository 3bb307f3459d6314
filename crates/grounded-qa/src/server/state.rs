//! Application state for the QA server

use std::sync::Arc;

use crate::config::QaConfig;
use crate::document::ReferenceDocument;
use crate::error::Result;
use crate::pipeline::QaPipeline;
use crate::providers;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: QaConfig,
    pipeline: QaPipeline,
}

impl AppState {
    /// Create new application state.
    ///
    /// Resolves the model API credential (the only fatal startup condition)
    /// and performs the one-time reference document extraction.
    pub fn new(config: QaConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let document = Arc::new(ReferenceDocument::load(&config.document.path));
        if !document.is_available() {
            tracing::warn!("No reference text extracted; answers will lack grounding context");
        }

        let client = providers::build_client(&config.llm, api_key);
        tracing::info!("Model client initialized ({})", client.name());

        let pipeline = QaPipeline::new(&config, document, client);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        })
    }

    /// Assemble state from pre-built parts, bypassing credential and
    /// document resolution. Used by tests.
    pub fn from_parts(config: QaConfig, pipeline: QaPipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &QaConfig {
        &self.inner.config
    }

    /// Get the request pipeline
    pub fn pipeline(&self) -> &QaPipeline {
        &self.inner.pipeline
    }
}
