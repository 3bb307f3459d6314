//! Configuration for the question-answering service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Reference document configuration
    #[serde(default)]
    pub document: DocumentConfig,
    /// Relevance gate configuration
    #[serde(default)]
    pub relevance: RelevanceConfig,
    /// Prompt assembly configuration
    #[serde(default)]
    pub prompt: PromptConfig,
    /// Model API configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

impl QaConfig {
    /// Load configuration from the TOML file named by `QA_CONFIG`
    /// (default: `config.toml`), then apply environment overrides.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load() -> Result<Self> {
        let path = std::env::var("QA_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = if std::path::Path::new(&path).exists() {
            let raw = std::fs::read_to_string(&path)?;
            toml::from_str(&raw).map_err(|e| Error::config(format!("{}: {}", path, e)))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables take precedence over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(path) = std::env::var("DOCUMENT_PATH") {
            self.document.path = PathBuf::from(path);
        }
    }

    /// Resolve the model API credential.
    ///
    /// A mounted secret file is preferred; the environment variable is the
    /// fallback. Startup must fail when neither resolves; this is the only
    /// fatal condition in the service.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(raw) = std::fs::read_to_string(&self.llm.api_key_file) {
            let key = raw.trim();
            if !key.is_empty() {
                tracing::debug!("API key loaded from {}", self.llm.api_key_file.display());
                return Ok(key.to_string());
            }
        }

        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                tracing::debug!("API key loaded from ${}", self.llm.api_key_env);
                Ok(key.trim().to_string())
            }
            _ => Err(Error::config(format!(
                "no API credential found: checked secret file {} and ${}",
                self.llm.api_key_file.display(),
                self.llm.api_key_env
            ))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Directory holding the chat UI assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Reference document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the fixed reference document
    pub path: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("reference.pdf"),
        }
    }
}

/// Relevance gate strategy selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    /// No gate: every question is treated as relevant
    Off,
    /// Case-insensitive keyword containment against `keywords`
    #[default]
    Keyword,
    /// One short model classification call per question
    Model,
}

/// Relevance gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Gate strategy
    #[serde(default)]
    pub mode: GateMode,
    /// Topic keywords for the keyword strategy
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Topic description embedded in the model-classification instruction
    #[serde(default = "default_topics")]
    pub topics: String,
    /// Fixed reply for out-of-scope questions
    #[serde(default = "default_out_of_scope_message")]
    pub out_of_scope_message: String,
}

fn default_keywords() -> Vec<String> {
    [
        "opioid", "overdose", "withdrawal", "painkiller", "fentanyl", "narcotic", "analgesic",
        "opiate", "addiction", "naloxone", "rehab", "heroin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_topics() -> String {
    "opioids, overdose, withdrawal, prescription painkillers, fentanyl, narcotics, \
     addiction, naloxone, and rehab"
        .to_string()
}

fn default_out_of_scope_message() -> String {
    "Sorry, I can only answer questions related to the topics this assistant covers.".to_string()
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            mode: GateMode::default(),
            keywords: default_keywords(),
            topics: default_topics(),
            out_of_scope_message: default_out_of_scope_message(),
        }
    }
}

/// Prompt assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// System-role instruction sent with every answer request
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
    /// Truncate the embedded document text to this many leading characters.
    /// Unset embeds the full text.
    #[serde(default)]
    pub max_context_chars: Option<usize>,
}

fn default_system_instruction() -> String {
    "Answer the question using only the provided document content.".to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
            max_context_chars: None,
        }
    }
}

/// Wire convention used by the model API client
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Structured response deserialized into typed structs
    #[default]
    Chat,
    /// Older convention: response walked as a nested keyed JSON map
    Legacy,
}

/// Model API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    pub api_base: String,
    /// Generation model name
    pub model: String,
    /// Response wire convention
    #[serde(default)]
    pub wire_format: WireFormat,
    /// Maximum output tokens for answer generation
    pub max_tokens: u32,
    /// Sampling temperature for answer generation
    pub temperature: f32,
    /// Maximum output tokens for the relevance classification call
    pub classify_max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transport failures
    pub max_retries: u32,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Secret file holding the API key (preferred over the variable)
    pub api_key_file: PathBuf,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            wire_format: WireFormat::default(),
            max_tokens: 2048,
            temperature: 0.7,
            classify_max_tokens: 10, // short categorical answers only
            timeout_secs: 30,
            max_retries: 2,
            api_key_env: "LLM_API_KEY".to_string(),
            api_key_file: PathBuf::from("/run/secrets/llm_api_key"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = QaConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.relevance.mode, GateMode::Keyword);
        assert!(config.prompt.max_context_chars.is_none());
        assert_eq!(config.llm.wire_format, WireFormat::Chat);
    }

    #[test]
    fn secret_file_is_preferred_over_the_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sk-from-file").unwrap();

        let mut config = QaConfig::default();
        config.llm.api_key_file = file.path().to_path_buf();
        config.llm.api_key_env = "GROUNDED_QA_TEST_KEY_UNSET".to_string();

        assert_eq!(config.resolve_api_key().unwrap(), "sk-from-file");
    }

    #[test]
    fn env_var_is_the_fallback() {
        let mut config = QaConfig::default();
        config.llm.api_key_file = PathBuf::from("/nonexistent/secret");
        config.llm.api_key_env = "GROUNDED_QA_TEST_KEY_FALLBACK".to_string();
        std::env::set_var("GROUNDED_QA_TEST_KEY_FALLBACK", "sk-from-env");

        assert_eq!(config.resolve_api_key().unwrap(), "sk-from-env");
        std::env::remove_var("GROUNDED_QA_TEST_KEY_FALLBACK");
    }

    #[test]
    fn missing_credential_is_an_error() {
        let mut config = QaConfig::default();
        config.llm.api_key_file = PathBuf::from("/nonexistent/secret");
        config.llm.api_key_env = "GROUNDED_QA_TEST_KEY_MISSING".to_string();

        assert!(config.resolve_api_key().is_err());
    }

    #[test]
    fn gate_mode_parses_from_lowercase_toml() {
        let raw = r#"
            [relevance]
            mode = "model"
        "#;
        let config: QaConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.relevance.mode, GateMode::Model);
    }
}
