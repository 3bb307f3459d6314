//! Prompt payload types and the bounded prompt assembler

use serde::{Deserialize, Serialize};

use crate::config::PromptConfig;

/// Message role on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message part of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ordered message sequence sent to the model. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub messages: Vec<ChatMessage>,
}

impl ChatPrompt {
    /// Single user message, used by the relevance classification call
    pub fn user_only(content: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(content)],
        }
    }

    /// Concatenated message contents, for matching in tests and logs
    pub fn combined_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builds the bounded answer prompt from the reference document and question
pub struct PromptBuilder {
    system_instruction: String,
    max_context_chars: Option<usize>,
}

impl PromptBuilder {
    pub fn new(system_instruction: impl Into<String>, max_context_chars: Option<usize>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            max_context_chars,
        }
    }

    pub fn from_config(config: &PromptConfig) -> Self {
        Self::new(config.system_instruction.clone(), config.max_context_chars)
    }

    /// Assemble the answer prompt: system instruction, then a user message
    /// embedding the (possibly truncated) document text and the verbatim
    /// question.
    pub fn build(&self, question: &str, document_text: &str) -> ChatPrompt {
        let context = self.truncate(document_text);

        ChatPrompt {
            messages: vec![
                ChatMessage::system(self.system_instruction.clone()),
                ChatMessage::user(format!(
                    "Here is the document content:\n{}\n\nQuestion: {}",
                    context, question
                )),
            ],
        }
    }

    /// Leading character-count truncation. Character-based, not token-aware,
    /// and stable: the same input always yields the same output.
    fn truncate<'a>(&self, text: &'a str) -> &'a str {
        match self.max_context_chars {
            Some(limit) => match text.char_indices().nth(limit) {
                Some((byte_idx, _)) => &text[..byte_idx],
                None => text,
            },
            None => text,
        }
    }
}
