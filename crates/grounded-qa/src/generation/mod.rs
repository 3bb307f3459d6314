//! Prompt assembly for grounded answer generation

pub mod prompt;

pub use prompt::{ChatMessage, ChatPrompt, PromptBuilder, Role};
