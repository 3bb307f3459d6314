//! grounded-qa: document-grounded question answering over a fixed reference document
//!
//! This crate implements a small web service that answers natural-language
//! questions against the text of one reference document, extracted once at
//! startup. Questions can optionally be gated on topical relevance before a
//! hosted generative model is invoked, and every failure below the HTTP layer
//! is converted into an ordinary in-band answer.

pub mod config;
pub mod document;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod relevance;
pub mod server;

pub use config::QaConfig;
pub use document::ReferenceDocument;
pub use error::{Error, Result};
pub use pipeline::QaPipeline;
