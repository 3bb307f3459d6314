//! One-time reference document loading
//!
//! The reference document is extracted exactly once at process start and
//! shared read-only by every request. Load failures degrade to an empty
//! document instead of aborting startup: answers simply lose their grounding
//! context while the service stays available.

use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};

/// Immutable extracted text of the fixed reference document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDocument {
    text: String,
}

impl ReferenceDocument {
    /// Load and extract the document at `path`.
    ///
    /// PDF files go through `pdf-extract`, with a per-page `lopdf` fallback
    /// when the primary extractor fails. Any other path is read as plain
    /// text. Pages with no extractable text contribute nothing. All failure
    /// modes produce an empty document and a warning, never an error.
    pub fn load(path: &Path) -> Self {
        let start = Instant::now();

        let text = match Self::extract(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Reference document load failed: {}", e);
                String::new()
            }
        };

        tracing::info!(
            "Reference document loaded in {:?} ({} chars)",
            start.elapsed(),
            text.chars().count()
        );
        tracing::debug!(
            "Extracted text starts with: {:?}",
            text.chars().take(200).collect::<String>()
        );

        Self { text }
    }

    /// Build a document from already-extracted text. Used by tests and by
    /// deployments that ship a pre-extracted text file.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
        }
    }

    /// The extracted text; empty when loading failed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any grounding text is available
    pub fn is_available(&self) -> bool {
        !self.text.is_empty()
    }

    fn extract(path: &Path) -> Result<String> {
        let data = std::fs::read(path).map_err(|e| {
            Error::DocumentLoad(format!("{} not readable: {}", path.display(), e))
        })?;

        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            Self::extract_pdf(&data)
        } else {
            Ok(String::from_utf8_lossy(&data).trim().to_string())
        }
    }

    fn extract_pdf(data: &[u8]) -> Result<String> {
        let raw = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed: {}, trying page-level fallback", e);
                Self::extract_pdf_fallback(data)?
            }
        };

        // Normalize line whitespace and drop blank lines left by extraction
        Ok(raw
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Per-page extraction via lopdf; image-only pages yield nothing.
    fn extract_pdf_fallback(data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::DocumentLoad(format!("failed to parse PDF: {}", e)))?;

        let mut pages_text = Vec::new();

        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => pages_text.push(text.trim().to_string()),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("No text extracted from page {}: {}", page_num, e);
                }
            }
        }

        Ok(pages_text.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loading_the_same_file_twice_is_byte_identical() {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        write!(file, "  Naloxone reverses opioid overdose.\n").unwrap();

        let first = ReferenceDocument::load(file.path());
        let second = ReferenceDocument::load(file.path());

        assert_eq!(first, second);
        assert_eq!(first.text(), "Naloxone reverses opioid overdose.");
    }

    #[test]
    fn missing_file_degrades_to_an_empty_document() {
        let doc = ReferenceDocument::load(Path::new("/nonexistent/reference.pdf"));
        assert_eq!(doc.text(), "");
        assert!(!doc.is_available());
    }

    #[test]
    fn unparseable_pdf_degrades_to_an_empty_document() {
        let mut file = tempfile::NamedTempFile::with_suffix(".pdf").unwrap();
        write!(file, "not actually a pdf").unwrap();

        let doc = ReferenceDocument::load(file.path());
        assert!(!doc.is_available());
    }

    #[test]
    fn from_text_trims_surrounding_whitespace() {
        let doc = ReferenceDocument::from_text("  content \n");
        assert_eq!(doc.text(), "content");
        assert!(doc.is_available());
    }
}
