use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("PDF has no extractable text layer")]
    NoTextLayer,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors turn raw PDF bytes into one plain-text string with pages in
/// document order. Locating the methods section and running the rule set
/// happens in `assayer_parsing`.
pub trait PdfBackend: Send + Sync {
    /// Decode an in-memory PDF to text.
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError>;

    /// Read a PDF from disk and decode it.
    fn extract_text(&self, path: &Path) -> Result<String, DecodeError> {
        let bytes = std::fs::read(path)?;
        self.decode(&bytes)
    }
}
