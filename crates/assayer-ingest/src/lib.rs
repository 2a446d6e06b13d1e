use std::path::{Path, PathBuf};

use thiserror::Error;

use assayer_core::DecodeError;
use assayer_core::config_file::ConfigFile;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("PDF extraction error: {0}")]
    Decode(#[from] DecodeError),
    #[error("text file {0} is empty")]
    EmptyText(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of assayer-ingest)")]
    NoPdfSupport,
}

/// How an input file is turned into document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    /// Already-extracted text, read as UTF-8.
    PlainText,
}

impl InputKind {
    /// `.txt` is plain text; anything else is treated as PDF.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "txt" => Self::PlainText,
            _ => Self::Pdf,
        }
    }
}

/// Text-extraction settings applied to PDF input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub expand_ligatures: bool,
    pub header_exclusion: f32,
    pub footer_exclusion: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            expand_ligatures: true,
            header_exclusion: 0.0,
            footer_exclusion: 0.0,
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            expand_ligatures: config.expand_ligatures(),
            header_exclusion: config.header_exclusion(),
            footer_exclusion: config.footer_exclusion(),
        }
    }
}

/// Read one input file into document text.
///
/// Dispatches on file extension:
/// - `.txt` → read as UTF-8
/// - anything else → PDF decode (requires `pdf` feature / mupdf)
pub fn load_document(path: &Path, options: &LoadOptions) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    let kind = InputKind::from_path(path);
    tracing::debug!(path = %path.display(), ?kind, "loading document");

    match kind {
        InputKind::PlainText => load_text(path),
        InputKind::Pdf => load_pdf(path, options),
    }
}

fn load_text(path: &Path) -> Result<String, IngestError> {
    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(IngestError::EmptyText(path.to_path_buf()));
    }
    Ok(text)
}

#[cfg(feature = "pdf")]
fn load_pdf(path: &Path, options: &LoadOptions) -> Result<String, IngestError> {
    use assayer_core::PdfBackend;

    let backend = assayer_pdf_mupdf::MupdfBackend::new()
        .with_ligature_expansion(options.expand_ligatures)
        .with_header_exclusion(options.header_exclusion)
        .with_footer_exclusion(options.footer_exclusion);
    Ok(backend.extract_text(path)?)
}

#[cfg(not(feature = "pdf"))]
fn load_pdf(_path: &Path, _options: &LoadOptions) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}
