use std::path::Path;

use crate::rules::run_checks;
use crate::section::locate_methods_section;
use crate::{PdfBackend, ReviewError, ReviewOutcome};

/// Where the reviewed text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionSource {
    /// A methods header followed by a trailer keyword was found.
    Located { header: String, trailer: String },
    /// No methods section was found; the whole document was reviewed.
    FullDocument,
}

/// Result of one analysis pass over a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub methods_section: String,
    pub section: SectionSource,
    pub outcome: ReviewOutcome,
}

/// Locate the methods section in already-extracted text and run the checks.
pub fn review_text(document: &str) -> Review {
    let (methods_section, section) = match locate_methods_section(document) {
        Some(m) => {
            tracing::debug!(
                header = m.header,
                trailer = m.trailer,
                start = m.body_range.start,
                end = m.body_range.end,
                "methods section located"
            );
            (
                m.body,
                SectionSource::Located {
                    header: m.header.to_string(),
                    trailer: m.trailer.to_string(),
                },
            )
        }
        None => {
            tracing::warn!(
                chars = document.chars().count(),
                "no methods section found, reviewing full document"
            );
            (document, SectionSource::FullDocument)
        }
    };

    let outcome = run_checks(methods_section);
    tracing::info!(findings = outcome.len(), "review complete");

    Review {
        methods_section: methods_section.to_string(),
        section,
        outcome,
    }
}

/// Decode a PDF from disk with `backend`, then review it.
///
/// A decode failure ends the run; nothing is reviewed.
pub fn review_pdf(path: &Path, backend: &dyn PdfBackend) -> Result<Review, ReviewError> {
    let text = backend.extract_text(path)?;
    Ok(review_text(&text))
}

/// Decode in-memory PDF bytes with `backend`, then review them.
pub fn review_pdf_bytes(bytes: &[u8], backend: &dyn PdfBackend) -> Result<Review, ReviewError> {
    let text = backend.decode(bytes)?;
    Ok(review_text(&text))
}
