use thiserror::Error;

pub mod review;
pub mod rules;
pub mod section;

pub use review::{Review, SectionSource, review_pdf, review_pdf_bytes, review_text};
pub use rules::{RULES, Rule, gated_techniques, rules_for, run_checks};
pub use section::{SectionMatch, find_methods_section, locate_methods_section};
// Re-export domain types from core (canonical definitions live there)
pub use assayer_core::{DecodeError, Finding, PdfBackend, ReviewOutcome, Severity, Technique};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("text extraction failed: {0}")]
    Decode(#[from] DecodeError),
}
