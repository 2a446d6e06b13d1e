use mupdf::{Document, TextPageFlags};

use assayer_core::{DecodeError, PdfBackend};

mod ligatures;

pub use ligatures::expand_ligatures;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the rule engine and reporting crates do not
/// transitively depend on it.
///
/// Pages are emitted in document order, one `\n` after every text line, and
/// concatenated without a separator. Running headers and footers are kept by
/// default; set an exclusion ratio to drop them.
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// `None` keeps footers.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// `None` keeps headers.
    header_exclusion_ratio: Option<f32>,
    /// Replace typographic ligatures (ﬁ, ﬂ, ...) with plain letters.
    expand_ligatures: bool,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            footer_exclusion_ratio: None,
            header_exclusion_ratio: None,
            expand_ligatures: true,
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    pub fn with_ligature_expansion(mut self, enabled: bool) -> Self {
        self.expand_ligatures = enabled;
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let document = Document::from_bytes(bytes, "application/pdf")
            .map_err(|e| DecodeError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| DecodeError::Extraction(e.to_string()))?
        {
            let page = page_result.map_err(|e| DecodeError::Extraction(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| DecodeError::Extraction(e.to_string()))?;

            // Get page bounds for header/footer exclusion
            let page_bounds = page
                .bounds()
                .map_err(|e| DecodeError::Extraction(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            // Block/line iteration matches PyMuPDF's get_text("text") layout
            let mut page_text = String::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                if let Some(threshold) = header_threshold
                    && block_bounds.y1 <= threshold
                {
                    continue;
                }

                if let Some(threshold) = footer_threshold
                    && block_bounds.y0 >= threshold
                {
                    continue;
                }

                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        let page_count = pages_text.len();
        let text = pages_text.concat();

        if text.trim().is_empty() {
            return Err(DecodeError::NoTextLayer);
        }

        tracing::debug!(pages = page_count, bytes = text.len(), "decoded PDF text");

        if self.expand_ligatures {
            Ok(expand_ligatures(&text))
        } else {
            Ok(text)
        }
    }
}
