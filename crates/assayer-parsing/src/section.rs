use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Header phrase, shortest body, first trailer keyword after it.
static METHODS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(materials and methods|methodology|experimental)(.*?)(results|discussion|conclusion)",
    )
    .unwrap()
});

/// A located methods section, borrowed from the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch<'a> {
    /// Header phrase as it appears in the document (original casing).
    pub header: &'a str,
    /// Text strictly between the header and the trailer.
    pub body: &'a str,
    /// Trailer keyword that ended the section (original casing).
    pub trailer: &'a str,
    /// Byte range of `body` within the document.
    pub body_range: Range<usize>,
}

/// Locate the methods/experimental section in the document text.
///
/// Finds the leftmost "Materials and Methods", "Methodology" or
/// "Experimental" (case-insensitive, across line breaks) that is followed by
/// "Results", "Discussion" or "Conclusion", and takes everything in between,
/// stopping at the first trailer. Returns `None` if no header is followed by
/// a trailer.
pub fn locate_methods_section(text: &str) -> Option<SectionMatch<'_>> {
    let caps = METHODS_RE.captures(text)?;
    let header = caps.get(1)?;
    let body = caps.get(2)?;
    let trailer = caps.get(3)?;

    Some(SectionMatch {
        header: header.as_str(),
        body: body.as_str(),
        trailer: trailer.as_str(),
        body_range: body.range(),
    })
}

/// Return the methods section, or the whole document when none is found.
pub fn find_methods_section(text: &str) -> &str {
    match locate_methods_section(text) {
        Some(m) => m.body,
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_returns_input_unchanged() {
        let text = "Introduction\nWe studied things.\nResults\nThey worked.";
        assert_eq!(find_methods_section(text), text);
        assert!(locate_methods_section(text).is_none());
    }

    #[test]
    fn header_without_trailer_falls_back() {
        let text = "Experimental\nHPLC on a C18 column.\nReferences";
        assert_eq!(find_methods_section(text), text);
    }

    #[test]
    fn empty_text() {
        assert_eq!(find_methods_section(""), "");
    }

    #[test]
    fn methodology_to_results() {
        let text = "Abstract\nMethodology\nSamples were dried.\nResults\nGood.";
        assert_eq!(find_methods_section(text), "\nSamples were dried.\n");
    }

    #[test]
    fn match_spans_line_breaks_and_ignores_case() {
        let text = "MATERIALS AND METHODS\nline one\nline two\nDISCUSSION";
        let m = locate_methods_section(text).unwrap();
        assert_eq!(m.header, "MATERIALS AND METHODS");
        assert_eq!(m.body, "\nline one\nline two\n");
        assert_eq!(m.trailer, "DISCUSSION");
        assert_eq!(&text[m.body_range.clone()], m.body);
    }

    #[test]
    fn stops_at_first_trailer() {
        let text = "Experimental A conclusion B results C";
        assert_eq!(find_methods_section(text), " A ");
    }

    #[test]
    fn first_header_wins() {
        let text = "Methodology one Experimental two Results three";
        assert_eq!(find_methods_section(text), " one Experimental two ");
    }

    #[test]
    fn later_header_after_trailer_is_ignored() {
        let text = "Methodology first Results middle Experimental second Discussion";
        let m = locate_methods_section(text).unwrap();
        assert_eq!(m.body, " first ");
        assert_eq!(m.trailer, "Results");
    }

    #[test]
    fn trailer_before_any_header_is_skipped() {
        let text = "Results preview. Experimental body Conclusion";
        assert_eq!(find_methods_section(text), " body ");
    }

    #[test]
    fn keywords_match_inside_words() {
        let text = "Experimentally, we ran it; resultsets were stored";
        assert_eq!(find_methods_section(text), "ly, we ran it; ");
    }

    #[test]
    fn adjacent_header_and_trailer_give_empty_body() {
        let text = "ExperimentalResults";
        let m = locate_methods_section(text).unwrap();
        assert_eq!(m.body, "");
        assert_eq!(find_methods_section(text), "");
    }
}
