/// Expand common typographic ligatures found in PDFs.
///
/// Without this, "ﬂow" or "ﬁlter" in a methods section would not match the
/// plain-ASCII rule phrases.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}
