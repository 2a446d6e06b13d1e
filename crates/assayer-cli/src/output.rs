use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use assayer_core::{ReviewOutcome, Severity};
use assayer_parsing::{RULES, SectionMatch, SectionSource};
use assayer_reporting::{ExportFormat, NO_ISSUES_MESSAGE};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold())?;
    } else {
        writeln!(w, "{}", title)?;
    }
    writeln!(w, "{}", "-".repeat(title.len()))
}

fn severity_cell(severity: Severity, color: ColorMode) -> String {
    let cell = format!("{:<9}", severity.as_str());
    if !color.enabled() {
        return cell;
    }
    match severity {
        Severity::Critical => cell.bold().red().to_string(),
        Severity::Major => cell.yellow().to_string(),
        Severity::Minor => cell.cyan().to_string(),
    }
}

/// Print which part of the document is being reviewed.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    file_name: &str,
    section: &SectionSource,
    section_chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Reviewing {}...", file_name)?;
    match section {
        SectionSource::Located { header, trailer } => {
            writeln!(
                w,
                "Methods section: \"{}\" up to \"{}\" ({} characters)",
                header, trailer, section_chars
            )?;
        }
        SectionSource::FullDocument => {
            let msg = format!(
                "No methods section header found; reviewing the full document ({} characters)",
                section_chars
            );
            if color.enabled() {
                writeln!(w, "{}", msg.yellow())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the truncated methods-section preview.
pub fn print_preview(
    w: &mut dyn Write,
    methods_text: &str,
    max_chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "Extracted Methods Section (preview)", color)?;
    let preview = truncate_preview(methods_text, max_chars);
    if color.enabled() {
        writeln!(w, "{}", preview.dimmed())?;
    } else {
        writeln!(w, "{}", preview)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the findings table, or the positive "no issues" line.
pub fn print_findings(
    w: &mut dyn Write,
    outcome: &ReviewOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "Analytical Review Findings", color)?;

    let findings = match outcome {
        ReviewOutcome::NoIssues => {
            if color.enabled() {
                writeln!(w, "{} {}", "\u{2713}".green(), NO_ISSUES_MESSAGE.green())?;
            } else {
                writeln!(w, "{}", NO_ISSUES_MESSAGE)?;
            }
            writeln!(w)?;
            return Ok(());
        }
        ReviewOutcome::Issues(findings) => findings,
    };

    if color.enabled() {
        writeln!(
            w,
            "{}",
            format!("{:<3} {:<9} {:<9} {}", "#", "Technique", "Severity", "Issue").bold()
        )?;
    } else {
        writeln!(w, "{:<3} {:<9} {:<9} Issue", "#", "Technique", "Severity")?;
    }
    for (i, f) in findings.iter().enumerate() {
        writeln!(
            w,
            "{:<3} {:<9} {} {}",
            i + 1,
            f.technique.as_str(),
            severity_cell(f.severity, color),
            f.issue
        )?;
    }
    writeln!(w)?;
    Ok(())
}

pub fn print_export_done(
    w: &mut dyn Write,
    path: &Path,
    format: ExportFormat,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!(
        "Findings exported ({}) to {}",
        format.label(),
        path.display()
    );
    if color.enabled() {
        writeln!(w, "{}", msg.green())?;
    } else {
        writeln!(w, "{}", msg)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the one-line severity summary.
pub fn print_summary(
    w: &mut dyn Write,
    outcome: &ReviewOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    let [(_, minor), (_, major), (_, critical)] = outcome.count_by_severity();
    let line = format!(
        "Summary: {} finding{} ({} critical, {} major, {} minor)",
        outcome.len(),
        if outcome.len() == 1 { "" } else { "s" },
        critical,
        major,
        minor
    );
    if !color.enabled() {
        writeln!(w, "{}", line)?;
    } else if critical > 0 {
        writeln!(w, "{}", line.red())?;
    } else if outcome.is_clean() {
        writeln!(w, "{}", line.green())?;
    } else {
        writeln!(w, "{}", line.yellow())?;
    }
    Ok(())
}

/// Print the located methods section in full (no checks).
pub fn print_section(
    w: &mut dyn Write,
    file_name: &str,
    located: Option<&SectionMatch<'_>>,
    document: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Methods section of {}", file_name)?;
    match located {
        Some(m) => {
            writeln!(
                w,
                "Header \"{}\", ends before \"{}\" (bytes {}..{})",
                m.header, m.trailer, m.body_range.start, m.body_range.end
            )?;
            writeln!(w)?;
            writeln!(w, "{}", m.body)?;
        }
        None => {
            let msg = "No methods section header found; the full document would be reviewed.";
            if color.enabled() {
                writeln!(w, "{}", msg.yellow())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
            writeln!(w)?;
            writeln!(w, "{}", document)?;
        }
    }
    Ok(())
}

/// Print the built-in rule table.
pub fn print_rules(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    heading(w, "Built-in rule set", color)?;
    writeln!(
        w,
        "{:<9} {:<3} {:<20} {:<9} Issue when absent",
        "Technique", "#", "Phrase", "Severity"
    )?;
    for rule in RULES.iter() {
        writeln!(
            w,
            "{:<9} {:<3} {:<20} {} {}",
            rule.technique.as_str(),
            rule.order,
            format!("\"{}\"", rule.pattern),
            severity_cell(rule.severity, color),
            rule.issue
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assayer_parsing::review_text;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn preview_short_text_untouched() {
        assert_eq!(truncate_preview("abc", 3), "abc");
        assert_eq!(truncate_preview("", 10), "");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(truncate_preview("abcdef", 3), "abc...");
        assert_eq!(truncate_preview("\u{00e9}\u{00e9}\u{00e9}\u{00e9}", 2), "\u{00e9}\u{00e9}...");
    }

    #[test]
    fn preview_does_not_affect_findings() {
        let doc = format!("Experimental {} HPLC column Results", "y".repeat(4000));
        let review = review_text(&doc);
        let preview = truncate_preview(&review.methods_section, 100);
        assert!(!preview.contains("HPLC"));
        // HPLC sits beyond the preview but is still checked
        assert_eq!(review.outcome.len(), 4);
    }

    #[test]
    fn no_issues_prints_positive_message() {
        let out = render(|w| print_findings(w, &ReviewOutcome::NoIssues, ColorMode(false)));
        assert!(out.contains(NO_ISSUES_MESSAGE));
        assert!(!out.contains("Technique"));
    }

    #[test]
    fn findings_table_rows_in_order() {
        let review = review_text("Methodology: FTIR spectra. Results");
        let out = render(|w| print_findings(w, &review.outcome, ColorMode(false)));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "#   Technique Severity  Issue");
        assert_eq!(lines[3], "1   FTIR      Minor     Spectral range not specified");
        assert_eq!(lines[4], "2   FTIR      Major     Peak assignment missing or incomplete");
    }

    #[test]
    fn summary_counts() {
        let review = review_text("Methodology: FTIR spectra. Results");
        let out = render(|w| print_summary(w, &review.outcome, ColorMode(false)));
        assert_eq!(out, "Summary: 2 findings (0 critical, 1 major, 1 minor)\n");
    }

    #[test]
    fn fallback_is_announced() {
        let out = render(|w| {
            print_extraction_summary(w, "paper.pdf", &SectionSource::FullDocument, 42, ColorMode(false))
        });
        assert!(out.contains("reviewing the full document (42 characters)"));
    }

    #[test]
    fn rules_listing_has_every_rule() {
        let out = render(|w| print_rules(w, ColorMode(false)));
        for rule in RULES.iter() {
            assert!(out.contains(rule.issue));
        }
    }
}
