use std::io::Write;
use std::path::Path;

use assayer_core::Finding;
use thiserror::Error;

use crate::NO_ISSUES_MESSAGE;
use crate::types::ExportFormat;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize findings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render findings and write them to `path`.
pub fn export_findings(
    findings: &[Finding],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let content = render(findings, format)?;

    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    Ok(())
}

/// Render findings in the given format.
pub fn render(findings: &[Finding], format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::Csv => export_csv(findings),
        ExportFormat::Json => export_json(findings)?,
        ExportFormat::Markdown => export_markdown(findings),
        ExportFormat::Text => export_text(findings),
    })
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// `Technique,Severity,Issue` header, then one row per finding.
pub fn export_csv(findings: &[Finding]) -> String {
    let mut out = String::from("Technique,Severity,Issue\n");
    for f in findings {
        out.push_str(&format!(
            "{},{},{}\n",
            csv_escape(f.technique.as_str()),
            csv_escape(f.severity.as_str()),
            csv_escape(&f.issue),
        ));
    }
    out
}

pub fn export_json(findings: &[Finding]) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(findings)?;
    out.push('\n');
    Ok(out)
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

pub fn export_markdown(findings: &[Finding]) -> String {
    let mut out = String::from("# Analytical Review Findings\n\n");
    if findings.is_empty() {
        out.push_str(NO_ISSUES_MESSAGE);
        out.push_str(".\n");
        return out;
    }
    out.push_str("| Technique | Severity | Issue |\n");
    out.push_str("|-----------|----------|-------|\n");
    for f in findings {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            f.technique,
            f.severity,
            md_escape(&f.issue),
        ));
    }
    out
}

pub fn export_text(findings: &[Finding]) -> String {
    let mut out = String::from("Analytical Review Findings\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    if findings.is_empty() {
        out.push_str(NO_ISSUES_MESSAGE);
        out.push('\n');
        return out;
    }
    for f in findings {
        out.push_str(&format!(
            "{:<9} {:<9} {}\n",
            f.technique.as_str(),
            f.severity.as_str(),
            f.issue
        ));
    }
    out
}
