pub mod export;
pub mod types;

pub use export::{ExportError, export_findings, render};
pub use types::ExportFormat;

/// Shown instead of a findings table when the rule set reports nothing.
pub const NO_ISSUES_MESSAGE: &str = "No major issues detected with the basic rule set";
