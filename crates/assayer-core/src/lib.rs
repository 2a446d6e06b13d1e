use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub mod backend;
pub mod config_file;

pub use backend::{DecodeError, PdfBackend};

/// Analytical technique covered by the review rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Technique {
    #[serde(rename = "HPLC")]
    Hplc,
    #[serde(rename = "LC-MS")]
    LcMs,
    #[serde(rename = "FTIR")]
    Ftir,
    #[serde(rename = "DSC")]
    Dsc,
}

impl Technique {
    /// All techniques, in the order their rule blocks are reported.
    pub const ALL: [Technique; 4] = [
        Technique::Hplc,
        Technique::LcMs,
        Technique::Ftir,
        Technique::Dsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hplc => "HPLC",
            Self::LcMs => "LC-MS",
            Self::Ftir => "FTIR",
            Self::Dsc => "DSC",
        }
    }

    /// Lowercase substrings whose presence activates this technique's rules.
    /// Any one of them is sufficient.
    pub fn gate_keywords(self) -> &'static [&'static str] {
        match self {
            Self::Hplc => &["hplc"],
            Self::LcMs => &["lc-ms", "lc/ms"],
            Self::Ftir => &["ftir"],
            Self::Dsc => &["dsc"],
        }
    }

    /// Whether `text` mentions this technique (case-insensitive substring).
    pub fn is_gated(self, text: &str) -> bool {
        self.is_gated_lowercase(&text.to_lowercase())
    }

    /// Same as [`is_gated`](Self::is_gated) for text that is already lowercased.
    pub fn is_gated_lowercase(self, lowered: &str) -> bool {
        self.gate_keywords().iter().any(|kw| lowered.contains(kw))
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative priority of a finding. Ordered `Minor < Major < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Minor, Severity::Major, Severity::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// A single reported disclosure gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub technique: Technique,
    pub severity: Severity,
    pub issue: String,
}

/// Outcome of running the rule engine over a methods section.
///
/// `NoIssues` is a positive result and must be reported as such; it is never
/// used to signal a failure. A run that has not happened yet is represented by
/// the caller as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    NoIssues,
    /// Always non-empty, in rule-evaluation order.
    Issues(Vec<Finding>),
}

impl ReviewOutcome {
    /// Build an outcome from an ordered list of findings.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        if findings.is_empty() {
            Self::NoIssues
        } else {
            Self::Issues(findings)
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::NoIssues)
    }

    pub fn findings(&self) -> &[Finding] {
        match self {
            Self::NoIssues => &[],
            Self::Issues(findings) => findings,
        }
    }

    pub fn len(&self) -> usize {
        self.findings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }

    /// Count of findings at each severity, in `Severity::ALL` order.
    pub fn count_by_severity(&self) -> [(Severity, usize); 3] {
        Severity::ALL.map(|sev| {
            let n = self
                .findings()
                .iter()
                .filter(|f| f.severity == sev)
                .count();
            (sev, n)
        })
    }

    /// Techniques that produced at least one finding, in block order.
    pub fn techniques(&self) -> Vec<Technique> {
        let mut out: Vec<Technique> = Vec::new();
        for f in self.findings() {
            if !out.contains(&f.technique) {
                out.push(f.technique);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(technique: Technique, severity: Severity, issue: &str) -> Finding {
        Finding {
            technique,
            severity,
            issue: issue.to_string(),
        }
    }

    #[test]
    fn technique_labels() {
        let labels: Vec<&str> = Technique::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(labels, vec!["HPLC", "LC-MS", "FTIR", "DSC"]);
        assert_eq!(Technique::LcMs.to_string(), "LC-MS");
    }

    #[test]
    fn gate_is_case_insensitive() {
        assert!(Technique::Hplc.is_gated("Analysed by Hplc"));
        assert!(Technique::LcMs.is_gated("LC/MS conditions"));
        assert!(Technique::LcMs.is_gated("an lc-ms method"));
        assert!(!Technique::LcMs.is_gated("LCMS without separator"));
        assert!(Technique::Dsc.is_gated("DSC thermogram"));
        assert!(!Technique::Ftir.is_gated("infrared spectroscopy"));
    }

    #[test]
    fn severity_ordering_and_parse() {
        assert!(Severity::Minor < Severity::Major);
        assert!(Severity::Major < Severity::Critical);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn empty_findings_are_no_issues() {
        let outcome = ReviewOutcome::from_findings(vec![]);
        assert!(outcome.is_clean());
        assert!(outcome.findings().is_empty());
        assert_eq!(outcome.len(), 0);
    }

    #[test]
    fn count_by_severity_and_techniques() {
        let outcome = ReviewOutcome::from_findings(vec![
            finding(Technique::Hplc, Severity::Major, "a"),
            finding(Technique::Hplc, Severity::Critical, "b"),
            finding(Technique::Dsc, Severity::Major, "c"),
        ]);
        assert!(!outcome.is_clean());
        assert_eq!(
            outcome.count_by_severity(),
            [
                (Severity::Minor, 0),
                (Severity::Major, 2),
                (Severity::Critical, 1)
            ]
        );
        assert_eq!(outcome.techniques(), vec![Technique::Hplc, Technique::Dsc]);
    }

    #[test]
    fn finding_serializes_with_display_labels() {
        let f = finding(Technique::LcMs, Severity::Critical, "x");
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(
            json,
            r#"{"technique":"LC-MS","severity":"Critical","issue":"x"}"#
        );
    }
}
