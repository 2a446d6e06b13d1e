use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Finding, ReviewOutcome, Severity, Technique};

/// One disclosure check: if `technique` is gated and `pattern` is absent
/// from the methods text, report `issue` at `severity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub technique: Technique,
    /// 1-based position within the technique's block.
    pub order: u8,
    /// Literal phrase, matched case-insensitively.
    pub pattern: &'static str,
    pub severity: Severity,
    pub issue: &'static str,
}

impl Rule {
    pub fn finding(&self) -> Finding {
        Finding {
            technique: self.technique,
            severity: self.severity,
            issue: self.issue.to_string(),
        }
    }
}

const fn rule(
    technique: Technique,
    order: u8,
    pattern: &'static str,
    severity: Severity,
    issue: &'static str,
) -> Rule {
    Rule {
        technique,
        order,
        pattern,
        severity,
        issue,
    }
}

/// The fixed rule set, in reporting order: blocks follow [`Technique::ALL`],
/// rules within a block follow `order`.
pub static RULES: [Rule; 12] = [
    rule(Technique::Hplc, 1, "column", Severity::Major, "Column details missing"),
    rule(
        Technique::Hplc,
        2,
        "mobile phase",
        Severity::Major,
        "Mobile phase composition not reported",
    ),
    rule(Technique::Hplc, 3, "flow", Severity::Minor, "Flow rate not specified"),
    rule(
        Technique::Hplc,
        4,
        "wavelength",
        Severity::Minor,
        "Detection wavelength not specified",
    ),
    rule(
        Technique::Hplc,
        5,
        "system suitability",
        Severity::Critical,
        "System suitability not discussed",
    ),
    rule(
        Technique::LcMs,
        1,
        "ionization",
        Severity::Major,
        "Ionization mode not mentioned",
    ),
    rule(
        Technique::LcMs,
        2,
        "internal standard",
        Severity::Critical,
        "Internal standard not used or reported",
    ),
    rule(
        Technique::LcMs,
        3,
        "matrix",
        Severity::Major,
        "Matrix effect evaluation missing",
    ),
    rule(Technique::Ftir, 1, "range", Severity::Minor, "Spectral range not specified"),
    rule(
        Technique::Ftir,
        2,
        "peak",
        Severity::Major,
        "Peak assignment missing or incomplete",
    ),
    rule(Technique::Dsc, 1, "heating rate", Severity::Minor, "Heating rate not specified"),
    rule(
        Technique::Dsc,
        2,
        "melting",
        Severity::Major,
        "Melting point/transition not reported",
    ),
];

/// Case-insensitive matcher for each entry of [`RULES`], same index.
static RULE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|r| Regex::new(&format!("(?i){}", regex::escape(r.pattern))).unwrap())
        .collect()
});

/// Rules belonging to one technique, in evaluation order.
pub fn rules_for(technique: Technique) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |r| r.technique == technique)
}

/// Techniques whose gating keyword occurs in `text`, in block order.
pub fn gated_techniques(text: &str) -> Vec<Technique> {
    let lowered = text.to_lowercase();
    Technique::ALL
        .into_iter()
        .filter(|t| t.is_gated_lowercase(&lowered))
        .collect()
}

/// Run the rule set over a methods section.
///
/// Each gated technique's rules are evaluated independently; a rule whose
/// phrase is missing yields a finding. Output order is fixed by [`RULES`].
pub fn run_checks(methods_text: &str) -> ReviewOutcome {
    let gated = gated_techniques(methods_text);
    tracing::debug!(?gated, "gated techniques");

    let findings: Vec<Finding> = RULES
        .iter()
        .zip(RULE_RES.iter())
        .filter(|(rule, _)| gated.contains(&rule.technique))
        .filter(|(_, re)| !re.is_match(methods_text))
        .map(|(rule, _)| rule.finding())
        .collect();

    ReviewOutcome::from_findings(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(outcome: &ReviewOutcome) -> Vec<&str> {
        outcome.findings().iter().map(|f| f.issue.as_str()).collect()
    }

    #[test]
    fn table_is_in_block_then_order_sequence() {
        let mut expected: Vec<(Technique, u8)> = RULES.iter().map(|r| (r.technique, r.order)).collect();
        expected.sort();
        let actual: Vec<(Technique, u8)> = RULES.iter().map(|r| (r.technique, r.order)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn orders_are_contiguous_per_block() {
        for technique in Technique::ALL {
            let orders: Vec<u8> = rules_for(technique).map(|r| r.order).collect();
            let expected: Vec<u8> = (1..=orders.len() as u8).collect();
            assert_eq!(orders, expected, "{technique}");
        }
        assert_eq!(rules_for(Technique::Hplc).count(), 5);
        assert_eq!(rules_for(Technique::LcMs).count(), 3);
        assert_eq!(rules_for(Technique::Ftir).count(), 2);
        assert_eq!(rules_for(Technique::Dsc).count(), 2);
    }

    #[test]
    fn no_gate_no_findings() {
        let outcome = run_checks("We measured the column flow rate at a fixed wavelength.");
        assert!(outcome.is_clean());
    }

    #[test]
    fn hplc_gate_alone_reports_all_hplc_rules() {
        let outcome = run_checks("Samples were analysed by HPLC.");
        assert_eq!(
            issues(&outcome),
            vec![
                "Column details missing",
                "Mobile phase composition not reported",
                "Flow rate not specified",
                "Detection wavelength not specified",
                "System suitability not discussed",
            ]
        );
        assert!(outcome.findings().iter().all(|f| f.technique == Technique::Hplc));
    }

    #[test]
    fn hplc_fully_documented_is_clean() {
        let text = "HPLC: C18 column, mobile phase water/acetonitrile, flow 1 mL/min, \
                    wavelength 254 nm, system suitability verified.";
        assert_eq!(run_checks(text), ReviewOutcome::NoIssues);
    }

    #[test]
    fn rule_patterns_ignore_case() {
        let text = "hplc with COLUMN, Mobile Phase, FLOW, WaveLength and System Suitability";
        assert!(run_checks(text).is_clean());
    }

    #[test]
    fn lc_ms_either_spelling_gates() {
        for text in ["LC-MS method", "LC/MS method"] {
            let outcome = run_checks(text);
            assert_eq!(
                issues(&outcome),
                vec![
                    "Ionization mode not mentioned",
                    "Internal standard not used or reported",
                    "Matrix effect evaluation missing",
                ],
                "{text}"
            );
        }
    }

    #[test]
    fn lc_ms_text_also_gates_nothing_else() {
        // "lc-ms" does not contain "hplc"
        let outcome = run_checks("LC-MS with electrospray ionization and a matrix study");
        assert_eq!(outcome.techniques(), vec![Technique::LcMs]);
        assert_eq!(issues(&outcome), vec!["Internal standard not used or reported"]);
    }

    #[test]
    fn overlapping_techniques_evaluate_independently() {
        let outcome = run_checks("HPLC-DSC and FTIR, LC/MS too");
        assert_eq!(
            outcome.techniques(),
            vec![
                Technique::Hplc,
                Technique::LcMs,
                Technique::Ftir,
                Technique::Dsc
            ]
        );
        assert_eq!(outcome.len(), RULES.len());
        let produced: Vec<&str> = issues(&outcome);
        let table: Vec<&str> = RULES.iter().map(|r| r.issue).collect();
        assert_eq!(produced, table);
    }

    #[test]
    fn dsc_findings_with_severity() {
        let outcome = run_checks("DSC thermograms recorded at a heating rate of 10 K/min.");
        assert_eq!(
            outcome.findings(),
            &[Finding {
                technique: Technique::Dsc,
                severity: Severity::Major,
                issue: "Melting point/transition not reported".to_string(),
            }]
        );
    }

    #[test]
    fn gated_techniques_in_block_order() {
        assert_eq!(
            gated_techniques("dsc then ftir then hplc"),
            vec![Technique::Hplc, Technique::Ftir, Technique::Dsc]
        );
        assert!(gated_techniques("nothing relevant").is_empty());
    }

    #[test]
    fn rule_patterns_are_literal() {
        // "mobile phase" must not match across other characters
        let outcome = run_checks("HPLC column flow wavelength system suitability mobile-phase");
        assert_eq!(issues(&outcome), vec!["Mobile phase composition not reported"]);
    }
}
