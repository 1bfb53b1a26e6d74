//! Guardrail aggregation
//!
//! Reduces a transaction's detail lines into per-category verdicts and one
//! overall severity, so a table of runs can be scanned at a glance.

use std::collections::BTreeMap;

use crate::domain::guardrail::{GuardrailResult, Severity};
use crate::domain::transaction::PipelineTransactionLine;

/// Summarize violations by category, keeping the worst severity per category
///
/// Results are ordered by category name, which makes the output independent
/// of line order. Lines without violations contribute nothing.
pub fn summarize(lines: &[PipelineTransactionLine]) -> Vec<GuardrailResult> {
    let mut worst: BTreeMap<&str, Severity> = BTreeMap::new();

    for violation in lines.iter().flat_map(|line| &line.metadata.violations) {
        worst
            .entry(violation.policy.as_str())
            .and_modify(|severity| *severity = (*severity).max(violation.severity))
            .or_insert(violation.severity);
    }

    worst
        .into_iter()
        .map(|(category, severity)| GuardrailResult {
            category: category.to_string(),
            severity,
        })
        .collect()
}

/// Worst severity across all results, `Ok` when there are none
pub fn overall_severity(results: &[GuardrailResult]) -> Severity {
    results
        .iter()
        .map(|result| result.severity)
        .max()
        .unwrap_or(Severity::Ok)
}

/// Guardrail verdict for one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailSummary {
    pub overall: Severity,
    pub results: Vec<GuardrailResult>,
}

impl GuardrailSummary {
    pub fn from_lines(lines: &[PipelineTransactionLine]) -> Self {
        let results = summarize(lines);
        Self {
            overall: overall_severity(&results),
            results,
        }
    }

    /// Badge text for the overall verdict
    pub fn badge(&self) -> &'static str {
        self.overall.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(violations: serde_json::Value) -> PipelineTransactionLine {
        serde_json::from_value(json!({
            "id": "line",
            "transaction_id": "txn",
            "metadata": { "violations": violations }
        }))
        .unwrap()
    }

    fn result(category: &str, severity: Severity) -> GuardrailResult {
        GuardrailResult {
            category: category.to_string(),
            severity,
        }
    }

    #[test]
    fn test_overall_of_nothing_is_ok() {
        assert_eq!(overall_severity(&[]), Severity::Ok);
    }

    #[test]
    fn test_overall_is_maximum() {
        let results = vec![
            result("a", Severity::Info),
            result("b", Severity::Error),
            result("c", Severity::Warn),
        ];
        assert_eq!(overall_severity(&results), Severity::Error);
    }

    #[test]
    fn test_lower_result_never_changes_overall() {
        let mut results = vec![result("a", Severity::Warn)];
        for lower in [Severity::Ok, Severity::Info] {
            results.push(result("extra", lower));
            assert_eq!(overall_severity(&results), Severity::Warn);
        }
    }

    #[test]
    fn test_single_info_is_info() {
        let lines = vec![line(json!([{ "policy": "docs", "severity": "info" }]))];
        let summary = GuardrailSummary::from_lines(&lines);
        assert_eq!(summary.overall, Severity::Info);
        assert_eq!(summary.badge(), "INFO");
    }

    #[test]
    fn test_lines_without_violations_contribute_nothing() {
        let bare: PipelineTransactionLine =
            serde_json::from_value(json!({ "id": "l", "transaction_id": "t" })).unwrap();
        let lines = vec![bare, line(json!([])), line(json!(null))];
        assert!(summarize(&lines).is_empty());
    }

    #[test]
    fn test_worst_severity_per_category() {
        let lines = vec![
            line(json!([{ "policy": "p1", "severity": "warn" }])),
            line(json!([{ "policy": "p1", "severity": "error" }])),
            line(json!([{ "policy": "p2", "severity": "info" }])),
        ];

        let results = summarize(&lines);
        assert_eq!(
            results,
            vec![result("p1", Severity::Error), result("p2", Severity::Info)]
        );
        assert_eq!(overall_severity(&results), Severity::Error);
        assert_eq!(overall_severity(&results).label(), "ERROR");
    }

    #[test]
    fn test_same_severity_tie_is_kept() {
        let lines = vec![
            line(json!([{ "policy": "lint", "severity": "warn" }])),
            line(json!([{ "policy": "lint", "severity": "warn" }])),
        ];
        assert_eq!(summarize(&lines), vec![result("lint", Severity::Warn)]);
    }

    #[test]
    fn test_summarize_ignores_line_order() {
        let lines = vec![
            line(json!([{ "policy": "p1", "severity": "warn" }, { "policy": "p3", "severity": "ok" }])),
            line(json!([{ "policy": "p2", "severity": "info" }])),
            line(json!([{ "policy": "p1", "severity": "error" }])),
        ];
        let expected = summarize(&lines);

        let mut reversed = lines.clone();
        reversed.reverse();
        assert_eq!(summarize(&reversed), expected);

        let rotated = vec![lines[1].clone(), lines[2].clone(), lines[0].clone()];
        assert_eq!(summarize(&rotated), expected);
    }

    #[test]
    fn test_empty_lines_pass() {
        let summary = GuardrailSummary::from_lines(&[]);
        assert!(summary.results.is_empty());
        assert_eq!(summary.overall, Severity::Ok);
        assert_eq!(summary.badge(), "PASS");
    }
}
