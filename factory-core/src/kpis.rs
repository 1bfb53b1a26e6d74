//! Dashboard KPIs
//!
//! Headline numbers derived from one snapshot of pipeline runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::module::ModuleEntity;
use crate::domain::transaction::{PipelineTransaction, PipelineTransactionLine, StageStatus};

/// KPI card values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactoryKpis {
    pub total_runs: usize,
    pub passed: usize,
    pub failed: usize,
    pub blocked: usize,
    pub running: usize,
    /// Percentage of terminal runs that passed
    pub pass_rate: Option<f64>,
    /// Mean line coverage fraction
    pub average_coverage: Option<f64>,
    pub average_duration_ms: Option<f64>,
    pub average_ai_confidence: Option<f64>,
    pub module_count: usize,
}

/// Compute KPIs for a snapshot
pub fn compute(
    transactions: &[PipelineTransaction],
    lines: &HashMap<String, Vec<PipelineTransactionLine>>,
    modules: &[ModuleEntity],
) -> FactoryKpis {
    let count = |status: StageStatus| transactions.iter().filter(|t| t.status == status).count();

    let passed = count(StageStatus::Passed);
    let failed = count(StageStatus::Failed);
    let blocked = count(StageStatus::Blocked);
    let terminal = transactions.iter().filter(|t| t.status.is_terminal()).count();

    let txn_lines: Vec<&PipelineTransactionLine> = transactions
        .iter()
        .filter_map(|t| lines.get(&t.id))
        .flatten()
        .collect();

    FactoryKpis {
        total_runs: transactions.len(),
        passed,
        failed,
        blocked,
        running: count(StageStatus::Running),
        pass_rate: (terminal > 0).then(|| passed as f64 * 100.0 / terminal as f64),
        average_coverage: mean(txn_lines.iter().filter_map(|l| l.metadata.coverage)),
        average_duration_ms: mean(
            txn_lines
                .iter()
                .filter_map(|l| l.metadata.duration_ms)
                .map(|ms| ms as f64),
        ),
        average_ai_confidence: mean(transactions.iter().filter_map(|t| t.ai_confidence)),
        module_count: modules.len(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
