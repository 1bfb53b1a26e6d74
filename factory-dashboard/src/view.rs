//! Composed dashboard page model
//!
//! Everything a front-end needs to draw one frame, derived fresh from the
//! current [`DashboardState`]. Nothing here is cached between frames.

use factory_core::domain::filter::Channel;
use factory_core::domain::transaction::{PipelineTransaction, PipelineTransactionLine};
use factory_core::graph::{DependencyGraph, Inspection, inspect::inspect};
use factory_core::guardrail::GuardrailSummary;
use factory_core::kpis::FactoryKpis;

use crate::state::{DashboardState, WaiverDialog};

/// Advisory shown while any fiscal period is closed
pub const PROMOTIONS_BLOCKED_BANNER: &str =
    "A fiscal period is closed: promotions to stable and LTS are blocked.";

/// One row of the transactions table
#[derive(Debug, Clone)]
pub struct TransactionRow {
    pub transaction: PipelineTransaction,
    pub guardrails: GuardrailSummary,
    pub lines: Vec<PipelineTransactionLine>,
    pub expanded: bool,
}

impl TransactionRow {
    /// Rows without detail lines cannot be expanded
    pub fn expandable(&self) -> bool {
        !self.lines.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub channel: Channel,
    pub loading: bool,
    pub refresh_enabled: bool,
    /// Set when the last fetch failed; the page shows it with a retry action
    pub error: Option<String>,
    pub banner: Option<&'static str>,
    pub kpis: FactoryKpis,
    pub rows: Vec<TransactionRow>,
    pub graph: DependencyGraph,
    pub inspection: Option<Inspection>,
    pub waiver: Option<WaiverDialog>,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let graph = state.graph();
        let inspection = state
            .selected_node
            .as_deref()
            .and_then(|id| inspect(&graph, id));

        let (banner, kpis, rows) = match &state.snapshot {
            Some(snapshot) => {
                let rows = snapshot
                    .transactions
                    .iter()
                    .map(|transaction| {
                        let lines = snapshot.lines(&transaction.id).to_vec();
                        TransactionRow {
                            guardrails: GuardrailSummary::from_lines(&lines),
                            expanded: state.expanded.contains(&transaction.id),
                            transaction: transaction.clone(),
                            lines,
                        }
                    })
                    .collect();
                let banner = snapshot
                    .promotions_blocked()
                    .then_some(PROMOTIONS_BLOCKED_BANNER);
                (banner, snapshot.kpis.clone(), rows)
            }
            None => (None, FactoryKpis::default(), Vec::new()),
        };

        Self {
            channel: state.filters.channel,
            loading: state.loading,
            refresh_enabled: state.can_refresh(),
            error: state.error.clone(),
            banner,
            kpis,
            rows,
            graph,
            inspection,
            waiver: state.waiver.clone(),
        }
    }
}
