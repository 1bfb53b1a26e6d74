//! Upstream data source
//!
//! The dashboard never talks to storage itself. Everything it shows comes
//! from a [`FactorySource`], and the only write it performs (waivers) goes
//! back through the same trait.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use factory_client::ClientError;
use factory_core::domain::filter::FactoryFilters;
use factory_core::domain::fiscal::FiscalPeriod;
use factory_core::domain::module::{ModuleEntity, RelationshipRow};
use factory_core::domain::transaction::{PipelineTransaction, PipelineTransactionLine};
use factory_core::dto::CreateWaiver;
use factory_core::kpis::{self, FactoryKpis};

/// Errors raised while fetching a snapshot
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Why a waiver was not recorded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaiverError {
    #[error("No waiver dialog is open")]
    NotOpen,

    #[error("A waiver needs a policy")]
    MissingPolicy,

    #[error("A waiver needs a reason")]
    MissingReason,

    /// The service refused the waiver; resubmitting unchanged will fail again
    #[error("Waiver rejected: {0}")]
    Rejected(String),

    /// The service could not be reached or failed internally
    #[error("Waiver service unavailable: {0}")]
    Unavailable(String),
}

impl From<ClientError> for WaiverError {
    fn from(err: ClientError) -> Self {
        if err.is_client_error() {
            WaiverError::Rejected(err.to_string())
        } else {
            WaiverError::Unavailable(err.to_string())
        }
    }
}

/// Collaborator supplying dashboard data and accepting waivers
#[async_trait]
pub trait FactorySource: Send + Sync {
    /// Fetches everything the dashboard shows for `filters`
    async fn fetch(&self, filters: &FactoryFilters) -> Result<FactorySnapshot, SourceError>;

    /// Records a waiver for one policy on one transaction
    async fn create_waiver(&self, waiver: CreateWaiver) -> Result<(), WaiverError>;
}

/// One consistent read of the upstream tables
#[derive(Debug, Clone, Default)]
pub struct FactorySnapshot {
    pub transactions: Vec<PipelineTransaction>,
    /// Lines keyed by transaction id, ordered by line number
    pub transaction_lines: HashMap<String, Vec<PipelineTransactionLine>>,
    pub modules: Vec<ModuleEntity>,
    pub relationships: Vec<RelationshipRow>,
    pub fiscal_periods: Vec<FiscalPeriod>,
    pub kpis: FactoryKpis,
}

impl FactorySnapshot {
    /// Assemble a snapshot, grouping lines and computing KPIs
    pub fn new(
        transactions: Vec<PipelineTransaction>,
        lines: Vec<PipelineTransactionLine>,
        modules: Vec<ModuleEntity>,
        relationships: Vec<RelationshipRow>,
        fiscal_periods: Vec<FiscalPeriod>,
    ) -> Self {
        let mut transaction_lines: HashMap<String, Vec<PipelineTransactionLine>> = HashMap::new();
        for line in lines {
            transaction_lines
                .entry(line.transaction_id.clone())
                .or_default()
                .push(line);
        }
        for group in transaction_lines.values_mut() {
            group.sort_by_key(|line| line.line_number);
        }

        let kpis = kpis::compute(&transactions, &transaction_lines, &modules);

        Self {
            transactions,
            transaction_lines,
            modules,
            relationships,
            fiscal_periods,
            kpis,
        }
    }

    /// Detail lines of one transaction (empty if none)
    pub fn lines(&self, transaction_id: &str) -> &[PipelineTransactionLine] {
        self.transaction_lines
            .get(transaction_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any fiscal period is closed
    pub fn promotions_blocked(&self) -> bool {
        self.fiscal_periods.iter().any(FiscalPeriod::is_closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(id: &str, txn: &str, number: u32) -> PipelineTransactionLine {
        serde_json::from_value(json!({
            "id": id,
            "transaction_id": txn,
            "line_number": number
        }))
        .unwrap()
    }

    fn period(status: &str) -> FiscalPeriod {
        serde_json::from_value(json!({
            "id": format!("fp-{}", status),
            "name": status,
            "metadata": { "status": status }
        }))
        .unwrap()
    }

    #[test]
    fn test_lines_grouped_and_ordered() {
        let snapshot = FactorySnapshot::new(
            vec![],
            vec![line("b", "t1", 2), line("c", "t2", 1), line("a", "t1", 1)],
            vec![],
            vec![],
            vec![],
        );

        let ids: Vec<_> = snapshot.lines("t1").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(snapshot.lines("t2").len(), 1);
        assert!(snapshot.lines("missing").is_empty());
    }

    #[test]
    fn test_promotions_blocked_by_closed_period() {
        let open = FactorySnapshot::new(vec![], vec![], vec![], vec![], vec![period("open")]);
        assert!(!open.promotions_blocked());

        let closed = FactorySnapshot::new(
            vec![],
            vec![],
            vec![],
            vec![],
            vec![period("open"), period("closed")],
        );
        assert!(closed.promotions_blocked());
    }

    #[test]
    fn test_waiver_error_from_client_error() {
        let rejected: WaiverError = ClientError::api_error(422, "unknown policy").into();
        assert!(matches!(rejected, WaiverError::Rejected(_)));

        let unavailable: WaiverError = ClientError::api_error(502, "bad gateway").into();
        assert!(matches!(unavailable, WaiverError::Unavailable(_)));
    }
}
