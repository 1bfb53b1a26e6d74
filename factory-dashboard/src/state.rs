//! Dashboard view state
//!
//! All per-page UI state lives in one [`DashboardState`] and changes only
//! through [`DashboardState::apply`]. Fetch results carry the request id they
//! answer; only the latest request's result is applied, so an older response
//! arriving late can never overwrite newer data.

use std::collections::BTreeSet;

use factory_core::domain::filter::{FactoryFilters, FilterUpdate};
use factory_core::graph::{DependencyGraph, Point};

use crate::source::FactorySnapshot;

/// Monotonic id tagging each fetch
pub type RequestId = u64;

/// State of the waiver creation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiverDialog {
    pub transaction_id: String,
    pub policy: String,
    pub reason: String,
    pub submitting: bool,
    /// Why the last submission failed
    pub error: Option<String>,
}

/// State transitions
#[derive(Debug, Clone)]
pub enum DashboardAction {
    UpdateFilters(FilterUpdate),
    FetchSucceeded(RequestId, Box<FactorySnapshot>),
    FetchFailed(RequestId, String),
    ToggleRow(String),
    CanvasClicked(Point),
    OpenWaiver {
        transaction_id: String,
        policy: String,
    },
    EditWaiverReason(String),
    WaiverSubmitted,
    WaiverSucceeded,
    WaiverFailed(String),
    CloseWaiver,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub filters: FactoryFilters,
    pub snapshot: Option<FactorySnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    /// Transaction ids whose detail rows are shown
    pub expanded: BTreeSet<String>,
    pub selected_node: Option<String>,
    pub waiver: Option<WaiverDialog>,
    latest_request: RequestId,
}

impl DashboardState {
    pub fn new(filters: FactoryFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Issue the id for a new fetch and mark the state as loading
    pub fn begin_fetch(&mut self) -> RequestId {
        self.latest_request += 1;
        self.loading = true;
        self.latest_request
    }

    /// Refresh is shown disabled while a fetch is in flight
    pub fn can_refresh(&self) -> bool {
        !self.loading
    }

    /// Dependency graph of the current snapshot
    pub fn graph(&self) -> DependencyGraph {
        match &self.snapshot {
            Some(snapshot) => DependencyGraph::build(&snapshot.modules, &snapshot.relationships),
            None => DependencyGraph::default(),
        }
    }

    /// Apply an action; returns whether anything changed
    pub fn apply(&mut self, action: DashboardAction) -> bool {
        match action {
            DashboardAction::UpdateFilters(update) => {
                let before = self.filters.clone();
                self.filters.apply(update);
                self.filters != before
            }
            DashboardAction::FetchSucceeded(id, snapshot) => {
                if !self.is_current(id) {
                    return false;
                }
                self.snapshot = Some(*snapshot);
                self.error = None;
                self.loading = false;
                true
            }
            DashboardAction::FetchFailed(id, message) => {
                if !self.is_current(id) {
                    return false;
                }
                self.error = Some(message);
                self.loading = false;
                true
            }
            DashboardAction::ToggleRow(transaction_id) => self.toggle_row(transaction_id),
            DashboardAction::CanvasClicked(point) => {
                let selected = self.graph().node_at(point).map(|node| node.id.clone());
                let changed = selected != self.selected_node;
                self.selected_node = selected;
                changed
            }
            DashboardAction::OpenWaiver {
                transaction_id,
                policy,
            } => {
                self.waiver = Some(WaiverDialog {
                    transaction_id,
                    policy,
                    reason: String::new(),
                    submitting: false,
                    error: None,
                });
                true
            }
            DashboardAction::EditWaiverReason(reason) => match &mut self.waiver {
                Some(dialog) => {
                    dialog.reason = reason;
                    true
                }
                None => false,
            },
            DashboardAction::WaiverSubmitted => match &mut self.waiver {
                Some(dialog) => {
                    dialog.submitting = true;
                    dialog.error = None;
                    true
                }
                None => false,
            },
            DashboardAction::WaiverSucceeded => self.waiver.take().is_some(),
            DashboardAction::WaiverFailed(message) => match &mut self.waiver {
                // Keep the dialog and the typed reason so the user can retry
                Some(dialog) => {
                    dialog.submitting = false;
                    dialog.error = Some(message);
                    true
                }
                None => false,
            },
            DashboardAction::CloseWaiver => self.waiver.take().is_some(),
        }
    }

    fn is_current(&self, id: RequestId) -> bool {
        if id != self.latest_request {
            tracing::debug!(
                "Dropping stale response for request {} (latest is {})",
                id,
                self.latest_request
            );
            return false;
        }
        true
    }

    fn toggle_row(&mut self, transaction_id: String) -> bool {
        let has_lines = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| !snapshot.lines(&transaction_id).is_empty());
        if !has_lines {
            return false;
        }

        if !self.expanded.remove(&transaction_id) {
            self.expanded.insert(transaction_id);
        }
        true
    }
}
