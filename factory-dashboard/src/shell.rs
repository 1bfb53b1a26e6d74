//! Dashboard shell
//!
//! Async driver around [`DashboardState`]. The state lock is never held
//! across a call into the source, so refreshes, filter changes and waiver
//! submissions may overlap; request fencing in the state decides which
//! fetch result wins.

use tokio::sync::Mutex;

use factory_core::domain::filter::{FactoryFilters, FilterUpdate};
use factory_core::dto::CreateWaiver;

use crate::source::{FactorySource, WaiverError};
use crate::state::{DashboardAction, DashboardState, WaiverDialog};
use crate::view::DashboardView;

pub struct Dashboard<S> {
    source: S,
    state: Mutex<DashboardState>,
}

impl<S: FactorySource> Dashboard<S> {
    pub fn new(source: S, filters: FactoryFilters) -> Self {
        Self {
            source,
            state: Mutex::new(DashboardState::new(filters)),
        }
    }

    /// Re-fetch the snapshot for the current filters
    ///
    /// Returns `true` if this fetch's outcome was applied, `false` if a newer
    /// fetch was issued in the meantime and this one was discarded.
    pub async fn refresh(&self) -> bool {
        let (id, filters) = {
            let mut state = self.state.lock().await;
            (state.begin_fetch(), state.filters.clone())
        };

        tracing::debug!("Fetching snapshot (request {}, channel {})", id, filters.channel);
        let result = self.source.fetch(&filters).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(snapshot) => {
                let applied = state.apply(DashboardAction::FetchSucceeded(id, Box::new(snapshot)));
                if applied {
                    tracing::info!(
                        "Dashboard refreshed: {} run(s)",
                        state.snapshot.as_ref().map_or(0, |s| s.transactions.len())
                    );
                }
                applied
            }
            Err(e) => {
                let applied = state.apply(DashboardAction::FetchFailed(id, e.to_string()));
                if applied {
                    tracing::warn!("Dashboard refresh failed: {}", e);
                }
                applied
            }
        }
    }

    /// Update filters immediately, then re-fetch if they changed
    pub async fn update_filters(&self, update: FilterUpdate) -> bool {
        let changed = self
            .state
            .lock()
            .await
            .apply(DashboardAction::UpdateFilters(update));
        if !changed {
            return false;
        }
        self.refresh().await
    }

    /// Apply a local UI action (row toggles, clicks, dialog edits)
    pub async fn dispatch(&self, action: DashboardAction) -> bool {
        self.state.lock().await.apply(action)
    }

    /// Submit the open waiver dialog
    ///
    /// On success the dialog closes. On failure it stays open with the
    /// entered reason intact and the failure recorded on the dialog. If the
    /// dialog was closed or reopened for another waiver while this one was in
    /// flight, the outcome is only returned, not applied.
    pub async fn submit_waiver(&self) -> Result<(), WaiverError> {
        let waiver = {
            let mut state = self.state.lock().await;
            let prepared = match &state.waiver {
                Some(dialog) => prepare_waiver(dialog),
                None => return Err(WaiverError::NotOpen),
            };
            match prepared {
                Ok(waiver) => {
                    state.apply(DashboardAction::WaiverSubmitted);
                    waiver
                }
                Err(e) => {
                    state.apply(DashboardAction::WaiverFailed(e.to_string()));
                    return Err(e);
                }
            }
        };

        let transaction_id = waiver.transaction_id.clone();
        let policy = waiver.policy.clone();
        let result = self.source.create_waiver(waiver).await;

        let mut state = self.state.lock().await;
        let same_dialog = state.waiver.as_ref().is_some_and(|dialog| {
            dialog.transaction_id == transaction_id && dialog.policy.trim() == policy
        });
        if !same_dialog {
            tracing::debug!(
                "Waiver dialog for transaction {} changed during submission",
                transaction_id
            );
        }

        match result {
            Ok(()) => {
                tracing::info!("Waiver created for transaction {}", transaction_id);
                if same_dialog {
                    state.apply(DashboardAction::WaiverSucceeded);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Waiver for transaction {} failed: {}", transaction_id, e);
                if same_dialog {
                    state.apply(DashboardAction::WaiverFailed(e.to_string()));
                }
                Err(e)
            }
        }
    }

    /// Render-ready view of the current state
    pub async fn view(&self) -> DashboardView {
        DashboardView::from_state(&*self.state.lock().await)
    }

    /// Copy of the current state
    pub async fn state(&self) -> DashboardState {
        self.state.lock().await.clone()
    }
}

fn prepare_waiver(dialog: &WaiverDialog) -> Result<CreateWaiver, WaiverError> {
    let policy = dialog.policy.trim();
    if policy.is_empty() {
        return Err(WaiverError::MissingPolicy);
    }
    let reason = dialog.reason.trim();
    if reason.is_empty() {
        return Err(WaiverError::MissingReason);
    }

    Ok(CreateWaiver {
        transaction_id: dialog.transaction_id.clone(),
        policy: policy.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FactorySnapshot, SourceError};
    use async_trait::async_trait;
    use factory_core::domain::filter::Channel;
    use factory_core::domain::module::ModuleEntity;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::oneshot;

    type FetchResult = Result<FactorySnapshot, SourceError>;

    /// Source whose fetches complete when the test says so
    #[derive(Default)]
    struct FakeSource {
        pending: StdMutex<VecDeque<oneshot::Receiver<FetchResult>>>,
        filters_seen: StdMutex<Vec<FactoryFilters>>,
        waivers: StdMutex<Vec<CreateWaiver>>,
        waiver_failure: StdMutex<Option<WaiverError>>,
        waiver_gate: StdMutex<Option<oneshot::Receiver<()>>>,
    }

    impl FakeSource {
        fn gate(&self) -> oneshot::Sender<FetchResult> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push_back(rx);
            tx
        }

        fn ready(&self, result: FetchResult) {
            let _ = self.gate().send(result);
        }
    }

    #[async_trait]
    impl FactorySource for FakeSource {
        async fn fetch(&self, filters: &FactoryFilters) -> FetchResult {
            self.filters_seen.lock().unwrap().push(filters.clone());
            let gate = self.pending.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(SourceError::Unavailable("gate dropped".to_string()))),
                None => Err(SourceError::Unavailable("no response queued".to_string())),
            }
        }

        async fn create_waiver(&self, waiver: CreateWaiver) -> Result<(), WaiverError> {
            self.waivers.lock().unwrap().push(waiver);
            let gate = self.waiver_gate.lock().unwrap().take();
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            match self.waiver_failure.lock().unwrap().clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn snapshot_named(name: &str) -> FactorySnapshot {
        FactorySnapshot::new(
            vec![],
            vec![],
            vec![ModuleEntity {
                id: "m".to_string(),
                name: name.to_string(),
            }],
            vec![],
            vec![],
        )
    }

    fn module_name(state: &DashboardState) -> Option<String> {
        state
            .snapshot
            .as_ref()
            .and_then(|s| s.modules.first())
            .map(|m| m.name.clone())
    }

    #[tokio::test]
    async fn test_refresh_applies_snapshot() {
        let source = FakeSource::default();
        source.ready(Ok(snapshot_named("first")));
        let dashboard = Dashboard::new(source, FactoryFilters::default());

        assert!(dashboard.refresh().await);
        let state = dashboard.state().await;
        assert!(!state.loading);
        assert_eq!(module_name(&state).as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_error() {
        let source = FakeSource::default();
        source.ready(Err(SourceError::Unavailable("db down".to_string())));
        let dashboard = Dashboard::new(source, FactoryFilters::default());

        assert!(dashboard.refresh().await);
        let view = dashboard.view().await;
        assert_eq!(view.error.as_deref(), Some("Source unavailable: db down"));
        assert!(view.refresh_enabled);
    }

    #[tokio::test]
    async fn test_late_response_from_older_refresh_is_discarded() {
        let source = FakeSource::default();
        let first = source.gate();
        let second = source.gate();
        let dashboard = Dashboard::new(source, FactoryFilters::default());

        let (first_applied, second_applied, _) = tokio::join!(
            dashboard.refresh(),
            dashboard.refresh(),
            async {
                let _ = second.send(Ok(snapshot_named("newer")));
                tokio::task::yield_now().await;
                let _ = first.send(Ok(snapshot_named("older")));
            }
        );

        assert!(!first_applied);
        assert!(second_applied);
        let state = dashboard.state().await;
        assert_eq!(module_name(&state).as_deref(), Some("newer"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_filter_change_is_immediate_and_refetches() {
        let source = FakeSource::default();
        source.ready(Ok(snapshot_named("beta runs")));
        let dashboard = Dashboard::new(source, FactoryFilters::default());

        assert!(dashboard.update_filters(FilterUpdate::channel(Channel::Beta)).await);
        assert_eq!(dashboard.state().await.filters.channel, Channel::Beta);
        assert_eq!(
            dashboard.source.filters_seen.lock().unwrap()[0].channel,
            Channel::Beta
        );

        // Unchanged filters do not trigger another fetch
        assert!(!dashboard.update_filters(FilterUpdate::channel(Channel::Beta)).await);
        assert_eq!(dashboard.source.filters_seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_waiver_success_closes_dialog() {
        let dashboard = Dashboard::new(FakeSource::default(), FactoryFilters::default());
        dashboard
            .dispatch(DashboardAction::OpenWaiver {
                transaction_id: "t1".to_string(),
                policy: "coverage".to_string(),
            })
            .await;
        dashboard
            .dispatch(DashboardAction::EditWaiverReason("  quarantined suite ".to_string()))
            .await;

        assert_eq!(dashboard.submit_waiver().await, Ok(()));
        assert!(dashboard.state().await.waiver.is_none());
        assert_eq!(
            dashboard.source.waivers.lock().unwrap()[0],
            CreateWaiver {
                transaction_id: "t1".to_string(),
                policy: "coverage".to_string(),
                reason: "quarantined suite".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_waiver_failure_keeps_dialog_and_reason() {
        let source = FakeSource::default();
        *source.waiver_failure.lock().unwrap() =
            Some(WaiverError::Rejected("policy not waivable".to_string()));
        let dashboard = Dashboard::new(source, FactoryFilters::default());
        dashboard
            .dispatch(DashboardAction::OpenWaiver {
                transaction_id: "t1".to_string(),
                policy: "security".to_string(),
            })
            .await;
        dashboard
            .dispatch(DashboardAction::EditWaiverReason("urgent hotfix".to_string()))
            .await;

        let result = dashboard.submit_waiver().await;
        assert!(matches!(result, Err(WaiverError::Rejected(_))));

        let dialog = dashboard.state().await.waiver.unwrap();
        assert_eq!(dialog.reason, "urgent hotfix");
        assert!(!dialog.submitting);
        assert_eq!(
            dialog.error.as_deref(),
            Some("Waiver rejected: policy not waivable")
        );
    }

    #[tokio::test]
    async fn test_waiver_validation_skips_source() {
        let dashboard = Dashboard::new(FakeSource::default(), FactoryFilters::default());
        assert_eq!(dashboard.submit_waiver().await, Err(WaiverError::NotOpen));

        dashboard
            .dispatch(DashboardAction::OpenWaiver {
                transaction_id: "t1".to_string(),
                policy: "lint".to_string(),
            })
            .await;
        dashboard
            .dispatch(DashboardAction::EditWaiverReason("   ".to_string()))
            .await;

        assert_eq!(
            dashboard.submit_waiver().await,
            Err(WaiverError::MissingReason)
        );
        assert!(dashboard.source.waivers.lock().unwrap().is_empty());
        assert!(dashboard.state().await.waiver.is_some());
    }

    fn open_waiver(transaction_id: &str, policy: &str) -> DashboardAction {
        DashboardAction::OpenWaiver {
            transaction_id: transaction_id.to_string(),
            policy: policy.to_string(),
        }
    }

    #[tokio::test]
    async fn test_waiver_outcome_ignores_reopened_dialog() {
        let source = FakeSource::default();
        let (release, gate) = oneshot::channel();
        *source.waiver_gate.lock().unwrap() = Some(gate);
        *source.waiver_failure.lock().unwrap() =
            Some(WaiverError::Unavailable("timeout".to_string()));
        let dashboard = Dashboard::new(source, FactoryFilters::default());

        dashboard.dispatch(open_waiver("t1", "coverage")).await;
        dashboard
            .dispatch(DashboardAction::EditWaiverReason("flaky runner".to_string()))
            .await;

        let (result, _) = tokio::join!(dashboard.submit_waiver(), async {
            dashboard.dispatch(DashboardAction::CloseWaiver).await;
            dashboard.dispatch(open_waiver("t2", "coverage")).await;
            let _ = release.send(());
        });

        assert!(matches!(result, Err(WaiverError::Unavailable(_))));
        let dialog = dashboard.state().await.waiver.unwrap();
        assert_eq!(dialog.transaction_id, "t2");
        assert_eq!(dialog.error, None);
        assert!(!dialog.submitting);
    }

    #[tokio::test]
    async fn test_waiver_success_leaves_other_dialog_open() {
        let source = FakeSource::default();
        let (release, gate) = oneshot::channel();
        *source.waiver_gate.lock().unwrap() = Some(gate);
        let dashboard = Dashboard::new(source, FactoryFilters::default());

        dashboard.dispatch(open_waiver("t1", "lint")).await;
        dashboard
            .dispatch(DashboardAction::EditWaiverReason("generated code".to_string()))
            .await;

        let (result, _) = tokio::join!(dashboard.submit_waiver(), async {
            dashboard.dispatch(open_waiver("t1", "security")).await;
            let _ = release.send(());
        });

        assert_eq!(result, Ok(()));
        let dialog = dashboard.state().await.waiver.unwrap();
        assert_eq!(dialog.policy, "security");
    }
}
