//! Factory Dashboard
//!
//! The dashboard shell: owns filter and view state, pulls snapshots from an
//! external [`FactorySource`], and composes guardrail verdicts, KPI cards and
//! the dependency graph into a [`DashboardView`].
//!
//! Architecture:
//! - Source: the collaborator that reads and writes the universal tables
//! - State: an explicit reducer over serializable view state
//! - Shell: async driver with request fencing for refreshes
//! - View: the composed, render-ready page model

pub mod shell;
pub mod source;
pub mod state;
pub mod universal;
pub mod view;

pub use shell::Dashboard;
pub use source::{FactorySnapshot, FactorySource, SourceError, WaiverError};
pub use state::{DashboardAction, DashboardState, RequestId, WaiverDialog};
pub use universal::UniversalSource;
pub use view::{DashboardView, PROMOTIONS_BLOCKED_BANNER, TransactionRow};
