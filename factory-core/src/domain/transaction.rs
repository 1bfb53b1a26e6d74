//! Pipeline transaction domain types
//!
//! One transaction per pipeline stage execution, with zero or more detail
//! lines carrying coverage, timings, artifacts and guardrail violations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::filter::Channel;
use super::guardrail::Violation;
use crate::lenient;

/// Execution status of a pipeline stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
    Blocked,
}

impl StageStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageStatus::Passed | StageStatus::Failed | StageStatus::Blocked
        )
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::Running => write!(f, "running"),
            StageStatus::Passed => write!(f, "passed"),
            StageStatus::Failed => write!(f, "failed"),
            StageStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// A pipeline stage execution record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineTransaction {
    pub id: String,
    /// Encodes module and stage, e.g. `HERA.UNIVERSAL.FACTORY.BUILD.v1`
    pub smart_code: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: StageStatus,
    pub transaction_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub ai_confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: TransactionMetadata,
}

/// Free-form transaction metadata the dashboard understands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub channel: Option<Channel>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub module_id: Option<String>,
}

impl PipelineTransaction {
    /// Stage name taken from the smart code segment after `FACTORY`
    pub fn stage(&self) -> Option<&str> {
        let mut segments = self.smart_code.split('.');
        segments.find(|segment| *segment == "FACTORY")?;
        segments.next().filter(|stage| !stage.is_empty())
    }

    pub fn channel(&self) -> Option<Channel> {
        self.metadata.channel
    }

    pub fn module_id(&self) -> Option<&str> {
        self.metadata.module_id.as_deref()
    }
}

/// A detail row belonging to one pipeline transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineTransactionLine {
    pub id: String,
    pub transaction_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub line_number: u32,
    /// Line category, e.g. `test`, `lint`, `artifact`
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub line_type: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: LineMetadata,
}

/// Structured view of a line's metadata column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineMetadata {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: Option<StageStatus>,
    /// Fraction in [0, 1]
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub coverage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient::skip_malformed")]
    pub violations: Vec<Violation>,
    /// Artifact name to URL
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub artifacts: BTreeMap<String, String>,
}
