//! Guardrail domain types

use serde::{Deserialize, Serialize};

/// Severity of a guardrail finding
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Ok < Info < Warn < Error`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Badge text shown for this severity
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok => "PASS",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single policy violation reported by a pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Policy that was violated; also the guardrail category
    pub policy: String,
    #[serde(default)]
    pub message: String,
    pub severity: Severity,
    /// Whether a waiver may suppress this violation
    #[serde(default)]
    pub waivable: bool,
}

/// Worst severity found for one guardrail category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardrailResult {
    pub category: String,
    pub severity: Severity,
}
