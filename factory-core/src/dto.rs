//! Data Transfer Objects for writes to the universal tables

use serde::{Deserialize, Serialize};

/// Transaction type under which pipeline stage runs are recorded
pub const PIPELINE_TRANSACTION_TYPE: &str = "factory_pipeline";
/// Transaction type under which waivers are recorded
pub const WAIVER_TRANSACTION_TYPE: &str = "factory_waiver";
pub const WAIVER_SMART_CODE: &str = "HERA.UNIVERSAL.FACTORY.WAIVER.v1";

/// Request to waive one guardrail policy for one pipeline transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWaiver {
    pub transaction_id: String,
    pub policy: String,
    pub reason: String,
}

/// Generic transaction row to insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub transaction_type: String,
    pub smart_code: String,
    pub reference_id: Option<String>,
    pub metadata: serde_json::Value,
}

impl From<CreateWaiver> for NewTransaction {
    fn from(waiver: CreateWaiver) -> Self {
        Self {
            transaction_type: WAIVER_TRANSACTION_TYPE.to_string(),
            smart_code: WAIVER_SMART_CODE.to_string(),
            reference_id: Some(waiver.transaction_id),
            metadata: serde_json::json!({
                "policy": waiver.policy,
                "reason": waiver.reason,
            }),
        }
    }
}

/// Identity of a freshly inserted row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
}
