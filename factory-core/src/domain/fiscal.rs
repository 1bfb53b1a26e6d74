//! Fiscal period domain types

use serde::{Deserialize, Serialize};

use crate::lenient;

/// An accounting period; closed periods block stable/LTS promotions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    pub id: String,
    #[serde(alias = "entity_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: FiscalPeriodMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiscalPeriodMetadata {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: Option<String>,
}

impl FiscalPeriod {
    pub fn is_closed(&self) -> bool {
        self.metadata.status.as_deref() == Some("closed")
    }
}
