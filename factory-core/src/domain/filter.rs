//! Dashboard filter types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::transaction::PipelineTransaction;

/// Release track used to filter pipeline runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "beta")]
    Beta,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "LTS")]
    Lts,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::All => "all",
            Channel::Beta => "beta",
            Channel::Stable => "stable",
            Channel::Lts => "LTS",
        }
    }

    /// Whether a run on `channel` passes this filter
    pub fn matches(&self, channel: Option<Channel>) -> bool {
        match self {
            Channel::All => true,
            wanted => channel == Some(*wanted),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Channel::All),
            "beta" => Ok(Channel::Beta),
            "stable" => Ok(Channel::Stable),
            "lts" => Ok(Channel::Lts),
            _ => Err(format!(
                "unknown channel `{}` (expected all, beta, stable or LTS)",
                s
            )),
        }
    }
}

/// Active dashboard filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryFilters {
    pub channel: Channel,
    pub module_id: Option<String>,
}

/// Partial filter update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub channel: Option<Channel>,
    /// `Some(None)` clears the module filter
    pub module_id: Option<Option<String>>,
}

impl FilterUpdate {
    pub fn channel(channel: Channel) -> Self {
        Self {
            channel: Some(channel),
            ..Self::default()
        }
    }
}

impl FactoryFilters {
    /// Merge a partial update into these filters
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(channel) = update.channel {
            self.channel = channel;
        }
        if let Some(module_id) = update.module_id {
            self.module_id = module_id;
        }
    }

    /// Whether a run passes these filters
    pub fn admits(&self, transaction: &PipelineTransaction) -> bool {
        self.channel.matches(transaction.channel())
            && self
                .module_id
                .as_deref()
                .is_none_or(|wanted| transaction.module_id() == Some(wanted))
    }
}
