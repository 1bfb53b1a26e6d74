//! Transaction and transaction line endpoints

use factory_core::domain::filter::{Channel, FactoryFilters};
use factory_core::domain::transaction::{PipelineTransaction, PipelineTransactionLine};
use factory_core::dto::{CreateWaiver, Created, NewTransaction, PIPELINE_TRANSACTION_TYPE};

use crate::UniversalClient;
use crate::error::Result;

/// Filter for listing pipeline transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub channel: Option<Channel>,
    pub module_id: Option<String>,
}

impl From<&FactoryFilters> for TransactionQuery {
    fn from(filters: &FactoryFilters) -> Self {
        Self {
            channel: match filters.channel {
                Channel::All => None,
                channel => Some(channel),
            },
            module_id: filters.module_id.clone(),
        }
    }
}

impl TransactionQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("transaction_type", PIPELINE_TRANSACTION_TYPE.to_string())];
        if let Some(channel) = self.channel {
            params.push(("channel", channel.as_str().to_string()));
        }
        if let Some(module_id) = &self.module_id {
            params.push(("module_id", module_id.clone()));
        }
        params
    }
}

impl UniversalClient {
    // =============================================================================
    // Transactions
    // =============================================================================

    /// List pipeline stage transactions matching `query`
    pub async fn list_pipeline_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<PipelineTransaction>> {
        let url = self.url("transactions");
        let params = query.params();
        tracing::debug!("GET {} {:?}", url, params);

        let response = self.client.get(&url).query(&params).send().await?;
        self.handle_response(response).await
    }

    /// List the detail lines of the given transactions
    ///
    /// Returns an empty list without a request when `transaction_ids` is empty.
    pub async fn list_transaction_lines(
        &self,
        transaction_ids: &[String],
    ) -> Result<Vec<PipelineTransactionLine>> {
        if transaction_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url("transaction-lines");
        tracing::debug!("GET {} ({} transaction(s))", url, transaction_ids.len());

        let response = self
            .client
            .get(&url)
            .query(&[("transaction_ids", transaction_ids.join(","))])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Record a guardrail waiver as a waiver transaction
    ///
    /// # Returns
    /// The id of the created waiver transaction
    pub async fn create_waiver(&self, waiver: CreateWaiver) -> Result<Created> {
        let url = self.url("transactions");
        tracing::debug!(
            "POST {} waiver for {} ({})",
            url,
            waiver.transaction_id,
            waiver.policy
        );

        let body = NewTransaction::from(waiver);
        let response = self.client.post(&url).json(&body).send().await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_channel_is_not_sent() {
        let query = TransactionQuery::from(&FactoryFilters::default());
        assert_eq!(
            query.params(),
            vec![("transaction_type", "factory_pipeline".to_string())]
        );
    }

    #[test]
    fn test_query_params() {
        let filters = FactoryFilters {
            channel: Channel::Lts,
            module_id: Some("mod-3".to_string()),
        };
        let params = TransactionQuery::from(&filters).params();
        assert!(params.contains(&("channel", "LTS".to_string())));
        assert!(params.contains(&("module_id", "mod-3".to_string())));
    }
}
