//! Universal API backed source

use async_trait::async_trait;

use factory_client::{TransactionQuery, UniversalClient};
use factory_core::domain::filter::FactoryFilters;
use factory_core::dto::CreateWaiver;

use crate::source::{FactorySnapshot, FactorySource, SourceError, WaiverError};

/// [`FactorySource`] reading from the universal tables over HTTP
pub struct UniversalSource {
    client: UniversalClient,
}

impl UniversalSource {
    pub fn new(client: UniversalClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FactorySource for UniversalSource {
    async fn fetch(&self, filters: &FactoryFilters) -> Result<FactorySnapshot, SourceError> {
        let query = TransactionQuery::from(filters);

        let (mut transactions, modules, relationships, fiscal_periods) = tokio::try_join!(
            self.client.list_pipeline_transactions(&query),
            self.client.list_modules(),
            self.client.list_relationships(None),
            self.client.list_fiscal_periods(),
        )?;

        // Older deployments ignore the filter query parameters
        let fetched = transactions.len();
        transactions.retain(|t| filters.admits(t));
        if transactions.len() != fetched {
            tracing::debug!(
                "Dropped {} run(s) outside the active filters",
                fetched - transactions.len()
            );
        }

        let ids: Vec<String> = transactions.iter().map(|t| t.id.clone()).collect();
        let lines = self.client.list_transaction_lines(&ids).await?;

        tracing::debug!(
            "Fetched {} transaction(s), {} line(s), {} module(s), {} relationship(s)",
            transactions.len(),
            lines.len(),
            modules.len(),
            relationships.len()
        );

        Ok(FactorySnapshot::new(
            transactions,
            lines,
            modules,
            relationships,
            fiscal_periods,
        ))
    }

    async fn create_waiver(&self, waiver: CreateWaiver) -> Result<(), WaiverError> {
        let created = self.client.create_waiver(waiver).await?;
        tracing::info!("Waiver recorded: {}", created.id);
        Ok(())
    }
}
