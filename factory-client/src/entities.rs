//! Entity endpoints

use factory_core::domain::fiscal::FiscalPeriod;
use factory_core::domain::module::ModuleEntity;
use serde::de::DeserializeOwned;

use crate::UniversalClient;
use crate::error::Result;

const MODULE_ENTITY_TYPE: &str = "module";
const FISCAL_PERIOD_ENTITY_TYPE: &str = "fiscal_period";

impl UniversalClient {
    // =============================================================================
    // Entities
    // =============================================================================

    /// List all deployable modules
    pub async fn list_modules(&self) -> Result<Vec<ModuleEntity>> {
        self.list_entities(MODULE_ENTITY_TYPE).await
    }

    /// List all fiscal periods
    pub async fn list_fiscal_periods(&self) -> Result<Vec<FiscalPeriod>> {
        self.list_entities(FISCAL_PERIOD_ENTITY_TYPE).await
    }

    async fn list_entities<T: DeserializeOwned>(&self, entity_type: &str) -> Result<Vec<T>> {
        let url = self.url("entities");
        tracing::debug!("GET {} entity_type={}", url, entity_type);

        let response = self
            .client
            .get(&url)
            .query(&[("entity_type", entity_type)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
