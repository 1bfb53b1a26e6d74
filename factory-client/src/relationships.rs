//! Relationship endpoints

use factory_core::domain::module::RelationshipRow;

use crate::UniversalClient;
use crate::error::Result;

impl UniversalClient {
    // =============================================================================
    // Relationships
    // =============================================================================

    /// List relationships, optionally restricted to one relationship type
    ///
    /// # Arguments
    /// * `relationship_type` - e.g. `Some("DEPENDS_ON")`; `None` returns every type
    pub async fn list_relationships(
        &self,
        relationship_type: Option<&str>,
    ) -> Result<Vec<RelationshipRow>> {
        let url = self.url("relationships");
        tracing::debug!("GET {} relationship_type={:?}", url, relationship_type);

        let mut request = self.client.get(&url);
        if let Some(kind) = relationship_type {
            request = request.query(&[("relationship_type", kind)]);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }
}
