//! Module and relationship domain types

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Relationship type that the dependency graph understands
pub const DEPENDS_ON: &str = "DEPENDS_ON";

/// A deployable module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntity {
    pub id: String,
    #[serde(alias = "entity_name")]
    pub name: String,
}

/// A directed edge between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRow {
    pub from_entity_id: String,
    pub to_entity_id: String,
    pub relationship_type: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: RelationshipMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMetadata {
    /// Optional label such as `^1.2`
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub version_constraint: Option<String>,
}

impl RelationshipRow {
    pub fn is_dependency(&self) -> bool {
        self.relationship_type == DEPENDS_ON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_accepts_entity_name() {
        let module: ModuleEntity =
            serde_json::from_value(json!({ "id": "m1", "entity_name": "Ledger" })).unwrap();
        assert_eq!(module.name, "Ledger");
    }

    #[test]
    fn test_relationship_constraint() {
        let rel: RelationshipRow = serde_json::from_value(json!({
            "from_entity_id": "a",
            "to_entity_id": "b",
            "relationship_type": "DEPENDS_ON",
            "metadata": { "version_constraint": ">=2.0" }
        }))
        .unwrap();
        assert!(rel.is_dependency());
        assert_eq!(rel.metadata.version_constraint.as_deref(), Some(">=2.0"));
    }

    #[test]
    fn test_relationship_without_metadata() {
        let rel: RelationshipRow = serde_json::from_value(json!({
            "from_entity_id": "a",
            "to_entity_id": "b",
            "relationship_type": "OWNS"
        }))
        .unwrap();
        assert!(!rel.is_dependency());
        assert_eq!(rel.metadata.version_constraint, None);
    }
}
