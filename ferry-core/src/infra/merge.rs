use std::{fmt, sync::Arc};

use async_trait::async_trait;
use ferry_model::{ConnectorRole, InstanceId};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::Result,
    orchestration::ConnectorResolver,
    ports::{ConfigMerger, ConfigStore, MergedInstance, SpecFetcher},
};

/// Placeholder clients send back in place of secrets they were never shown.
pub const DEFAULT_SECRET_MASK: &str = "**********";

/// Applies an update over a persisted instance, keeping stored secrets that
/// the update only echoes back masked.
#[derive(Clone)]
pub struct SecretPreservingMerger {
    resolver: ConnectorResolver,
    specs: Arc<dyn SpecFetcher>,
    secret_mask: String,
}

impl fmt::Debug for SecretPreservingMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPreservingMerger")
            .field("resolver", &self.resolver)
            .field("secret_mask", &self.secret_mask)
            .finish_non_exhaustive()
    }
}

impl SecretPreservingMerger {
    pub fn new(store: Arc<dyn ConfigStore>, specs: Arc<dyn SpecFetcher>) -> Self {
        Self {
            resolver: ConnectorResolver::new(store),
            specs,
            secret_mask: DEFAULT_SECRET_MASK.to_string(),
        }
    }

    pub fn with_secret_mask(mut self, mask: impl Into<String>) -> Self {
        self.secret_mask = mask.into();
        self
    }
}

#[async_trait]
impl ConfigMerger for SecretPreservingMerger {
    async fn merge(
        &self,
        role: ConnectorRole,
        instance_id: InstanceId,
        configuration: &Value,
    ) -> Result<MergedInstance> {
        let resolved = self.resolver.persisted(role, instance_id).await?;
        let spec = self.specs.fetch(&resolved.image).await?;

        let mut merged = configuration.clone();
        if let (Some(update), Some(persisted)) = (
            merged.as_object_mut(),
            resolved.instance.configuration.as_object(),
        ) {
            for field in spec.secret_properties() {
                let masked = update
                    .get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|value| value == self.secret_mask);
                if !masked {
                    continue;
                }
                if let Some(stored) = persisted.get(field) {
                    debug!(%instance_id, field, "keeping persisted secret");
                    update.insert(field.to_string(), stored.clone());
                }
            }
        }

        let mut instance = resolved.instance;
        instance.configuration = merged;
        Ok(MergedInstance::new(instance).with_specification(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        memory_store::InMemoryConfigStore, spec_fetcher::StaticSpecFetcher,
    };
    use ferry_model::{
        ConnectorDefinition, ConnectorInstance, ConnectorSpecification,
        DefinitionId,
    };
    use serde_json::json;

    async fn fixture() -> (SecretPreservingMerger, InstanceId, DefinitionId) {
        let definition = ConnectorDefinition {
            id: DefinitionId::new(),
            role: ConnectorRole::Destination,
            name: "Snowflake".into(),
            docker_repository: "airbyte/destination-snowflake".into(),
            docker_image_tag: "0.2.0".into(),
            documentation_url: None,
        };
        let store = Arc::new(InMemoryConfigStore::new());
        store.insert_definition(definition.clone()).await;
        let instance_id = InstanceId::new();
        store
            .insert_instance(ConnectorInstance::persisted(
                instance_id,
                ConnectorRole::Destination,
                definition.id,
                "analytics",
                json!({ "username": "loader", "password": "hunter2" }),
            ))
            .await;

        let specs = StaticSpecFetcher::new().with_spec(
            "airbyte/destination-snowflake:0.2.0",
            ConnectorSpecification {
                documentation_url: "https://docs.airbyte.io/snowflake".into(),
                connection_specification: json!({
                    "type": "object",
                    "properties": {
                        "username": { "type": "string" },
                        "password": { "type": "string", "airbyte_secret": true }
                    }
                }),
            },
        );
        (
            SecretPreservingMerger::new(store, Arc::new(specs)),
            instance_id,
            definition.id,
        )
    }

    #[tokio::test]
    async fn masked_secret_keeps_persisted_value() {
        let (merger, instance_id, definition_id) = fixture().await;

        let merged = merger
            .merge(
                ConnectorRole::Destination,
                instance_id,
                &json!({ "username": "writer", "password": DEFAULT_SECRET_MASK }),
            )
            .await
            .unwrap();
        let MergedInstance {
            instance: merged,
            specification,
        } = merged;

        assert_eq!(
            specification.map(|spec| spec.documentation_url).as_deref(),
            Some("https://docs.airbyte.io/snowflake")
        );
        assert_eq!(merged.id, Some(instance_id));
        assert_eq!(merged.definition_id, definition_id);
        assert_eq!(
            merged.configuration,
            json!({ "username": "writer", "password": "hunter2" })
        );
    }

    #[tokio::test]
    async fn new_secret_replaces_persisted_value() {
        let (merger, instance_id, _) = fixture().await;

        let merged = merger
            .merge(
                ConnectorRole::Destination,
                instance_id,
                &json!({ "username": "loader", "password": "rotated" }),
            )
            .await
            .unwrap();
        assert_eq!(merged.instance.configuration["password"], "rotated");
    }

    #[tokio::test]
    async fn mask_only_applies_to_secret_fields() {
        let (merger, instance_id, _) = fixture().await;

        let merged = merger
            .merge(
                ConnectorRole::Destination,
                instance_id,
                &json!({ "username": DEFAULT_SECRET_MASK }),
            )
            .await
            .unwrap();
        assert_eq!(
            merged.instance.configuration,
            json!({ "username": DEFAULT_SECRET_MASK })
        );
    }

    #[tokio::test]
    async fn unknown_instance_is_not_found() {
        let (merger, _, _) = fixture().await;
        let err = merger
            .merge(ConnectorRole::Destination, InstanceId::new(), &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
