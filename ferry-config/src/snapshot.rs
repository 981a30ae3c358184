use std::{fs, path::Path};

use anyhow::{Context, anyhow, bail};
use ferry_core::infra::{InMemoryConfigStore, StaticSpecFetcher};
use ferry_model::{
    ConnectorDefinition, ConnectorInstance, ConnectorSpecification, StandardSync,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Specification cached for one `repository:tag` image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSpecification {
    pub image: String,
    pub specification: ConnectorSpecification,
}

/// Everything the in-memory adapters are seeded with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub definitions: Vec<ConnectorDefinition>,
    pub instances: Vec<ConnectorInstance>,
    pub syncs: Vec<StandardSync>,
    pub specs: Vec<CachedSpecification>,
}

/// Adapters built from a snapshot.
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub store: InMemoryConfigStore,
    pub specs: StaticSpecFetcher,
}

impl StateSnapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read state snapshot {}", path.display())
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).with_context(|| {
                format!("invalid state snapshot {}", path.display())
            }),
            _ => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid state snapshot {}: {}", path.display(), err)
            }),
        }
    }

    /// Seeds the in-memory store and spec cache. Instances must be persisted.
    pub async fn into_state(self) -> anyhow::Result<LoadedState> {
        let store = InMemoryConfigStore::new();
        let mut specs = StaticSpecFetcher::new();

        let counts = (
            self.definitions.len(),
            self.instances.len(),
            self.syncs.len(),
        );
        for definition in self.definitions {
            store.insert_definition(definition).await;
        }
        for instance in self.instances {
            let definition_id = instance.definition_id;
            if !store.insert_instance(instance).await {
                bail!(
                    "state snapshot contains an instance of definition {definition_id} without an id"
                );
            }
        }
        for sync in self.syncs {
            store.insert_sync(sync).await;
        }
        for cached in self.specs {
            specs.insert(cached.image, cached.specification);
        }

        info!(
            definitions = counts.0,
            instances = counts.1,
            syncs = counts.2,
            specs = specs.len(),
            "state snapshot loaded"
        );
        Ok(LoadedState { store, specs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::{
        ImageReference,
        ports::{ConfigStore, SpecFetcher},
    };
    use ferry_model::{ConnectorRole, DefinitionId};
    use serde_json::json;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"
[[definitions]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a10"
role = "source"
name = "Postgres"
docker_repository = "airbyte/source-postgres"
docker_image_tag = "0.4.1"

[[instances]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a11"
role = "source"
definition_id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a10"
name = "orders"

[instances.configuration]
host = "db.internal"
port = 5432

[[specs]]
image = "airbyte/source-postgres:0.4.1"

[specs.specification]
documentation_url = "https://docs.airbyte.io/postgres"

[specs.specification.connection_specification]
type = "object"
"#;

    #[tokio::test]
    async fn toml_snapshot_seeds_adapters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, SNAPSHOT).unwrap();

        let state = StateSnapshot::load(&path).unwrap().into_state().await.unwrap();
        let definition_id: DefinitionId =
            "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a10".parse().unwrap();

        let definitions = state
            .store
            .list_connector_definitions(ConnectorRole::Source)
            .await
            .unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].id, definition_id);

        let instance = state
            .store
            .get_connector_instance(
                ConnectorRole::Source,
                "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a11".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(instance.configuration, json!({ "host": "db.internal", "port": 5432 }));

        let spec = state
            .specs
            .fetch(&ImageReference::new("airbyte/source-postgres:0.4.1"))
            .await
            .unwrap();
        assert_eq!(spec.connection_specification, json!({ "type": "object" }));
    }

    #[tokio::test]
    async fn instance_without_id_is_rejected() {
        let snapshot = StateSnapshot {
            instances: vec![ConnectorInstance::transient(
                ConnectorRole::Source,
                DefinitionId::new(),
                json!({}),
            )],
            ..StateSnapshot::default()
        };
        let err = snapshot.into_state().await.unwrap_err();
        assert!(err.to_string().contains("without an id"), "{err:#}");
    }

    #[test]
    fn json_snapshot_with_missing_sections_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(StateSnapshot::load(&path).unwrap(), StateSnapshot::default());
    }
}
