use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result};
use ferry_config::{ConfigLoader, StateSnapshot, init_tracing};
use ferry_core::{
    infra::{InMemoryJobQueue, JsonSchemaValidator, SecretPreservingMerger},
    orchestration::{
        ConnectorResolver, ResetJobOrchestrator, SpecificationOrchestrator,
        SyncJobOrchestrator,
    },
    ports::{ConfigMerger, MergedInstance, SchemaValidator},
};
use ferry_model::{
    ConnectionId, ConnectionIdRequest, ConnectorRole, DefinitionId,
    DefinitionIdRequest, InstanceId, JobResult,
};
use serde_json::Value;
use tracing::{debug, info};

/// Adapters seeded from the state snapshot for a single invocation.
#[derive(Debug)]
pub struct Context {
    resolver: ConnectorResolver,
    specs: SpecificationOrchestrator,
    merger: SecretPreservingMerger,
    queue: Arc<InMemoryJobQueue>,
}

impl Context {
    pub async fn load(
        config_path: Option<PathBuf>,
        state_override: Option<PathBuf>,
    ) -> Result<Self> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = config_path {
            loader = loader.with_config_path(path);
        }
        let load = loader.load()?;
        init_tracing(&load.config.log_filter);
        if load.metadata.env_file_loaded {
            info!("loaded .env file");
        }
        debug!(source = ?load.metadata.source, "ferry config resolved");

        let config = load.config;
        let state_path =
            state_override.unwrap_or_else(|| config.state_path.clone());
        let state = StateSnapshot::load(&state_path)?.into_state().await?;

        let store = Arc::new(state.store);
        let specs = Arc::new(state.specs);
        let resolver = ConnectorResolver::new(store.clone());
        Ok(Self {
            specs: SpecificationOrchestrator::new(
                resolver.clone(),
                specs.clone(),
            ),
            merger: config.secret_merger(store, specs),
            resolver,
            queue: Arc::new(InMemoryJobQueue::new()),
        })
    }

    pub async fn list_definitions(&self, role: ConnectorRole) -> Result<()> {
        for definition in self.resolver.list_definitions(role).await? {
            println!(
                "{}\t{}\t{}\t{}",
                definition.name,
                definition.docker_repository,
                definition.docker_image_tag,
                definition.id
            );
        }
        Ok(())
    }

    pub async fn print_spec(
        &self,
        role: ConnectorRole,
        definition_id: DefinitionId,
    ) -> Result<()> {
        let spec = self
            .specs
            .get_specification(DefinitionIdRequest {
                role,
                definition_id,
            })
            .await?;
        println!("{}", serde_json::to_string_pretty(&spec)?);
        Ok(())
    }

    pub async fn validate(
        &self,
        role: ConnectorRole,
        definition_id: DefinitionId,
        config_path: &Path,
    ) -> Result<()> {
        let configuration = read_configuration(config_path)?;

        let spec = self.specs.specification_for(role, definition_id).await?;
        JsonSchemaValidator::new()
            .validate(&spec.connection_specification, &configuration)?;
        println!("configuration is valid");
        Ok(())
    }

    /// Merges the update over the stored instance, keeping masked secrets, and
    /// validates the result. The merged configuration is never printed.
    pub async fn validate_update(
        &self,
        role: ConnectorRole,
        instance_id: InstanceId,
        config_path: &Path,
    ) -> Result<()> {
        let configuration = read_configuration(config_path)?;

        let MergedInstance {
            instance,
            specification,
        } = self.merger.merge(role, instance_id, &configuration).await?;
        let spec = match specification {
            Some(spec) => spec,
            None => {
                self.specs
                    .specification_for(instance.role, instance.definition_id)
                    .await?
            }
        };
        JsonSchemaValidator::new()
            .validate(&spec.connection_specification, &instance.configuration)?;
        println!("configuration is valid");
        Ok(())
    }

    pub async fn sync(&self, connection_id: ConnectionId) -> Result<()> {
        let result = SyncJobOrchestrator::new(
            self.resolver.clone(),
            self.queue.clone(),
        )
        .sync_connection(ConnectionIdRequest { connection_id })
        .await?;
        print_job(&result)
    }

    pub async fn reset(&self, connection_id: ConnectionId) -> Result<()> {
        let result = ResetJobOrchestrator::new(
            self.resolver.clone(),
            self.queue.clone(),
        )
        .reset_connection(ConnectionIdRequest { connection_id })
        .await?;
        print_job(&result)
    }
}

fn read_configuration(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_job(result: &JobResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
