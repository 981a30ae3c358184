use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use ferry_model::{
    ConnectionId, ConnectorDefinition, ConnectorInstance, ConnectorRole,
    DefinitionId, InstanceId, StandardSync,
};
use tokio::sync::RwLock;

use crate::{
    error::{ConfigKind, Result, SchedulerError},
    ports::ConfigStore,
};

#[derive(Debug, Default)]
struct Records {
    definitions: HashMap<DefinitionId, ConnectorDefinition>,
    instances: HashMap<InstanceId, ConnectorInstance>,
    syncs: HashMap<ConnectionId, StandardSync>,
}

/// Config store backed by process memory.
///
/// Lookups are role-scoped: a record stored under one role is invisible to
/// lookups for the other.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConfigStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_definition(&self, definition: ConnectorDefinition) {
        let mut guard = self.records.write().await;
        guard.definitions.insert(definition.id, definition);
    }

    /// Stores a persisted instance. Transient instances have no id and
    /// cannot be stored.
    pub async fn insert_instance(&self, instance: ConnectorInstance) -> bool {
        let Some(id) = instance.id else {
            return false;
        };
        let mut guard = self.records.write().await;
        guard.instances.insert(id, instance);
        true
    }

    pub async fn insert_sync(&self, sync: StandardSync) {
        let mut guard = self.records.write().await;
        guard.syncs.insert(sync.connection_id, sync);
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_connector_definition(
        &self,
        role: ConnectorRole,
        id: DefinitionId,
    ) -> Result<ConnectorDefinition> {
        let guard = self.records.read().await;
        guard
            .definitions
            .get(&id)
            .filter(|definition| definition.role == role)
            .cloned()
            .ok_or_else(|| {
                SchedulerError::not_found(ConfigKind::Definition(role), id)
            })
    }

    async fn get_connector_instance(
        &self,
        role: ConnectorRole,
        id: InstanceId,
    ) -> Result<ConnectorInstance> {
        let guard = self.records.read().await;
        guard
            .instances
            .get(&id)
            .filter(|instance| instance.role == role)
            .cloned()
            .ok_or_else(|| {
                SchedulerError::not_found(ConfigKind::Instance(role), id)
            })
    }

    async fn get_standard_sync(&self, id: ConnectionId) -> Result<StandardSync> {
        let guard = self.records.read().await;
        guard
            .syncs
            .get(&id)
            .cloned()
            .ok_or_else(|| SchedulerError::not_found(ConfigKind::StandardSync, id))
    }

    async fn list_connector_definitions(
        &self,
        role: ConnectorRole,
    ) -> Result<Vec<ConnectorDefinition>> {
        let guard = self.records.read().await;
        Ok(guard
            .definitions
            .values()
            .filter(|definition| definition.role == role)
            .cloned()
            .collect())
    }
}
