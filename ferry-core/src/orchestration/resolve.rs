use std::{fmt, sync::Arc};

use ferry_model::{
    ConnectorCoreConfig, ConnectorDefinition, ConnectorInstance, ConnectorRole,
    DefinitionId, InstanceId,
};
use tracing::debug;

use crate::{
    error::Result,
    image::{ImageReference, image_for},
    ports::ConfigStore,
};

/// An instance ready to be handed to a connector job.
#[derive(Clone, Debug)]
pub struct ResolvedConnector {
    pub instance: ConnectorInstance,
    pub definition: ConnectorDefinition,
    pub image: ImageReference,
}

/// Walks definition -> image (and instance, when persisted) through the store.
#[derive(Clone)]
pub struct ConnectorResolver {
    store: Arc<dyn ConfigStore>,
}

impl fmt::Debug for ConnectorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorResolver").finish_non_exhaustive()
    }
}

impl ConnectorResolver {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// Definitions for one role, sorted by display name.
    pub async fn list_definitions(
        &self,
        role: ConnectorRole,
    ) -> Result<Vec<ConnectorDefinition>> {
        let mut definitions =
            self.store.list_connector_definitions(role).await?;
        definitions.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(definitions)
    }

    pub async fn definition(
        &self,
        role: ConnectorRole,
        definition_id: DefinitionId,
    ) -> Result<(ConnectorDefinition, ImageReference)> {
        let definition = self
            .store
            .get_connector_definition(role, definition_id)
            .await?;
        let image = image_for(&definition);
        debug!(%role, %definition_id, %image, "resolved connector image");
        Ok((definition, image))
    }

    pub async fn persisted(
        &self,
        role: ConnectorRole,
        instance_id: InstanceId,
    ) -> Result<ResolvedConnector> {
        let instance =
            self.store.get_connector_instance(role, instance_id).await?;
        let (definition, image) =
            self.definition(role, instance.definition_id).await?;
        Ok(ResolvedConnector {
            instance,
            definition,
            image,
        })
    }

    /// Builds an instance that is never stored and carries no identity.
    pub async fn transient(
        &self,
        config: &ConnectorCoreConfig,
    ) -> Result<ResolvedConnector> {
        let (definition, image) =
            self.definition(config.role, config.definition_id).await?;
        let instance = ConnectorInstance::transient(
            config.role,
            config.definition_id,
            config.connection_configuration.clone(),
        );
        Ok(ResolvedConnector {
            instance,
            definition,
            image,
        })
    }
}
