use std::{fmt, sync::Arc};

use ferry_model::{
    ConnectorRole, ConnectorSpecification, DefinitionId, DefinitionIdRequest,
    SpecificationResult,
};
use tracing::instrument;

use crate::{error::Result, ports::SpecFetcher};

use super::resolve::ConnectorResolver;

/// Read-only path from a definition id to the connector's declared spec.
#[derive(Clone)]
pub struct SpecificationOrchestrator {
    resolver: ConnectorResolver,
    specs: Arc<dyn SpecFetcher>,
}

impl fmt::Debug for SpecificationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationOrchestrator")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl SpecificationOrchestrator {
    pub fn new(resolver: ConnectorResolver, specs: Arc<dyn SpecFetcher>) -> Self {
        Self { resolver, specs }
    }

    #[instrument(
        name = "scheduler.get_specification",
        skip(self, request),
        fields(role = %request.role, definition_id = %request.definition_id),
        err
    )]
    pub async fn get_specification(
        &self,
        request: DefinitionIdRequest,
    ) -> Result<SpecificationResult> {
        let spec = self
            .specification_for(request.role, request.definition_id)
            .await?;
        Ok(SpecificationResult {
            role: request.role,
            definition_id: request.definition_id,
            documentation_url: spec.documentation_url,
            connection_specification: spec.connection_specification,
        })
    }

    pub async fn specification_for(
        &self,
        role: ConnectorRole,
        definition_id: DefinitionId,
    ) -> Result<ConnectorSpecification> {
        let (_, image) = self.resolver.definition(role, definition_id).await?;
        self.specs.fetch(&image).await
    }
}
