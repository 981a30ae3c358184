use std::{fmt, sync::Arc};

use ferry_model::{
    CheckConnectionResult, ConnectionIdRequest, ConnectorCoreConfig,
    ConnectorDefinition, ConnectorIdRequest, ConnectorRole,
    ConnectorUpdate, DefinitionIdRequest,
    DiscoverSchemaResult, JobResult, SpecificationResult,
};

use crate::{
    error::Result,
    ports::{
        AsynchronousJobClient, ConfigMerger, ConfigStore, SchemaValidator,
        SpecFetcher, SynchronousJobClient,
    },
};

use super::{
    check::ConnectionCheckOrchestrator, discover::SchemaDiscoveryOrchestrator,
    jobs::{ResetJobOrchestrator, SyncJobOrchestrator},
    resolve::ConnectorResolver, spec::SpecificationOrchestrator,
};

/// Every collaborator the scheduler needs, supplied by the caller.
#[derive(Clone)]
pub struct SchedulerPorts {
    pub config_store: Arc<dyn ConfigStore>,
    pub spec_fetcher: Arc<dyn SpecFetcher>,
    pub schema_validator: Arc<dyn SchemaValidator>,
    pub config_merger: Arc<dyn ConfigMerger>,
    pub synchronous_jobs: Arc<dyn SynchronousJobClient>,
    pub asynchronous_jobs: Arc<dyn AsynchronousJobClient>,
}

impl fmt::Debug for SchedulerPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerPorts").finish_non_exhaustive()
    }
}

/// Entry point for connector operations.
///
/// Holds no state beyond its collaborators, so one instance can serve any
/// number of concurrent requests.
#[derive(Clone, Debug)]
pub struct SchedulerHandler {
    resolver: ConnectorResolver,
    check: ConnectionCheckOrchestrator,
    discover: SchemaDiscoveryOrchestrator,
    specification: SpecificationOrchestrator,
    sync: SyncJobOrchestrator,
    reset: ResetJobOrchestrator,
}

impl SchedulerHandler {
    pub fn new(ports: SchedulerPorts) -> Self {
        let resolver = ConnectorResolver::new(ports.config_store);
        let specification = SpecificationOrchestrator::new(
            resolver.clone(),
            ports.spec_fetcher,
        );
        Self {
            check: ConnectionCheckOrchestrator::new(
                resolver.clone(),
                Arc::clone(&ports.synchronous_jobs),
                specification.clone(),
                ports.config_merger,
                ports.schema_validator,
            ),
            discover: SchemaDiscoveryOrchestrator::new(
                resolver.clone(),
                ports.synchronous_jobs,
            ),
            sync: SyncJobOrchestrator::new(
                resolver.clone(),
                Arc::clone(&ports.asynchronous_jobs),
            ),
            reset: ResetJobOrchestrator::new(
                resolver.clone(),
                ports.asynchronous_jobs,
            ),
            specification,
            resolver,
        }
    }

    /// Attach trailing job log lines to check/discover job info.
    pub fn with_log_tail(mut self, lines: usize) -> Self {
        self.check = self.check.with_log_tail(lines);
        self.discover = self.discover.with_log_tail(lines);
        self
    }

    pub async fn check_connection_from_create(
        &self,
        config: ConnectorCoreConfig,
    ) -> Result<CheckConnectionResult> {
        self.check.check_from_create(config).await
    }

    pub async fn check_connection_for_update(
        &self,
        update: ConnectorUpdate,
    ) -> Result<CheckConnectionResult> {
        self.check.check_for_update(update).await
    }

    pub async fn check_connection_from_id(
        &self,
        request: ConnectorIdRequest,
    ) -> Result<CheckConnectionResult> {
        self.check.check_from_id(request).await
    }

    pub async fn discover_schema_from_id(
        &self,
        request: ConnectorIdRequest,
    ) -> Result<DiscoverSchemaResult> {
        self.discover.discover_from_id(request).await
    }

    pub async fn discover_schema_from_create(
        &self,
        config: ConnectorCoreConfig,
    ) -> Result<DiscoverSchemaResult> {
        self.discover.discover_from_create(config).await
    }

    pub async fn get_specification(
        &self,
        request: DefinitionIdRequest,
    ) -> Result<SpecificationResult> {
        self.specification.get_specification(request).await
    }

    pub async fn sync_connection(
        &self,
        request: ConnectionIdRequest,
    ) -> Result<JobResult> {
        self.sync.sync_connection(request).await
    }

    pub async fn reset_connection(
        &self,
        request: ConnectionIdRequest,
    ) -> Result<JobResult> {
        self.reset.reset_connection(request).await
    }

    /// Definitions for one role, sorted by display name.
    pub async fn list_definitions(
        &self,
        role: ConnectorRole,
    ) -> Result<Vec<ConnectorDefinition>> {
        self.resolver.list_definitions(role).await
    }
}
