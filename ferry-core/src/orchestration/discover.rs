use std::{fmt, sync::Arc};

use ferry_model::{
    ConnectorCoreConfig, ConnectorIdRequest, ConnectorRole,
    DiscoverCatalogOutput, DiscoverSchemaResult, JobInfo, SynchronousResponse,
};
use tracing::{debug, instrument};

use crate::{
    converters::{attach_log_tail, catalog_to_document},
    error::{ConfigKind, Result, SchedulerError},
    executor::{SynchronousJobResult, execute_synchronous_job},
    ports::SynchronousJobClient,
};

use super::resolve::{ConnectorResolver, ResolvedConnector};

/// Drives discover-schema jobs against sources.
///
/// Destinations have no schema to discover: a destination request is answered
/// as a missing source and never reaches the job client.
#[derive(Clone)]
pub struct SchemaDiscoveryOrchestrator {
    resolver: ConnectorResolver,
    jobs: Arc<dyn SynchronousJobClient>,
    log_tail_lines: usize,
}

impl fmt::Debug for SchemaDiscoveryOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDiscoveryOrchestrator")
            .field("resolver", &self.resolver)
            .field("log_tail_lines", &self.log_tail_lines)
            .finish_non_exhaustive()
    }
}

impl SchemaDiscoveryOrchestrator {
    pub fn new(
        resolver: ConnectorResolver,
        jobs: Arc<dyn SynchronousJobClient>,
    ) -> Self {
        Self {
            resolver,
            jobs,
            log_tail_lines: 0,
        }
    }

    pub fn with_log_tail(mut self, lines: usize) -> Self {
        self.log_tail_lines = lines;
        self
    }

    #[instrument(
        name = "scheduler.discover_schema_from_id",
        skip(self, request),
        fields(role = %request.role, instance_id = %request.instance_id),
        err
    )]
    pub async fn discover_from_id(
        &self,
        request: ConnectorIdRequest,
    ) -> Result<DiscoverSchemaResult> {
        if request.role != ConnectorRole::Source {
            debug!("discovery requested for a non-source instance");
            return Err(SchedulerError::not_found(
                ConfigKind::Instance(ConnectorRole::Source),
                request.instance_id,
            ));
        }
        let resolved = self
            .resolver
            .persisted(ConnectorRole::Source, request.instance_id)
            .await?;
        self.run_discover(resolved).await
    }

    #[instrument(
        name = "scheduler.discover_schema_from_create",
        skip(self, config),
        fields(role = %config.role, definition_id = %config.definition_id),
        err
    )]
    pub async fn discover_from_create(
        &self,
        config: ConnectorCoreConfig,
    ) -> Result<DiscoverSchemaResult> {
        if config.role != ConnectorRole::Source {
            debug!("discovery requested for a non-source definition");
            return Err(SchedulerError::not_found(
                ConfigKind::Definition(ConnectorRole::Source),
                config.definition_id,
            ));
        }
        let resolved = self.resolver.transient(&config).await?;
        self.run_discover(resolved).await
    }

    async fn run_discover(
        &self,
        resolved: ResolvedConnector,
    ) -> Result<DiscoverSchemaResult> {
        let ResolvedConnector {
            instance, image, ..
        } = resolved;
        let jobs = Arc::clone(&self.jobs);
        let outcome = execute_synchronous_job(|| async move {
            jobs.discover_schema(&instance, &image).await
        })
        .await?;

        let mut result = discover_job_to_output(outcome);
        if let Some(info) = result.job_info.as_mut() {
            attach_log_tail(info, self.log_tail_lines).await;
        }
        Ok(result)
    }
}

/// No status is forced here: a missing catalog is the failure signal.
pub fn discover_job_to_output(
    outcome: SynchronousJobResult<SynchronousResponse<DiscoverCatalogOutput>>,
) -> DiscoverSchemaResult {
    match outcome {
        SynchronousJobResult::Succeeded(response) => DiscoverSchemaResult {
            catalog: response
                .output
                .map(|output| catalog_to_document(&output.catalog)),
            job_info: Some(JobInfo::from(&response.metadata)),
        },
        SynchronousJobResult::Failed(info) => DiscoverSchemaResult {
            catalog: None,
            job_info: Some(info),
        },
    }
}
