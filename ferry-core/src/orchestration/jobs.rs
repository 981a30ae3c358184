use std::{fmt, sync::Arc};

use ferry_model::{
    ConnectionIdRequest, ConnectorRole, CreateJobRequest, JobConfig, JobHandle,
    JobResult, ResetJobConfig, SyncJobConfig,
};
use tracing::{info, instrument};

use crate::{error::Result, ports::AsynchronousJobClient};

use super::resolve::ConnectorResolver;

/// Submits sync jobs for a connection; at most one stays active at a time.
#[derive(Clone)]
pub struct SyncJobOrchestrator {
    resolver: ConnectorResolver,
    jobs: Arc<dyn AsynchronousJobClient>,
}

impl fmt::Debug for SyncJobOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncJobOrchestrator")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl SyncJobOrchestrator {
    pub fn new(
        resolver: ConnectorResolver,
        jobs: Arc<dyn AsynchronousJobClient>,
    ) -> Self {
        Self { resolver, jobs }
    }

    #[instrument(
        name = "scheduler.sync_connection",
        skip(self, request),
        fields(connection_id = %request.connection_id),
        err
    )]
    pub async fn sync_connection(
        &self,
        request: ConnectionIdRequest,
    ) -> Result<JobResult> {
        let sync = self
            .resolver
            .store()
            .get_standard_sync(request.connection_id)
            .await?;
        let source = self
            .resolver
            .persisted(ConnectorRole::Source, sync.source_id)
            .await?;
        let destination = self
            .resolver
            .persisted(ConnectorRole::Destination, sync.destination_id)
            .await?;

        let config = JobConfig::Sync(SyncJobConfig {
            source_image: source.image.into_string(),
            source_configuration: source.instance.configuration,
            destination_image: destination.image.into_string(),
            destination_configuration: destination.instance.configuration,
            catalog: sync.catalog,
        });
        let handle = self
            .jobs
            .create_or_get_active(CreateJobRequest::new(
                sync.connection_id,
                config,
            ))
            .await?;
        Ok(log_handle(&handle))
    }
}

/// Submits reset jobs; only the destination side is resolved.
#[derive(Clone)]
pub struct ResetJobOrchestrator {
    resolver: ConnectorResolver,
    jobs: Arc<dyn AsynchronousJobClient>,
}

impl fmt::Debug for ResetJobOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetJobOrchestrator")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl ResetJobOrchestrator {
    pub fn new(
        resolver: ConnectorResolver,
        jobs: Arc<dyn AsynchronousJobClient>,
    ) -> Self {
        Self { resolver, jobs }
    }

    #[instrument(
        name = "scheduler.reset_connection",
        skip(self, request),
        fields(connection_id = %request.connection_id),
        err
    )]
    pub async fn reset_connection(
        &self,
        request: ConnectionIdRequest,
    ) -> Result<JobResult> {
        let sync = self
            .resolver
            .store()
            .get_standard_sync(request.connection_id)
            .await?;
        let destination = self
            .resolver
            .persisted(ConnectorRole::Destination, sync.destination_id)
            .await?;

        let config = JobConfig::ResetConnection(ResetJobConfig {
            destination_image: destination.image.into_string(),
            destination_configuration: destination.instance.configuration,
            catalog: sync.catalog,
        });
        let handle = self
            .jobs
            .create_or_get_active(CreateJobRequest::new(
                sync.connection_id,
                config,
            ))
            .await?;
        Ok(log_handle(&handle))
    }
}

fn log_handle(handle: &JobHandle) -> JobResult {
    if handle.created {
        info!(job_id = %handle.job.id, kind = %handle.job.kind(), "job created");
    } else {
        info!(
            job_id = %handle.job.id,
            kind = %handle.job.kind(),
            status = %handle.job.status,
            "reusing active job"
        );
    }
    JobResult::from(&handle.job)
}
