use std::{fmt, sync::Arc};

use ferry_model::{
    CheckConnectionOutput, CheckConnectionResult, ConnectorCoreConfig,
    ConnectorIdRequest, ConnectorUpdate, JobInfo, SynchronousResponse,
};
use tracing::{debug, instrument};

use crate::{
    converters::attach_log_tail,
    error::Result,
    executor::{SynchronousJobResult, execute_synchronous_job},
    ports::{
        ConfigMerger, MergedInstance, SchemaValidator, SynchronousJobClient,
    },
};

use super::{
    resolve::{ConnectorResolver, ResolvedConnector},
    spec::SpecificationOrchestrator,
};

/// Drives check-connection jobs for persisted, new, and updated connectors.
#[derive(Clone)]
pub struct ConnectionCheckOrchestrator {
    resolver: ConnectorResolver,
    jobs: Arc<dyn SynchronousJobClient>,
    specs: SpecificationOrchestrator,
    merger: Arc<dyn ConfigMerger>,
    validator: Arc<dyn SchemaValidator>,
    log_tail_lines: usize,
}

impl fmt::Debug for ConnectionCheckOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCheckOrchestrator")
            .field("resolver", &self.resolver)
            .field("specs", &self.specs)
            .field("log_tail_lines", &self.log_tail_lines)
            .finish_non_exhaustive()
    }
}

impl ConnectionCheckOrchestrator {
    pub fn new(
        resolver: ConnectorResolver,
        jobs: Arc<dyn SynchronousJobClient>,
        specs: SpecificationOrchestrator,
        merger: Arc<dyn ConfigMerger>,
        validator: Arc<dyn SchemaValidator>,
    ) -> Self {
        Self {
            resolver,
            jobs,
            specs,
            merger,
            validator,
            log_tail_lines: 0,
        }
    }

    /// Attach up to `lines` trailing job log lines to every job info.
    pub fn with_log_tail(mut self, lines: usize) -> Self {
        self.log_tail_lines = lines;
        self
    }

    #[instrument(
        name = "scheduler.check_connection_from_id",
        skip(self, request),
        fields(role = %request.role, instance_id = %request.instance_id),
        err
    )]
    pub async fn check_from_id(
        &self,
        request: ConnectorIdRequest,
    ) -> Result<CheckConnectionResult> {
        let resolved = self
            .resolver
            .persisted(request.role, request.instance_id)
            .await?;
        self.run_check(resolved).await
    }

    #[instrument(
        name = "scheduler.check_connection_from_create",
        skip(self, config),
        fields(role = %config.role, definition_id = %config.definition_id),
        err
    )]
    pub async fn check_from_create(
        &self,
        config: ConnectorCoreConfig,
    ) -> Result<CheckConnectionResult> {
        let resolved = self.resolver.transient(&config).await?;
        self.run_check(resolved).await
    }

    /// Merge, validate, then check the merged configuration as a new connector
    /// bound to the persisted definition.
    ///
    /// A specification the merger already fetched is reused for validation.
    #[instrument(
        name = "scheduler.check_connection_for_update",
        skip(self, update),
        fields(role = %update.role, instance_id = %update.instance_id),
        err
    )]
    pub async fn check_for_update(
        &self,
        update: ConnectorUpdate,
    ) -> Result<CheckConnectionResult> {
        let MergedInstance {
            instance: updated,
            specification,
        } = self
            .merger
            .merge(
                update.role,
                update.instance_id,
                &update.connection_configuration,
            )
            .await?;

        let spec = match specification {
            Some(spec) => spec,
            None => {
                self.specs
                    .specification_for(updated.role, updated.definition_id)
                    .await?
            }
        };
        if let Err(err) = self
            .validator
            .validate(&spec.connection_specification, &updated.configuration)
        {
            debug!(error = %err, "merged configuration rejected");
            return Err(err);
        }

        self.check_from_create(ConnectorCoreConfig {
            role: updated.role,
            definition_id: updated.definition_id,
            connection_configuration: updated.configuration,
        })
        .await
    }

    async fn run_check(
        &self,
        resolved: ResolvedConnector,
    ) -> Result<CheckConnectionResult> {
        let ResolvedConnector {
            instance, image, ..
        } = resolved;
        let jobs = Arc::clone(&self.jobs);
        let outcome = execute_synchronous_job(|| async move {
            jobs.check_connection(&instance, &image).await
        })
        .await?;

        let mut report = report_connection_status(outcome);
        if let Some(info) = report.job_info.as_mut() {
            attach_log_tail(info, self.log_tail_lines).await;
        }
        Ok(report)
    }
}

/// A job that ran without emitting an output counts as a failed check.
pub fn report_connection_status(
    outcome: SynchronousJobResult<SynchronousResponse<CheckConnectionOutput>>,
) -> CheckConnectionResult {
    let (output, job_info) = match outcome {
        SynchronousJobResult::Succeeded(response) => {
            (response.output, Some(JobInfo::from(&response.metadata)))
        }
        SynchronousJobResult::Failed(info) => (None, Some(info)),
    };
    let output = output.unwrap_or_else(|| CheckConnectionOutput::failed(None));

    CheckConnectionResult {
        status: output.status,
        message: output.message,
        job_info,
    }
}
