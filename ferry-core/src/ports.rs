//! Collaborator seams consumed by the orchestrators.
//!
//! Storage, connector execution, and job scheduling live behind these traits.
//! `crate::infra` ships in-memory and job-backed implementations.

use async_trait::async_trait;
use ferry_model::{
    CheckConnectionOutput, ConnectionId, ConnectorDefinition, ConnectorInstance,
    ConnectorRole, ConnectorSpecification, CreateJobRequest, DefinitionId,
    DiscoverCatalogOutput, InstanceId, JobHandle, StandardSync,
    SynchronousResponse,
};
use serde_json::Value;

use crate::{
    error::{Result, SynchronousJobError},
    image::ImageReference,
};

/// Read access to definitions, instances, and syncs.
/// Every lookup fails with `SchedulerError::NotFound` when the record is absent.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_connector_definition(
        &self,
        role: ConnectorRole,
        id: DefinitionId,
    ) -> Result<ConnectorDefinition>;

    async fn get_connector_instance(
        &self,
        role: ConnectorRole,
        id: InstanceId,
    ) -> Result<ConnectorInstance>;

    async fn get_standard_sync(&self, id: ConnectionId) -> Result<StandardSync>;

    async fn list_connector_definitions(
        &self,
        role: ConnectorRole,
    ) -> Result<Vec<ConnectorDefinition>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecFetcher: Send + Sync {
    async fn fetch(
        &self,
        image: &ImageReference,
    ) -> Result<ConnectorSpecification>;
}

pub trait SchemaValidator: Send + Sync {
    /// Fails with `SchedulerError::Validation` listing every violation.
    fn validate(&self, schema: &Value, document: &Value) -> Result<()>;
}

/// Runs connector commands and waits for them to finish.
///
/// Timeouts and cancellation belong to the implementation; callers only see
/// the error it raises.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SynchronousJobClient: Send + Sync {
    async fn check_connection(
        &self,
        instance: &ConnectorInstance,
        image: &ImageReference,
    ) -> std::result::Result<
        SynchronousResponse<CheckConnectionOutput>,
        SynchronousJobError,
    >;

    async fn discover_schema(
        &self,
        instance: &ConnectorInstance,
        image: &ImageReference,
    ) -> std::result::Result<
        SynchronousResponse<DiscoverCatalogOutput>,
        SynchronousJobError,
    >;

    async fn get_spec(
        &self,
        image: &ImageReference,
    ) -> std::result::Result<
        SynchronousResponse<ConnectorSpecification>,
        SynchronousJobError,
    >;
}

/// Schedules background work.
#[async_trait]
pub trait AsynchronousJobClient: Send + Sync {
    /// Returns the active job for the request's dedupe key, or creates one.
    ///
    /// Lookup and creation must be a single atomic step: concurrent callers
    /// with the same key all observe the same job.
    async fn create_or_get_active(
        &self,
        request: CreateJobRequest,
    ) -> Result<JobHandle>;
}

/// An updated instance together with the specification consulted to build it.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedInstance {
    pub instance: ConnectorInstance,
    /// `None` when the merger never looked at the connector's specification.
    pub specification: Option<ConnectorSpecification>,
}

impl MergedInstance {
    pub fn new(instance: ConnectorInstance) -> Self {
        Self {
            instance,
            specification: None,
        }
    }

    pub fn with_specification(
        mut self,
        specification: ConnectorSpecification,
    ) -> Self {
        self.specification = Some(specification);
        self
    }
}

/// Applies partial configuration to a persisted instance.
#[async_trait]
pub trait ConfigMerger: Send + Sync {
    /// The returned instance keeps its identity and definition linkage.
    async fn merge(
        &self,
        role: ConnectorRole,
        instance_id: InstanceId,
        configuration: &Value,
    ) -> Result<MergedInstance>;
}
