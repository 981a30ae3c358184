//! Core data model definitions shared across Ferry crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod api;
pub mod catalog;
pub mod connector;
pub mod error;
pub mod ids;
pub mod job;
pub mod sync;
pub mod synchronous;

// Intentionally curated re-exports for downstream consumers.
pub use api::{
    CheckConnectionResult, ConnectionIdRequest, ConnectorCoreConfig,
    ConnectorIdRequest, ConnectorUpdate, DefinitionIdRequest,
    DiscoverSchemaResult, JobInfo, JobResult, SpecificationResult,
};
pub use catalog::{
    Catalog, CatalogDocument, DestinationSyncMode, Stream,
    StreamAndConfiguration, StreamConfiguration, SyncMode,
};
pub use connector::{
    ConnectorDefinition, ConnectorInstance, ConnectorRole,
    ConnectorSpecification,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ConnectionId, DefinitionId, InstanceId};
pub use job::{
    CreateJobRequest, DedupeKey, Job, JobConfig, JobHandle, JobId, JobKind,
    JobStatus, ResetJobConfig, SyncJobConfig,
};
pub use sync::{Schedule, StandardSync, SyncStatus, TimeUnit};
pub use synchronous::{
    CheckConnectionOutput, CheckConnectionStatus, DiscoverCatalogOutput,
    SyncJobConfigType, SynchronousJobMetadata, SynchronousResponse,
};
