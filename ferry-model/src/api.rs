//! Request and response shapes exchanged with callers of the scheduler.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    catalog::CatalogDocument,
    connector::ConnectorRole,
    ids::{ConnectionId, DefinitionId, InstanceId},
    job::{Job, JobId, JobKind, JobStatus},
    synchronous::{
        CheckConnectionStatus, SyncJobConfigType, SynchronousJobMetadata,
    },
};

/// Points at a persisted source or destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorIdRequest {
    pub role: ConnectorRole,
    pub instance_id: InstanceId,
}

/// Definition plus configuration for a connector that does not exist yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorCoreConfig {
    pub role: ConnectorRole,
    pub definition_id: DefinitionId,
    pub connection_configuration: Value,
}

/// Configuration changes for a persisted connector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorUpdate {
    pub role: ConnectorRole,
    pub instance_id: InstanceId,
    pub connection_configuration: Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionIdRequest {
    pub role: ConnectorRole,
    pub definition_id: DefinitionId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionIdRequest {
    pub connection_id: ConnectionId,
}

/// Caller-facing view of a synchronous job run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub id: Uuid,
    pub config_type: SyncJobConfigType,
    pub config_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub log_lines: Vec<String>,
}

impl From<&SynchronousJobMetadata> for JobInfo {
    fn from(metadata: &SynchronousJobMetadata) -> Self {
        Self {
            id: metadata.id,
            config_type: metadata.config_type,
            config_id: metadata.config_id.clone(),
            created_at: metadata.created_at,
            ended_at: metadata.ended_at,
            succeeded: metadata.succeeded,
            log_path: metadata.log_path.clone(),
            log_lines: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConnectionResult {
    pub status: CheckConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_info: Option<JobInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoverSchemaResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_info: Option<JobInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecificationResult {
    pub role: ConnectorRole,
    pub definition_id: DefinitionId,
    pub documentation_url: String,
    pub connection_specification: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: JobId,
    pub kind: JobKind,
    pub config_id: ConnectionId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<&Job> for JobResult {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            kind: job.kind(),
            config_id: job.scope,
            status: job.status,
            created_at: job.created_at,
            started_at: job.started_at,
            ended_at: job.ended_at,
        }
    }
}
