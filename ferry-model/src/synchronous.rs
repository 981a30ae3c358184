//! Blocking connector jobs: their tracking metadata and their outputs.

use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobConfigType {
    CheckConnectionSource,
    CheckConnectionDestination,
    DiscoverSchema,
    GetSpec,
}

impl fmt::Display for SyncJobConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncJobConfigType::CheckConnectionSource => {
                "check_connection_source"
            }
            SyncJobConfigType::CheckConnectionDestination => {
                "check_connection_destination"
            }
            SyncJobConfigType::DiscoverSchema => "discover_schema",
            SyncJobConfigType::GetSpec => "get_spec",
        };
        f.write_str(label)
    }
}

/// Execution-tracking record produced whenever a blocking job runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynchronousJobMetadata {
    pub id: Uuid,
    pub config_type: SyncJobConfigType,
    /// Persisted instance or image the job ran against, when there is one.
    pub config_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub succeeded: bool,
    pub log_path: Option<PathBuf>,
}

/// What a synchronous job client hands back for a job that ran to completion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynchronousResponse<O> {
    /// `None` when the connector exited without emitting an output message.
    pub output: Option<O>,
    pub metadata: SynchronousJobMetadata,
}

impl<O> SynchronousResponse<O> {
    pub fn new(output: Option<O>, metadata: SynchronousJobMetadata) -> Self {
        Self { output, metadata }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConnectionStatus {
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConnectionOutput {
    pub status: CheckConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckConnectionOutput {
    pub fn succeeded() -> Self {
        Self {
            status: CheckConnectionStatus::Succeeded,
            message: None,
        }
    }

    pub fn failed(message: Option<String>) -> Self {
        Self {
            status: CheckConnectionStatus::Failed,
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoverCatalogOutput {
    pub catalog: Catalog,
}
