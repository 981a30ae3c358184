use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    error::{ModelError, Result},
    ids::ConnectionId,
};

/// Unique identifier for asynchronous jobs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of asynchronous work that can be scheduled against a connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Sync,
    ResetConnection,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Sync => write!(f, "sync"),
            JobKind::ResetConnection => write!(f, "reset_connection"),
        }
    }
}

/// Job lifecycle: `Pending -> Running -> {Succeeded, Failed, Cancelled}`.
/// A pending job may also be cancelled before it starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Active jobs block creation of another job with the same dedupe key.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Pending, JobStatus::Cancelled)
                | (JobStatus::Running, JobStatus::Succeeded)
                | (JobStatus::Running, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Cancelled)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Everything a sync job needs to move data from source to destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncJobConfig {
    pub source_image: String,
    pub source_configuration: Value,
    pub destination_image: String,
    pub destination_configuration: Value,
    pub catalog: Catalog,
}

/// Reset jobs only touch the destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResetJobConfig {
    pub destination_image: String,
    pub destination_configuration: Value,
    pub catalog: Catalog,
}

/// Structured payload per job kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum JobConfig {
    Sync(SyncJobConfig),
    ResetConnection(ResetJobConfig),
}

impl JobConfig {
    pub fn kind(&self) -> JobKind {
        match self {
            JobConfig::Sync(_) => JobKind::Sync,
            JobConfig::ResetConnection(_) => JobKind::ResetConnection,
        }
    }
}

/// At most one active job may exist per dedupe key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DedupeKey {
    pub kind: JobKind,
    pub scope: ConnectionId,
}

impl fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.scope)
    }
}

/// Persisted unit of scheduled work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub scope: ConnectionId,
    pub config: JobConfig,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn pending(scope: ConnectionId, config: JobConfig) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            scope,
            config,
            status: JobStatus::Pending,
            created_at: now,
            started_at: None,
            updated_at: now,
            ended_at: None,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.config.kind()
    }

    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey {
            kind: self.kind(),
            scope: self.scope,
        }
    }

    /// Move the job to `next`, stamping start/end times on the way.
    pub fn transition(
        &mut self,
        next: JobStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(ModelError::InvalidTransition {
                job_id: self.id,
                from: self.status,
                to: next,
            });
        }
        if next == JobStatus::Running {
            self.started_at = Some(at);
        }
        if next.is_terminal() {
            self.ended_at = Some(at);
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}

/// Request handed to the asynchronous job client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub scope: ConnectionId,
    pub config: JobConfig,
}

impl CreateJobRequest {
    pub fn new(scope: ConnectionId, config: JobConfig) -> Self {
        Self { scope, config }
    }

    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey {
            kind: self.config.kind(),
            scope: self.scope,
        }
    }
}

/// Result of a create-or-get-active call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job: Job,
    /// `false` when an already active job was returned instead.
    pub created: bool,
}

impl JobHandle {
    pub fn created(job: Job) -> Self {
        Self { job, created: true }
    }

    pub fn existing(job: Job) -> Self {
        Self {
            job,
            created: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_job() -> Job {
        Job::pending(
            ConnectionId::new(),
            JobConfig::ResetConnection(ResetJobConfig {
                destination_image: "airbyte/destination-postgres:0.3.0".into(),
                destination_configuration: Value::Null,
                catalog: Catalog::default(),
            }),
        )
    }

    #[test]
    fn running_then_succeeded_stamps_both_timestamps() {
        let mut job = reset_job();
        let start = Utc::now();
        job.transition(JobStatus::Running, start).unwrap();
        assert_eq!(job.started_at, Some(start));
        assert!(job.ended_at.is_none());

        let end = Utc::now();
        job.transition(JobStatus::Succeeded, end).unwrap();
        assert_eq!(job.ended_at, Some(end));
        assert!(!job.status.is_active());
    }

    #[test]
    fn terminal_jobs_cannot_restart() {
        let mut job = reset_job();
        job.transition(JobStatus::Cancelled, Utc::now()).unwrap();
        let err = job.transition(JobStatus::Running, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidTransition {
                from: JobStatus::Cancelled,
                to: JobStatus::Running,
                ..
            }
        ));
    }

    #[test]
    fn dedupe_key_is_kind_and_scope() {
        let job = reset_job();
        assert_eq!(
            job.dedupe_key().to_string(),
            format!("reset_connection:{}", job.scope)
        );
    }
}
