use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use ferry_model::{
    ConnectionId, CreateJobRequest, DedupeKey, Job, JobHandle, JobId,
    JobStatus,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    error::{ConfigKind, Result, SchedulerError},
    ports::AsynchronousJobClient,
};

#[derive(Debug, Default)]
struct QueueState {
    jobs: HashMap<JobId, Job>,
    active: HashMap<DedupeKey, JobId>,
    order: Vec<JobId>,
}

/// Job queue held in process memory.
///
/// One lock covers the active-key lookup and the insert, so concurrent
/// submissions for the same connection and kind collapse onto one job.
#[derive(Debug, Default, Clone)]
pub struct InMemoryJobQueue {
    state: Arc<Mutex<QueueState>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a job through its lifecycle. Terminal jobs release their
    /// dedupe key so the next submission creates a fresh job.
    pub async fn transition(
        &self,
        job_id: JobId,
        status: JobStatus,
    ) -> Result<Job> {
        let mut guard = self.state.lock().await;
        let job = guard
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| SchedulerError::not_found(ConfigKind::Job, job_id))?;
        job.transition(status, Utc::now())?;
        let job = job.clone();

        if job.status.is_terminal() {
            let key = job.dedupe_key();
            if guard.active.get(&key) == Some(&job.id) {
                guard.active.remove(&key);
            }
        }
        debug!(%job_id, %status, "job transitioned");
        Ok(job)
    }

    pub async fn get_job(&self, job_id: JobId) -> Result<Job> {
        let guard = self.state.lock().await;
        guard
            .jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| SchedulerError::not_found(ConfigKind::Job, job_id))
    }

    /// Jobs for one connection in submission order.
    pub async fn list_jobs(&self, scope: ConnectionId) -> Vec<Job> {
        let guard = self.state.lock().await;
        guard
            .order
            .iter()
            .filter_map(|id| guard.jobs.get(id))
            .filter(|job| job.scope == scope)
            .cloned()
            .collect()
    }

    pub async fn job_count(&self) -> usize {
        self.state.lock().await.jobs.len()
    }
}

#[async_trait]
impl AsynchronousJobClient for InMemoryJobQueue {
    async fn create_or_get_active(
        &self,
        request: CreateJobRequest,
    ) -> Result<JobHandle> {
        let key = request.dedupe_key();
        let mut guard = self.state.lock().await;

        if let Some(existing) = guard
            .active
            .get(&key)
            .and_then(|id| guard.jobs.get(id))
            .filter(|job| job.status.is_active())
        {
            debug!(job_id = %existing.id, dedupe_key = %key, "merged into active job");
            return Ok(JobHandle::existing(existing.clone()));
        }

        let job = Job::pending(request.scope, request.config);
        guard.active.insert(key, job.id);
        guard.order.push(job.id);
        guard.jobs.insert(job.id, job.clone());
        debug!(job_id = %job.id, dedupe_key = %key, "job created");
        Ok(JobHandle::created(job))
    }
}
