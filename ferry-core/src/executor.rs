//! The single boundary where synchronous job failures become data.
//!
//! A job that runs and fails is an expected outcome, so it comes back as
//! [`SynchronousJobResult::Failed`] carrying the job's metadata. IO and
//! transport failures keep propagating as errors. Anything else is an
//! integration defect and surfaces as [`SchedulerError::Fatal`].

use std::future::Future;

use ferry_model::JobInfo;
use tracing::{error, warn};

use crate::error::{Result, SchedulerError, SynchronousJobError};

/// Exactly one of business value or job-failure info.
#[derive(Clone, Debug, PartialEq)]
pub enum SynchronousJobResult<T> {
    Succeeded(T),
    Failed(JobInfo),
}

impl<T> SynchronousJobResult<T> {
    pub fn into_parts(self) -> (Option<T>, Option<JobInfo>) {
        match self {
            SynchronousJobResult::Succeeded(value) => (Some(value), None),
            SynchronousJobResult::Failed(info) => (None, Some(info)),
        }
    }
}

pub async fn execute_synchronous_job<T, F, Fut>(
    work: F,
) -> Result<SynchronousJobResult<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, SynchronousJobError>>,
{
    match work().await {
        Ok(value) => Ok(SynchronousJobResult::Succeeded(value)),
        Err(SynchronousJobError::JobFailed(metadata)) => {
            warn!(
                job_id = %metadata.id,
                config_type = %metadata.config_type,
                "synchronous job failed"
            );
            Ok(SynchronousJobResult::Failed(JobInfo::from(&metadata)))
        }
        Err(SynchronousJobError::Io(err)) => Err(SchedulerError::Io(err)),
        Err(SynchronousJobError::Transport(msg)) => {
            Err(SchedulerError::Transport(msg))
        }
        Err(SynchronousJobError::Unexpected(err)) => {
            error!(error = %err, "synchronous job client failed unexpectedly");
            Err(SchedulerError::Fatal(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ferry_model::{SyncJobConfigType, SynchronousJobMetadata};
    use std::{io, path::PathBuf};
    use uuid::Uuid;

    fn failed_metadata() -> SynchronousJobMetadata {
        let now = Utc::now();
        SynchronousJobMetadata {
            id: Uuid::new_v4(),
            config_type: SyncJobConfigType::CheckConnectionSource,
            config_id: Some("source-1".into()),
            created_at: now,
            ended_at: now,
            succeeded: false,
            log_path: Some(PathBuf::from("/tmp/jobs/1/logs.log")),
        }
    }

    #[tokio::test]
    async fn success_fills_only_the_value_slot() {
        let result = execute_synchronous_job(|| async { Ok::<_, SynchronousJobError>(42) })
            .await
            .unwrap();
        assert_eq!(result.into_parts(), (Some(42), None));
    }

    #[tokio::test]
    async fn job_failure_becomes_job_info() {
        let metadata = failed_metadata();
        let expected = JobInfo::from(&metadata);
        let result = execute_synchronous_job(|| async move {
            Err::<u32, _>(SynchronousJobError::JobFailed(metadata))
        })
        .await
        .unwrap();

        let (value, info) = result.into_parts();
        assert!(value.is_none());
        assert_eq!(info, Some(expected));
    }

    #[tokio::test]
    async fn io_failure_propagates_unchanged() {
        let err = execute_synchronous_job(|| async {
            Err::<u32, _>(SynchronousJobError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scheduler unreachable",
            )))
        })
        .await
        .unwrap_err();

        match err {
            SchedulerError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::ConnectionRefused);
                assert_eq!(inner.to_string(), "scheduler unreachable");
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_propagates_unchanged() {
        let err = execute_synchronous_job(|| async {
            Err::<u32, _>(SynchronousJobError::Transport("reset by peer".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SchedulerError::Transport(ref msg) if msg == "reset by peer"));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn unexpected_failure_is_fatal() {
        let err = execute_synchronous_job(|| async {
            Err::<u32, _>(SynchronousJobError::Unexpected(anyhow::anyhow!(
                "worker returned malformed payload"
            )))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SchedulerError::Fatal(_)));
        assert!(!err.is_transport());
    }
}
