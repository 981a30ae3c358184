use std::fmt::{self, Display};

use crate::job::{JobId, JobStatus};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidId(uuid::Error),
    InvalidTransition {
        job_id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidId(err) => write!(f, "invalid id: {err}"),
            ModelError::InvalidTransition { job_id, from, to } => write!(
                f,
                "job {job_id} cannot move from {from} to {to}"
            ),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::InvalidId(err) => Some(err),
            ModelError::InvalidTransition { .. } => None,
        }
    }
}

impl From<uuid::Error> for ModelError {
    fn from(err: uuid::Error) -> Self {
        ModelError::InvalidId(err)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
