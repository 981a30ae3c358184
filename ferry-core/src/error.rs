use ferry_model::{ConnectorRole, ModelError, SynchronousJobMetadata};
use thiserror::Error;

/// What the config store could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Definition(ConnectorRole),
    Instance(ConnectorRole),
    StandardSync,
    Job,
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigKind::Definition(role) => write!(f, "{role} definition"),
            ConfigKind::Instance(role) => write!(f, "{role}"),
            ConfigKind::StandardSync => write!(f, "standard sync"),
            ConfigKind::Job => write!(f, "job"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ConfigKind, id: String },

    #[error("configuration failed validation: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Integration defect: a collaborator failed in a way nothing here expects.
    #[error("Fatal error: {0:#}")]
    Fatal(anyhow::Error),
}

impl SchedulerError {
    pub fn not_found(kind: ConfigKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SchedulerError::NotFound { .. })
    }

    /// IO and transport failures reach the caller unchanged.
    pub fn is_transport(&self) -> bool {
        matches!(self, SchedulerError::Io(_) | SchedulerError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Failures a synchronous job client may raise.
#[derive(Error, Debug)]
pub enum SynchronousJobError {
    /// The job ran and the connector reported failure. Expected; carries metadata.
    #[error("synchronous job {} ({}) failed", .0.id, .0.config_type)]
    JobFailed(SynchronousJobMetadata),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
