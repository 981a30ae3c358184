use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use ferry_model::ConnectorSpecification;
use tracing::debug;

use crate::{
    error::{Result, SchedulerError},
    executor::{SynchronousJobResult, execute_synchronous_job},
    image::ImageReference,
    ports::{SpecFetcher, SynchronousJobClient},
};

/// Fetches specifications by running the connector's spec command.
#[derive(Clone)]
pub struct JobSpecFetcher {
    jobs: Arc<dyn SynchronousJobClient>,
}

impl fmt::Debug for JobSpecFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobSpecFetcher").finish_non_exhaustive()
    }
}

impl JobSpecFetcher {
    pub fn new(jobs: Arc<dyn SynchronousJobClient>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl SpecFetcher for JobSpecFetcher {
    async fn fetch(
        &self,
        image: &ImageReference,
    ) -> Result<ConnectorSpecification> {
        let jobs = Arc::clone(&self.jobs);
        let outcome =
            execute_synchronous_job(|| async move { jobs.get_spec(image).await })
                .await?;

        match outcome {
            SynchronousJobResult::Succeeded(response) => {
                response.output.ok_or_else(|| {
                    SchedulerError::Transport(format!(
                        "spec job for {image} produced no specification"
                    ))
                })
            }
            SynchronousJobResult::Failed(info) => {
                Err(SchedulerError::Transport(format!(
                    "spec job {} for {image} failed",
                    info.id
                )))
            }
        }
    }
}

/// Specifications known ahead of time, keyed by image reference.
#[derive(Debug, Default, Clone)]
pub struct StaticSpecFetcher {
    specs: HashMap<String, ConnectorSpecification>,
}

impl StaticSpecFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(
        mut self,
        image: impl Into<String>,
        spec: ConnectorSpecification,
    ) -> Self {
        self.insert(image, spec);
        self
    }

    pub fn insert(
        &mut self,
        image: impl Into<String>,
        spec: ConnectorSpecification,
    ) {
        self.specs.insert(image.into(), spec);
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[async_trait]
impl SpecFetcher for StaticSpecFetcher {
    async fn fetch(
        &self,
        image: &ImageReference,
    ) -> Result<ConnectorSpecification> {
        let spec = self.specs.get(image.as_str()).cloned().ok_or_else(|| {
            SchedulerError::Transport(format!(
                "no cached specification for {image}"
            ))
        })?;
        debug!(%image, "served cached specification");
        Ok(spec)
    }
}
