//! Builds ferry-core services with the knobs from [`FerryConfig`].

use std::sync::Arc;

use ferry_core::{
    SchedulerHandler, SchedulerPorts,
    infra::SecretPreservingMerger,
    ports::{ConfigStore, SpecFetcher},
};
use tracing::debug;

use crate::settings::FerryConfig;

impl FerryConfig {
    /// Merger that reads `merge.secret_mask` as "keep the stored secret".
    pub fn secret_merger(
        &self,
        store: Arc<dyn ConfigStore>,
        specs: Arc<dyn SpecFetcher>,
    ) -> SecretPreservingMerger {
        SecretPreservingMerger::new(store, specs)
            .with_secret_mask(self.merge.secret_mask.clone())
    }

    /// Handler over `ports` that attaches `jobs.log_tail_lines` of job log.
    pub fn scheduler_handler(&self, ports: SchedulerPorts) -> SchedulerHandler {
        debug!(
            log_tail_lines = self.jobs.log_tail_lines,
            "building scheduler handler"
        );
        SchedulerHandler::new(ports).with_log_tail(self.jobs.log_tail_lines)
    }
}
