//! Request flows that tie the ports together.
//!
//! Each orchestrator owns one family of operations; [`SchedulerHandler`]
//! composes them behind a single facade.

pub mod check;
pub mod discover;
pub mod handler;
pub mod jobs;
pub mod resolve;
pub mod spec;

pub use check::{ConnectionCheckOrchestrator, report_connection_status};
pub use discover::{SchemaDiscoveryOrchestrator, discover_job_to_output};
pub use handler::{SchedulerHandler, SchedulerPorts};
pub use jobs::{ResetJobOrchestrator, SyncJobOrchestrator};
pub use resolve::{ConnectorResolver, ResolvedConnector};
pub use spec::SpecificationOrchestrator;
