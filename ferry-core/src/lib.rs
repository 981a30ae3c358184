//! # Ferry Core
//!
//! Connector orchestration for Ferry: checking connections, discovering
//! schemas, serving connector specifications, and submitting sync and reset
//! jobs without ever running two for the same connection at once.
//!
//! ## Architecture
//!
//! - [`ports`]: traits for storage, connector execution, and job scheduling
//! - [`orchestration`]: request flows, composed by [`SchedulerHandler`]
//! - [`executor`]: turns synchronous job failures into data
//! - [`infra`]: in-memory adapters, the JSON Schema validator, and the
//!   secret-preserving configuration merger
//! - [`converters`]: protocol catalog and job log helpers
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ferry_core::{
//!     SchedulerHandler, SchedulerPorts,
//!     infra::{
//!         InMemoryConfigStore, InMemoryJobQueue, JsonSchemaValidator,
//!         SecretPreservingMerger, StaticSpecFetcher,
//!     },
//!     ports::SynchronousJobClient,
//! };
//!
//! fn build(jobs: Arc<dyn SynchronousJobClient>) -> SchedulerHandler {
//!     let store = Arc::new(InMemoryConfigStore::new());
//!     let specs = Arc::new(StaticSpecFetcher::new());
//!     SchedulerHandler::new(SchedulerPorts {
//!         config_store: store.clone(),
//!         spec_fetcher: specs.clone(),
//!         schema_validator: Arc::new(JsonSchemaValidator::new()),
//!         config_merger: Arc::new(SecretPreservingMerger::new(store, specs)),
//!         synchronous_jobs: jobs,
//!         asynchronous_jobs: Arc::new(InMemoryJobQueue::new()),
//!     })
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod converters;
pub mod error;
pub mod executor;
pub mod image;
pub mod infra;
pub mod orchestration;
pub mod ports;

pub use error::{ConfigKind, Result, SchedulerError, SynchronousJobError};
pub use executor::{SynchronousJobResult, execute_synchronous_job};
pub use image::ImageReference;
pub use orchestration::{SchedulerHandler, SchedulerPorts};
