//! Configuration and bootstrap helpers shared by Ferry binaries.
//!
//! - [`settings`]: [`FerryConfig`] and its file/env loader
//! - [`snapshot`]: [`StateSnapshot`], the seed document for the in-memory
//!   adapters
//! - [`telemetry`]: tracing subscriber setup
//! - `compose`: ferry-core services built with the configured merge mask and
//!   job log tail

mod compose;
pub mod settings;
pub mod snapshot;
pub mod telemetry;

pub use settings::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigMetadata,
    ConfigSource, FerryConfig, JobsConfig, MergeConfig,
};
pub use snapshot::{CachedSpecification, LoadedState, StateSnapshot};
pub use telemetry::init_tracing;
