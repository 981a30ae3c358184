//! Adapters for the ports in [`crate::ports`].
//!
//! Everything here runs in-process: the config store and job queue keep
//! their records in memory, and specifications come either from a
//! synchronous job or from a preloaded cache.

pub mod memory_queue;
pub mod memory_store;
pub mod merge;
pub mod schema;
pub mod spec_fetcher;

pub use memory_queue::InMemoryJobQueue;
pub use memory_store::InMemoryConfigStore;
pub use merge::{DEFAULT_SECRET_MASK, SecretPreservingMerger};
pub use schema::JsonSchemaValidator;
pub use spec_fetcher::{JobSpecFetcher, StaticSpecFetcher};
