//! # Fabrik Metering
//!
//! Metering event derivation for Service Fabrik instance admissions.
//!
//! An admission review carries the new and old version of a Director or
//! Docker instance. The pipeline decides whether that transition is billable
//! and, if so, creates one or two pending metering documents:
//!
//! ```text
//! create succeeded          -> [start(new options)]
//! update with plan change   -> [start(new options), stop(old applied options)]
//! delete triggered          -> [stop(old applied options)]
//! ```
//!
//! Everything up to the store call is synchronous and pure; only the
//! `create` calls are async.

pub mod config;
pub mod event;
pub mod metering;
pub mod persistence;
pub mod processor;

pub use config::MeteringConfig;
pub use event::{Event, KindRule};
pub use metering::{ConsumerInfo, InstancesMeasure, MeteringOptions, MeteringRecord, ServiceInfo};
pub use persistence::{InMemoryStore, MeteringEmitter, ResourceStore, UnstructuredDocument};
pub use processor::{MeteringProcessor, ProcessOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default upper bound for a single store create call
pub const DEFAULT_CREATE_TIMEOUT_MS: u64 = 5000;
