//! # Fabrik Common
//!
//! Shared types, constants, and errors for Service Fabrik instance metering.
//!
//! ## Core Types
//!
//! - [`GenericResource`]: kind-agnostic view of a Director/Docker instance
//! - [`AdmissionReview`]: admission payload carrying old and new objects
//! - [`constants`]: lifecycle enums and document constants
//! - [`FabrikError`]: unified error type for the pipeline

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use constants::{
    EventType, MeterSignal, MeteredKind, OperationType, Platform, ResourceKind, ResourceState,
};
pub use error::{ClassificationError, DecodeError, FabrikError, PersistenceError, Result};
pub use types::{
    admission::{AdmissionRequest, AdmissionReview, GroupVersionKind, UserInfo},
    resource::{GenericContext, GenericOptions, GenericResource, GenericSpec, GenericStatus, LastOperation},
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
