//! Persistence adapter
//!
//! - UnstructuredDocument: schema-less envelope around a metering record
//! - ResourceStore: the create-only collaborator contract
//! - MeteringEmitter: timeout-bounded sequential emission

pub mod document;
pub mod emitter;
pub mod store;

pub use document::{to_unstructured_map, UnstructuredDocument};
pub use emitter::MeteringEmitter;
pub use store::{InMemoryStore, ResourceStore};
