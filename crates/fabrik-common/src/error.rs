//! Error types for Service Fabrik metering
//!
//! Provides a unified error type and the domain-specific variants for each
//! stage of the pipeline: decoding, classification, and persistence.

use thiserror::Error;

/// Result type alias using FabrikError
pub type Result<T> = std::result::Result<T, FabrikError>;

/// Unified error type for metering operations
#[derive(Debug, Error)]
pub enum FabrikError {
    // Admission payload errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // No metering event could be derived
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    // Resource store errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FabrikError {
    /// True for the non-fatal "nothing to meter" condition.
    ///
    /// Callers treat this as a skip rather than a failure of the admission.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            FabrikError::Classification(ClassificationError::NoSupportedEvent { .. })
        )
    }
}

/// Admission payload decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Admission review carries no request")]
    MissingRequest,

    #[error("Could not decode new object: {0}")]
    NewObject(String),

    #[error("Could not decode old object: {0}")]
    OldObject(String),
}

/// Event classification errors
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error(
        "No supported event found for {kind} resource {name} \
         (state: {state:?}, last operation: {last_operation:?})"
    )]
    NoSupportedEvent {
        kind: String,
        name: String,
        state: String,
        last_operation: String,
    },
}

/// Resource store errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Document {name} already exists")]
    AlreadyExists { name: String },

    #[error("Create of {name} failed: {reason}")]
    Create { name: String, reason: String },

    #[error("Create of {name} timed out after {timeout_ms}ms")]
    Timeout { name: String, timeout_ms: u64 },

    #[error("Document is missing field {0}")]
    MissingField(&'static str),
}

impl From<serde_json::Error> for FabrikError {
    fn from(err: serde_json::Error) -> Self {
        FabrikError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for FabrikError {
    fn from(err: anyhow::Error) -> Self {
        FabrikError::Internal(err.to_string())
    }
}
