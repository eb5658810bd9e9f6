//! Admission request processing
//!
//! Decode → classify → build → emit, once per admission request. Each call
//! works on its own `Event`; the processor holds no per-request state.

use std::sync::Arc;

use fabrik_common::{AdmissionReview, EventType, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::MeteringConfig;
use crate::event::Event;
use crate::persistence::{MeteringEmitter, ResourceStore};

/// Result of processing one admission request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// Transition is not billable; nothing was emitted
    Skipped,
    /// All derived records were created
    Emitted {
        event_type: EventType,
        record_ids: Vec<String>,
    },
}

/// Derives and persists metering documents for admission requests
pub struct MeteringProcessor<S: ResourceStore> {
    emitter: MeteringEmitter<S>,
}

impl<S: ResourceStore> MeteringProcessor<S> {
    pub fn new(store: Arc<S>, config: &MeteringConfig) -> Self {
        Self {
            emitter: MeteringEmitter::new(store, config),
        }
    }

    /// Process one admission review.
    ///
    /// Decode and persistence errors propagate; a persistence error after
    /// the first record of an update leaves the earlier record created.
    #[instrument(skip_all, fields(uid = review.request.as_ref().map(|r| r.uid.as_str()).unwrap_or_default()))]
    pub async fn process(&self, review: &AdmissionReview) -> Result<ProcessOutcome> {
        let event = Event::from_review(review)?;
        self.process_event(&event).await
    }

    /// Classify an already decoded event and emit its records
    pub async fn process_event(&self, event: &Event) -> Result<ProcessOutcome> {
        let Some(event_type) = event.classify() else {
            debug!(resource = %event.new_resource().name, "Not a metering event, skipping");
            return Ok(ProcessOutcome::Skipped);
        };

        let records = event.records_for(event_type);
        self.emitter.emit_all(&records).await?;

        info!(
            resource = %event.new_resource().name,
            event_type = %event_type,
            count = records.len(),
            "Metering documents created"
        );
        Ok(ProcessOutcome::Emitted {
            event_type,
            record_ids: records.iter().map(|r| r.name().to_string()).collect(),
        })
    }
}
