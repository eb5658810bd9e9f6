//! Admission events
//!
//! An [`Event`] pairs the new snapshot of a service instance with the
//! snapshot it replaces. It is built once per admission request, classified
//! once, and dropped.

pub mod classifier;

use fabrik_common::{
    AdmissionReview, ClassificationError, DecodeError, FabrikError, GenericOptions,
    GenericResource, OperationType, ResourceState, Result,
};
use tracing::{error, info};

pub use classifier::KindRule;

/// Old and new snapshots of a resource under admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    request_uid: String,
    new: GenericResource,
    /// `None` when the request carried no prior object (e.g. a CREATE)
    old: Option<GenericResource>,
}

impl Event {
    /// Create an event from already decoded snapshots
    pub fn new(new: GenericResource, old: Option<GenericResource>) -> Self {
        Self {
            request_uid: String::new(),
            new,
            old,
        }
    }

    /// Decode both snapshots of an admission review
    pub fn from_review(review: &AdmissionReview) -> Result<Self> {
        let request = review.request.as_ref().ok_or(DecodeError::MissingRequest)?;
        info!(
            uid = %request.uid,
            kind = %request.kind.kind,
            namespace = %request.namespace,
            name = %request.name,
            operation = %request.operation,
            user = %request.user_info.username,
            "Creating event for admission request"
        );

        let new_raw = request.raw_object()?;
        let old_raw = request.raw_old_object()?;
        let mut event = Self::from_raw(&new_raw, &old_raw)?;
        event.request_uid = request.uid.clone();
        Ok(event)
    }

    /// Decode snapshots from raw object bytes.
    ///
    /// Empty `old_raw` yields an event without a prior snapshot; malformed
    /// bytes on either side fail the whole construction.
    pub fn from_raw(new_raw: &[u8], old_raw: &[u8]) -> Result<Self> {
        let new = GenericResource::from_slice(new_raw).map_err(|e| {
            error!(error = %e, "Could not decode the new resource object");
            DecodeError::NewObject(e.to_string())
        })?;
        info!(resource = %new.name, kind = %new.kind, "Decoded resource");

        let old = if old_raw.is_empty() {
            None
        } else {
            let old = GenericResource::from_slice(old_raw).map_err(|e| {
                error!(resource = %new.name, error = %e, "Could not decode the old resource object");
                DecodeError::OldObject(e.to_string())
            })?;
            Some(old)
        };

        Ok(Self::new(new, old))
    }

    /// Admission request uid, empty for events not built from a review
    pub fn request_uid(&self) -> &str {
        &self.request_uid
    }

    pub fn new_resource(&self) -> &GenericResource {
        &self.new
    }

    pub fn old_resource(&self) -> Option<&GenericResource> {
        self.old.as_ref()
    }

    pub fn has_prior(&self) -> bool {
        self.old.is_some()
    }

    fn old_state(&self) -> Option<&ResourceState> {
        self.old.as_ref().map(|old| &old.status.state)
    }

    /// Options committed before this transition; empty without a prior snapshot
    pub fn old_applied_options(&self) -> GenericOptions {
        self.old
            .as_ref()
            .map(|old| old.status.applied_options.clone())
            .unwrap_or_default()
    }

    /// Lifecycle state differs from the prior snapshot.
    ///
    /// A missing prior snapshot compares as an empty state.
    pub fn is_state_changed(&self) -> bool {
        match self.old_state() {
            Some(old) => self.new.status.state != *old,
            None => self.new.status.state != ResourceState::Unset,
        }
    }

    pub fn is_delete_triggered(&self) -> bool {
        self.new.status.state == ResourceState::Delete
    }

    /// Applied plan differs from the prior snapshot's applied plan
    pub fn is_plan_changed(&self) -> bool {
        let old_plan = self
            .old
            .as_ref()
            .map(|old| old.status.applied_options.plan_id.as_str())
            .unwrap_or_default();
        self.new.status.applied_options.plan_id != old_plan
    }

    pub fn is_succeeded(&self) -> bool {
        self.new.status.state == ResourceState::Succeeded
    }

    pub fn is_create(&self) -> bool {
        self.new.status.last_operation.op_type == OperationType::Create
    }

    pub fn is_update(&self) -> bool {
        self.new.status.last_operation.op_type == OperationType::Update
    }

    pub(crate) fn no_supported_event(&self) -> FabrikError {
        ClassificationError::NoSupportedEvent {
            kind: self.new.kind.to_string(),
            name: self.new.name.clone(),
            state: self.new.status.state.to_string(),
            last_operation: self.new.status.last_operation.op_type.to_string(),
        }
        .into()
    }
}
