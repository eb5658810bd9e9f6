//! Metering record derivation from classified events

use fabrik_common::{EventType, MeterSignal, Result};
use tracing::info;

use super::record::MeteringRecord;
use crate::event::Event;

impl Event {
    /// Records for an already classified event type.
    ///
    /// Updates yield `[start(new spec options), stop(old applied options)]`
    /// in that order; downstream consumers rely on the start preceding the
    /// stop when tracking overlapping billing windows.
    pub fn records_for(&self, event_type: EventType) -> Vec<MeteringRecord> {
        let new = self.new_resource();
        let start = || MeteringRecord::build(&new.spec.options, &new.name, MeterSignal::Start);
        let stop = || MeteringRecord::build(&self.old_applied_options(), &new.name, MeterSignal::Stop);

        let records = match event_type {
            EventType::Update => vec![start(), stop()],
            EventType::Create => vec![start()],
            EventType::Delete => vec![stop()],
        };
        for record in &records {
            info!(
                resource = %new.name,
                metering_id = %record.name(),
                event_type = %event_type,
                plan = %record.plan(),
                "New metering event"
            );
        }
        records
    }

    /// Classify the transition and build its metering records.
    ///
    /// Non-billable transitions return the skippable `NoSupportedEvent`
    /// error; no partial result is ever returned.
    pub fn metering_records(&self) -> Result<Vec<MeteringRecord>> {
        let event_type = self.classify().ok_or_else(|| self.no_supported_event())?;
        Ok(self.records_for(event_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabrik_common::{GenericResource, OperationType, ResourceKind, ResourceState};

    fn director(state: ResourceState, op: OperationType, spec_plan: &str, applied_plan: &str) -> GenericResource {
        let mut resource = GenericResource {
            kind: ResourceKind::Director,
            name: "instance-1".into(),
            ..Default::default()
        };
        resource.spec.options.service_id = "redis".into();
        resource.spec.options.plan_id = spec_plan.into();
        resource.status.state = state;
        resource.status.last_operation.op_type = op;
        resource.status.applied_options.service_id = "redis".into();
        resource.status.applied_options.plan_id = applied_plan.into();
        resource
    }

    #[test]
    fn test_update_yields_start_then_stop() {
        let event = Event::new(
            director(ResourceState::Succeeded, OperationType::Update, "new plan in options", "newPlan"),
            Some(director(ResourceState::InProgress, OperationType::Update, "newPlan", "oldPlan")),
        );

        let records = event.metering_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].plan(), "new plan in options");
        assert_eq!(records[0].signal(), Some(MeterSignal::Start));
        assert_eq!(records[1].plan(), "oldPlan");
        assert_eq!(records[1].signal(), Some(MeterSignal::Stop));
        assert_ne!(records[0].name(), records[1].name());
    }

    #[test]
    fn test_create_yields_single_start() {
        let event = Event::new(
            director(ResourceState::Succeeded, OperationType::Create, "small", "small"),
            Some(director(ResourceState::InProgress, OperationType::Create, "small", "")),
        );

        let records = event.metering_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].plan(), "small");
        assert_eq!(records[0].signal(), Some(MeterSignal::Start));
    }

    #[test]
    fn test_delete_yields_stop_from_old_applied_options() {
        let event = Event::new(
            director(ResourceState::Delete, OperationType::Create, "spec-plan", "new-applied"),
            Some(director(ResourceState::Succeeded, OperationType::Create, "spec-plan", "committed")),
        );

        let records = event.metering_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].plan(), "committed");
        assert_eq!(records[0].signal(), Some(MeterSignal::Stop));
    }

    #[test]
    fn test_irrelevant_transition_is_skippable_error() {
        let event = Event::new(
            director(ResourceState::Succeeded, OperationType::Update, "same", "same"),
            Some(director(ResourceState::InProgress, OperationType::Update, "same", "same")),
        );

        let err = event.metering_records().unwrap_err();
        assert!(err.is_skippable());
    }
}
