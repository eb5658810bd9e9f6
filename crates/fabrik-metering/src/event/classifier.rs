//! Metering relevance and event-type classification
//!
//! Only the arrival of a resource in a billable state emits usage:
//! intermediate states such as `in_progress` never count, so a lifecycle
//! walk of create → in_progress → succeeded bills exactly once.
//!
//! Each metered kind contributes one [`KindRule`] to [`KIND_RULES`]. Adding a
//! kind means adding a `MeteredKind` variant, a row here and an arm in
//! [`KindRule::for_kind`].

use fabrik_common::{EventType, MeteredKind, OperationType, Result};
use tracing::{debug, error};

use super::Event;

/// Relevance and event-type predicates for one resource kind
#[derive(Debug, Clone, Copy)]
pub struct KindRule {
    pub kind: MeteredKind,
    /// Whether a transition of this kind is billable
    pub relevant: fn(&Event) -> bool,
    /// Event type of a billable, non-delete transition
    pub event_type: fn(&Event) -> Option<EventType>,
}

/// Rule table, one row per `MeteredKind`
pub static KIND_RULES: [KindRule; MeteredKind::ALL.len()] = [
    KindRule {
        kind: MeteredKind::Director,
        relevant: director_relevant,
        event_type: director_event_type,
    },
    KindRule {
        kind: MeteredKind::Docker,
        relevant: docker_relevant,
        event_type: docker_event_type,
    },
];

impl KindRule {
    pub fn for_kind(kind: MeteredKind) -> &'static KindRule {
        match kind {
            MeteredKind::Director => &KIND_RULES[0],
            MeteredKind::Docker => &KIND_RULES[1],
        }
    }
}

// Director: create succeeded, update with a plan change succeeded, or delete
fn director_relevant(event: &Event) -> bool {
    if !event.is_state_changed() {
        return false;
    }
    if event.is_succeeded() {
        return (event.is_update() && event.is_plan_changed()) || event.is_create();
    }
    event.is_delete_triggered()
}

fn director_event_type(event: &Event) -> Option<EventType> {
    match event.new_resource().status.last_operation.op_type {
        OperationType::Update => Some(EventType::Update),
        OperationType::Create => Some(EventType::Create),
        OperationType::Unset | OperationType::Delete | OperationType::Other(_) => None,
    }
}

// Docker has no plan updates: any arrival in succeeded is a create
fn docker_relevant(event: &Event) -> bool {
    event.is_state_changed() && (event.is_succeeded() || event.is_delete_triggered())
}

fn docker_event_type(event: &Event) -> Option<EventType> {
    event.is_succeeded().then_some(EventType::Create)
}

impl Event {
    fn rule(&self) -> Option<&'static KindRule> {
        self.new_resource().kind.metered().map(KindRule::for_kind)
    }

    /// Whether the observed transition is billable
    pub fn is_metering_event(&self) -> bool {
        let new = self.new_resource();
        let relevant = self.rule().is_some_and(|rule| (rule.relevant)(self));
        debug!(
            resource = %new.name,
            kind = %new.kind,
            new_state = %new.status.state,
            old_state = %self.old_resource().map(|old| old.status.state.as_str()).unwrap_or("<absent>"),
            last_operation = %new.status.last_operation.op_type,
            plan_changed = self.is_plan_changed(),
            relevant,
            "Checked metering relevance"
        );
        relevant
    }

    /// Derive the event type of the transition.
    ///
    /// Does not check relevance; returns `NoSupportedEvent` when no rule
    /// yields a type.
    pub fn event_type(&self) -> Result<EventType> {
        if self.is_delete_triggered() {
            return Ok(EventType::Delete);
        }
        self.rule()
            .and_then(|rule| (rule.event_type)(self))
            .ok_or_else(|| self.no_supported_event())
    }

    /// Classify the transition: `None` when it is not billable
    pub fn classify(&self) -> Option<EventType> {
        if !self.is_metering_event() {
            return None;
        }
        match self.event_type() {
            Ok(event_type) => Some(event_type),
            Err(e) => {
                error!(error = %e, "Relevant transition has no event type");
                debug_assert!(false, "relevant transition without event type: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabrik_common::{GenericResource, ResourceKind, ResourceState};

    fn resource(kind: ResourceKind, state: &str, op: &str, applied_plan: &str) -> GenericResource {
        let mut resource = GenericResource {
            kind,
            name: "instance-1".into(),
            ..Default::default()
        };
        resource.status.state = ResourceState::from(state);
        resource.status.last_operation.op_type = OperationType::from(op);
        resource.status.applied_options.plan_id = applied_plan.into();
        resource
    }

    fn director(state: &str, op: &str, plan: &str) -> GenericResource {
        resource(ResourceKind::Director, state, op, plan)
    }

    fn docker(state: &str, op: &str) -> GenericResource {
        resource(ResourceKind::Docker, state, op, "")
    }

    #[test]
    fn test_rule_table_matches_kind_index() {
        assert_eq!(KIND_RULES.len(), MeteredKind::ALL.len());
        for kind in MeteredKind::ALL {
            assert_eq!(KindRule::for_kind(kind).kind, kind);
        }
    }

    #[test]
    fn test_director_update_with_plan_change() {
        let event = Event::new(
            director("succeeded", "update", "newPlanUUID"),
            Some(director("in_progress", "update", "oldPlanUUID")),
        );
        assert!(event.is_metering_event());
        assert_eq!(event.classify(), Some(EventType::Update));
    }

    #[test]
    fn test_director_update_without_plan_change() {
        let event = Event::new(
            director("succeeded", "update", "PlanUUID"),
            Some(director("in_progress", "update", "PlanUUID")),
        );
        assert!(!event.is_metering_event());
        assert_eq!(event.classify(), None);
    }

    #[test]
    fn test_director_unchanged_state_never_relevant() {
        for (state, op) in [
            ("succeeded", "update"),
            ("succeeded", "create"),
            ("delete", "delete"),
            ("failed", "update"),
            ("in_progress", "create"),
        ] {
            let event = Event::new(
                director(state, op, "newPlanUUID"),
                Some(director(state, op, "oldPlanUUID")),
            );
            assert!(!event.is_metering_event(), "{state}/{op} must not be relevant");
        }
    }

    #[test]
    fn test_director_failed_update() {
        let event = Event::new(
            director("failed", "update", "newPlanUUID"),
            Some(director("in_progress", "update", "oldPlanUUID")),
        );
        assert!(!event.is_metering_event());
    }

    #[test]
    fn test_director_create_succeeded() {
        let event = Event::new(
            director("succeeded", "create", "PlanUUID"),
            Some(director("in_progress", "create", "PlanUUID")),
        );
        assert_eq!(event.classify(), Some(EventType::Create));
    }

    #[test]
    fn test_director_create_failed() {
        let event = Event::new(
            director("failed", "create", ""),
            Some(director("in_progress", "create", "")),
        );
        assert_eq!(event.classify(), None);
    }

    #[test]
    fn test_director_delete_triggered() {
        let event = Event::new(
            director("delete", "create", "PlanUUID"),
            Some(director("succeeded", "create", "PlanUUID")),
        );
        assert_eq!(event.classify(), Some(EventType::Delete));
    }

    #[test]
    fn test_director_failed_after_delete() {
        let event = Event::new(
            director("failed", "delete", ""),
            Some(director("delete", "delete", "")),
        );
        assert_eq!(event.classify(), None);
    }

    #[test]
    fn test_docker_create_succeeded_any_operation() {
        for op in ["create", "update", ""] {
            let event = Event::new(docker("succeeded", op), Some(docker("in_progress", op)));
            assert_eq!(event.classify(), Some(EventType::Create), "operation {op:?}");
        }
    }

    #[test]
    fn test_docker_unchanged_and_failed() {
        let unchanged = Event::new(docker("succeeded", "create"), Some(docker("succeeded", "create")));
        assert_eq!(unchanged.classify(), None);

        let failed = Event::new(docker("failed", "create"), Some(docker("in_progress", "create")));
        assert_eq!(failed.classify(), None);
    }

    #[test]
    fn test_docker_delete() {
        let triggered = Event::new(docker("delete", "create"), Some(docker("succeeded", "create")));
        assert_eq!(triggered.classify(), Some(EventType::Delete));

        let repeated = Event::new(docker("delete", "delete"), Some(docker("delete", "delete")));
        assert_eq!(repeated.classify(), None);
    }

    #[test]
    fn test_unmetered_kind_never_relevant() {
        let event = Event::new(
            resource(ResourceKind::Sfevent, "delete", "create", ""),
            Some(resource(ResourceKind::Sfevent, "succeeded", "create", "")),
        );
        assert!(!event.is_metering_event());
        assert_eq!(event.classify(), None);
    }

    #[test]
    fn test_event_type_without_relevance() {
        let event = Event::new(director("in_progress", "delete", ""), None);
        let err = event.event_type().unwrap_err();
        assert!(err.is_skippable());

        let unknown = Event::new(
            resource(ResourceKind::Other("Postgres".into()), "succeeded", "create", ""),
            None,
        );
        assert!(unknown.event_type().unwrap_err().is_skippable());
    }

    #[test]
    fn test_create_without_prior_snapshot() {
        let event = Event::new(director("succeeded", "create", "PlanUUID"), None);
        assert_eq!(event.classify(), Some(EventType::Create));
    }
}
