//! Enumerated constants shared by the metering pipeline
//!
//! Every lifecycle value the classifier compares against lives here as an
//! enum, so rule tables and builders are checked for exhaustiveness by the
//! compiler. Wire values that the resource controllers may extend in the
//! future decode into an `Other` variant instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of the persisted metering document
pub const METERING_KIND: &str = "Sfevent";

/// API version of instance resources and metering documents
pub const INSTANCE_API_VERSION: &str = "instance.servicefabrik.io/v1alpha1";

/// Namespace metering documents are created in
pub const DEFAULT_NAMESPACE: &str = "default";

/// Label key carrying the metering state of a document
pub const METER_STATE_KEY: &str = "state";

/// Label value picked up by the downstream metering job
pub const TO_BE_METERED: &str = "TO_BE_METERED";

/// Identifier of the single instance measure
pub const MEASURES_ID: &str = "instances";

/// chrono format of metering timestamps (always UTC)
pub const METERING_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Kind of a service-instance custom resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Director,
    Docker,
    /// Kind of the metering documents themselves
    Sfevent,
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Director => "Director",
            ResourceKind::Docker => "Docker",
            ResourceKind::Sfevent => METERING_KIND,
            ResourceKind::Other(kind) => kind,
        }
    }

    /// The metering rule set for this kind, if it has one
    pub fn metered(&self) -> Option<MeteredKind> {
        match self {
            ResourceKind::Director => Some(MeteredKind::Director),
            ResourceKind::Docker => Some(MeteredKind::Docker),
            ResourceKind::Sfevent | ResourceKind::Other(_) => None,
        }
    }
}

impl Default for ResourceKind {
    fn default() -> Self {
        ResourceKind::Other(String::new())
    }
}

impl From<String> for ResourceKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Director" => ResourceKind::Director,
            "Docker" => ResourceKind::Docker,
            METERING_KIND => ResourceKind::Sfevent,
            _ => ResourceKind::Other(value),
        }
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of resource kinds that carry metering rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeteredKind {
    Director,
    Docker,
}

impl MeteredKind {
    pub const ALL: [MeteredKind; 2] = [MeteredKind::Director, MeteredKind::Docker];
}

/// Lifecycle state of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceState {
    /// Empty state, as found on a resource that has never been reconciled
    #[default]
    Unset,
    InProgress,
    Succeeded,
    Failed,
    Delete,
    Other(String),
}

impl ResourceState {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceState::Unset => "",
            ResourceState::InProgress => "in_progress",
            ResourceState::Succeeded => "succeeded",
            ResourceState::Failed => "failed",
            ResourceState::Delete => "delete",
            ResourceState::Other(state) => state,
        }
    }
}

impl From<String> for ResourceState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => ResourceState::Unset,
            "in_progress" => ResourceState::InProgress,
            "succeeded" => ResourceState::Succeeded,
            "failed" => ResourceState::Failed,
            "delete" => ResourceState::Delete,
            _ => ResourceState::Other(value),
        }
    }
}

impl From<&str> for ResourceState {
    fn from(value: &str) -> Self {
        ResourceState::from(value.to_string())
    }
}

impl From<ResourceState> for String {
    fn from(state: ResourceState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of the operation that last touched a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationType {
    #[default]
    Unset,
    Create,
    Update,
    Delete,
    Other(String),
}

impl OperationType {
    pub fn as_str(&self) -> &str {
        match self {
            OperationType::Unset => "",
            OperationType::Create => "create",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
            OperationType::Other(op) => op,
        }
    }
}

impl From<String> for OperationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => OperationType::Unset,
            "create" => OperationType::Create,
            "update" => OperationType::Update,
            "delete" => OperationType::Delete,
            _ => OperationType::Other(value),
        }
    }
}

impl From<&str> for OperationType {
    fn from(value: &str) -> Self {
        OperationType::from(value.to_string())
    }
}

impl From<OperationType> for String {
    fn from(op: OperationType) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billable event derived from a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Create,
    Update,
    Delete,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "create",
            EventType::Update => "update",
            EventType::Delete => "delete",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start/stop signal carried by the instance measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterSignal {
    Start,
    Stop,
}

impl MeterSignal {
    /// Wire value of the measure
    pub fn value(&self) -> i32 {
        match self {
            MeterSignal::Start => 1,
            MeterSignal::Stop => 0,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(MeterSignal::Start),
            0 => Some(MeterSignal::Stop),
            _ => None,
        }
    }
}

/// Platform a service instance was provisioned from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Cloudfoundry,
    Other,
}

impl Platform {
    pub fn parse(value: &str) -> Self {
        match value {
            "cloudfoundry" => Platform::Cloudfoundry,
            _ => Platform::Other,
        }
    }

    /// Environment tag reported in consumer info
    pub fn environment(&self) -> &'static str {
        match self {
            Platform::Cloudfoundry => "CF",
            Platform::Other => "",
        }
    }
}
