//! Metering records
//!
//! A record is one start or stop measure for one service instance. Records
//! are immutable once built; every record carries its own fresh id.

use chrono::{DateTime, Utc};
use fabrik_common::constants::{MEASURES_ID, METERING_TIMESTAMP_FORMAT};
use fabrik_common::{GenericOptions, MeterSignal, Platform};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service SKU and plan the measure applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// SKU name of the service (e.g. redis), not a guid
    pub id: String,
    pub plan: String,
}

/// Tenant attribution of the measure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerInfo {
    pub environment: String,
    pub region: String,
    pub org: String,
    pub space: String,
    pub instance: String,
}

/// A single measured value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancesMeasure {
    pub id: String,
    pub value: i32,
}

/// Options payload of a metering document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringOptions {
    pub id: String,
    pub timestamp: String,
    pub service: ServiceInfo,
    pub consumer: ConsumerInfo,
    pub measures: Vec<InstancesMeasure>,
}

/// Normalized usage event with a start or stop measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringRecord {
    pub options: MeteringOptions,
}

impl MeteringRecord {
    /// Build a record for `instance` from an options payload
    pub fn build(options: &GenericOptions, instance: &str, signal: MeterSignal) -> Self {
        Self::build_at(options, instance, signal, Utc::now())
    }

    /// Build a record stamped with an explicit emission time
    pub fn build_at(
        options: &GenericOptions,
        instance: &str,
        signal: MeterSignal,
        now: DateTime<Utc>,
    ) -> Self {
        let context = &options.context;
        Self {
            options: MeteringOptions {
                id: Uuid::new_v4().to_string(),
                timestamp: now.format(METERING_TIMESTAMP_FORMAT).to_string(),
                service: ServiceInfo {
                    id: options.service_id.clone(),
                    plan: options.plan_id.clone(),
                },
                consumer: ConsumerInfo {
                    environment: Platform::parse(&context.platform).environment().to_string(),
                    region: String::new(),
                    org: context.organization_guid.clone(),
                    space: context.space_guid.clone(),
                    instance: instance.to_string(),
                },
                measures: vec![InstancesMeasure {
                    id: MEASURES_ID.to_string(),
                    value: signal.value(),
                }],
            },
        }
    }

    /// Document name: the generated record id
    pub fn name(&self) -> &str {
        &self.options.id
    }

    /// Signal of the instance measure
    pub fn signal(&self) -> Option<MeterSignal> {
        self.options
            .measures
            .first()
            .and_then(|measure| MeterSignal::from_value(measure.value))
    }

    pub fn plan(&self) -> &str {
        &self.options.service.plan
    }
}
