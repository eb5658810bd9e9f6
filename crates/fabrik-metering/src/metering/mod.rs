//! Metering module
//!
//! Turns classified events into normalized metering records:
//! - MeteringRecord: one start or stop measure for one instance
//! - Event::metering_records: 0-2 records per observed transition

pub mod builder;
pub mod record;

pub use record::{ConsumerInfo, InstancesMeasure, MeteringOptions, MeteringRecord, ServiceInfo};
