//! Canonical emission records
//!
//! Serializes a calibrated [`Measurement`](dpp_olfactory::Measurement) into the
//! tag-delimited layout that is hashed and anchored, and stores it write-once:
//!
//! ```text
//! <EmissionData>
//!   <DeviceID>MQ_01</DeviceID>
//!   <Timestamp>2025-01-01T12:00:00Z</Timestamp>
//!   <GasType>CO2</GasType>
//!   <Voltage unit="V">1.000</Voltage>
//!   <SensorResistance unit="ohm">23000.0</SensorResistance>
//!   <RsOverR0>1.917</RsOverR0>
//!   <Location>Warehouse_A</Location>
//! </EmissionData>
//! ```

pub mod error;
mod printer;
pub mod record;
pub mod storage;

pub use error::{RecordError, RecordResult};
pub use record::{Record, build_record, escape};
pub use storage::{DEFAULT_DIR_NAME, RecordStore};

/// Check whether `record` is exactly the canonical serialization of `measurement`
pub fn is_canonical(record: &Record, measurement: &dpp_olfactory::Measurement) -> RecordResult<bool> {
    Ok(build_record(measurement)?.as_bytes() == record.as_bytes())
}
