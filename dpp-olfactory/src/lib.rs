//! # dpp-olfactory — Percepção Olfativa Calibrada
//!
//! Sensor de gás da família MQ lido por um ADC, convertido em resistência
//! pelo divisor de tensão e normalizado contra o baseline de ar limpo.
//!
//! ```text
//! AnalogChannel ─▶ AnalogReader (média) ─▶ DividerCircuit (Rs)
//!                                              │
//!                 calibrate() ──▶ R0 ──────────┤
//!                 measure()   ──▶ Rs/R0 ◀──────┘
//! ```
//!
//! ## Exemplo
//!
//! ```ignore
//! use dpp_olfactory::{GasSensor, MeasurementLabels, SimulatedChannel};
//!
//! let mut sensor = GasSensor::new(SimulatedChannel::constant(1.5))?;
//! sensor.calibrate()?;
//! let m = sensor.measure(&MeasurementLabels::default())?;
//! ```

pub mod adapters;
pub mod calibration;
pub mod error;
pub mod gas_sensor;
pub mod measurement;
pub mod reader;
pub mod resistance;
pub mod types;

pub use adapters::{Ads1115, IioChannel, SimulatedChannel};
pub use calibration::{CalibrationConfig, calibrate};
pub use error::{OlfactoryError, OlfactoryResult};
pub use gas_sensor::{GasSensor, GasSensorConfig};
pub use measurement::{MeasurementConfig, measure};
pub use reader::{AnalogReader, StdDelay};
pub use resistance::{DividerCircuit, VOUT_FLOOR, resistance_from_voltage};
pub use types::{
    CalibrationBaseline, Measurement, MeasurementLabels, SensorSample, TIMESTAMP_FORMAT,
    utc_now_seconds,
};

pub use dpp_core::prelude::*;
pub use embedded_hal::delay::DelayNs;
