//! Medição calibrada (Rs/R0)
//!
//! A razão é um proxy adimensional de concentração. A conversão para ppm
//! depende da curva do modelo do sensor e fica fora deste crate.

use crate::error::{OlfactoryError, OlfactoryResult};
use crate::reader::AnalogReader;
use crate::resistance::DividerCircuit;
use crate::types::{CalibrationBaseline, Measurement, MeasurementLabels, utc_now_seconds};
use dpp_core::traits::AnalogChannel;
use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Janela de amostragem da medição
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    pub sample_count: usize,
    pub interval: Duration,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            sample_count: 10,
            interval: Duration::from_millis(100),
        }
    }
}

/// Mede Vout, infere Rs e calcula Rs/R0 contra o baseline da sessão.
///
/// Sem baseline retorna `NoBaseline` sem tocar no canal.
pub fn measure<C, D>(
    reader: &mut AnalogReader<C, D>,
    circuit: &DividerCircuit,
    baseline: Option<&CalibrationBaseline>,
    labels: &MeasurementLabels,
    config: &MeasurementConfig,
) -> OlfactoryResult<Measurement>
where
    C: AnalogChannel,
    D: DelayNs,
{
    let baseline = baseline.ok_or(OlfactoryError::NoBaseline)?;

    let voltage = reader.sample_average(config.sample_count, config.interval)?;
    let resistance = circuit.resistance(voltage);
    let ratio = resistance / baseline.r0;

    tracing::info!(voltage, resistance, ratio, device = %labels.device_id, "measurement taken");

    Ok(Measurement {
        device_id: labels.device_id.clone(),
        timestamp: utc_now_seconds(),
        gas_type: labels.gas_type.clone(),
        location: labels.location.clone(),
        voltage,
        resistance,
        ratio,
    })
}
