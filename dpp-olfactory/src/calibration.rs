//! Calibração em ar limpo (R0)

use crate::error::{OlfactoryError, OlfactoryResult};
use crate::reader::AnalogReader;
use crate::resistance::DividerCircuit;
use crate::types::{CalibrationBaseline, utc_now_seconds};
use dpp_core::traits::AnalogChannel;
use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Janela de amostragem da calibração (maior que a da medição)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub sample_count: usize,
    pub interval: Duration,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sample_count: 25,
            interval: Duration::from_millis(200), // ~5 segundos no total
        }
    }
}

/// Captura a resistência de referência R0.
///
/// Falha com `CalibrationFailed` se R0 não for positivo e finito
/// (tensão de ar limpo igual ou acima de Vcc).
pub fn calibrate<C, D>(
    reader: &mut AnalogReader<C, D>,
    circuit: &DividerCircuit,
    config: &CalibrationConfig,
) -> OlfactoryResult<CalibrationBaseline>
where
    C: AnalogChannel,
    D: DelayNs,
{
    let voltage = reader.sample_average(config.sample_count, config.interval)?;
    let r0 = circuit.resistance(voltage);

    if !r0.is_finite() || r0 <= 0.0 {
        return Err(OlfactoryError::CalibrationFailed(format!(
            "Clean-air voltage {voltage:.3} V gives non-positive R0 {r0:.1} Ω (Vcc {:.3} V)",
            circuit.vcc
        )));
    }

    let baseline = CalibrationBaseline {
        r0,
        voltage,
        captured_at: utc_now_seconds(),
    };
    tracing::info!(voltage, r0, "calibration baseline captured");
    Ok(baseline)
}
