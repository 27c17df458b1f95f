//! Modelo de resistência: inversão do divisor de tensão
//!
//! ```text
//!   Vcc ──[ Rs (sensor) ]──┬──[ RL ]── GND
//!                          │
//!                         Vout
//!
//!   Rs = RL · (Vcc − Vout) / Vout
//! ```

use crate::error::{OlfactoryError, OlfactoryResult};
use serde::{Deserialize, Serialize};

/// Piso de Vout antes da divisão (saturação, não erro)
pub const VOUT_FLOOR: f64 = 1e-6;

/// Tensão de alimentação padrão (3.3 V no Raspberry Pi)
pub const DEFAULT_VCC: f64 = 3.3;

/// Resistor de carga padrão dos módulos MQ (Ω)
pub const DEFAULT_LOAD_RESISTANCE: f64 = 10_000.0;

/// Resistência inferida do sensor a partir de Vout.
///
/// Vout abaixo de [`VOUT_FLOOR`] (incluindo zero) é saturado no piso,
/// retornando um valor grande porém finito.
pub fn resistance_from_voltage(vout: f64, vcc: f64, rl: f64) -> f64 {
    let v = vout.max(VOUT_FLOOR);
    rl * (vcc - v) / v
}

/// Constantes elétricas do divisor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerCircuit {
    /// Tensão de alimentação (V)
    pub vcc: f64,
    /// Resistor de carga RL (Ω)
    pub load_resistance: f64,
}

impl Default for DividerCircuit {
    fn default() -> Self {
        Self {
            vcc: DEFAULT_VCC,
            load_resistance: DEFAULT_LOAD_RESISTANCE,
        }
    }
}

impl DividerCircuit {
    pub fn new(vcc: f64, load_resistance: f64) -> OlfactoryResult<Self> {
        if !vcc.is_finite() || vcc <= 0.0 {
            return Err(OlfactoryError::InvalidConfig(format!(
                "Supply voltage must be positive, got {vcc}"
            )));
        }
        if !load_resistance.is_finite() || load_resistance <= 0.0 {
            return Err(OlfactoryError::InvalidConfig(format!(
                "Load resistance must be positive, got {load_resistance}"
            )));
        }
        Ok(Self { vcc, load_resistance })
    }

    /// Rs para a tensão medida
    pub fn resistance(&self, vout: f64) -> f64 {
        resistance_from_voltage(vout, self.vcc, self.load_resistance)
    }
}
