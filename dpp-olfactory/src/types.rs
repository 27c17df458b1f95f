//! Tipos de dados olfativos

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Formato do timestamp (UTC, precisão de segundos)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Instante atual em UTC truncado para segundos inteiros
pub fn utc_now_seconds() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Leitura instantânea do canal (volts)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub voltage: f64,
}

/// Resistência de referência em ar limpo (R0)
///
/// Vale apenas para a sessão que a capturou; nunca é persistida.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBaseline {
    /// R0 em ohms
    pub r0: f64,
    /// Tensão média usada na calibração
    pub voltage: f64,
    pub captured_at: DateTime<Utc>,
}

/// Rótulos de identidade e contexto da medição
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementLabels {
    pub device_id: String,
    pub gas_type: String,
    pub location: String,
}

impl Default for MeasurementLabels {
    fn default() -> Self {
        Self {
            device_id: "MQ_01".into(),
            gas_type: "CO2".into(),
            location: "Warehouse_A".into(),
        }
    }
}

impl MeasurementLabels {
    pub fn new(
        device_id: impl Into<String>,
        gas_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            gas_type: gas_type.into(),
            location: location.into(),
        }
    }
}

/// Medição calibrada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub device_id: String,
    /// UTC, segundos inteiros
    pub timestamp: DateTime<Utc>,
    pub gas_type: String,
    pub location: String,
    /// Vout médio (V)
    pub voltage: f64,
    /// Rs (Ω)
    pub resistance: f64,
    /// Rs / R0 (adimensional)
    pub ratio: f64,
}

impl Measurement {
    /// Timestamp no formato `YYYY-MM-DDThh:mm:ssZ`
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
