//! Sensor de gás MQ com baseline de sessão

use crate::calibration::{CalibrationConfig, calibrate};
use crate::error::{OlfactoryError, OlfactoryResult};
use crate::measurement::{MeasurementConfig, measure};
use crate::reader::{AnalogReader, StdDelay};
use crate::resistance::{DEFAULT_LOAD_RESISTANCE, DEFAULT_VCC, DividerCircuit};
use crate::types::{CalibrationBaseline, Measurement, MeasurementLabels};
use dpp_core::traits::{AnalogChannel, DppComponent};
use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

/// Configuração do sensor de gás
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasSensorConfig {
    /// Tensão de alimentação (V)
    pub vcc: f64,
    /// Resistor de carga (Ω)
    pub load_resistance: f64,
    pub calibration: CalibrationConfig,
    pub measurement: MeasurementConfig,
}

impl Default for GasSensorConfig {
    fn default() -> Self {
        Self {
            vcc: DEFAULT_VCC,
            load_resistance: DEFAULT_LOAD_RESISTANCE,
            calibration: CalibrationConfig::default(),
            measurement: MeasurementConfig::default(),
        }
    }
}

impl GasSensorConfig {
    fn validate(&self) -> OlfactoryResult<DividerCircuit> {
        if self.calibration.sample_count == 0 {
            return Err(OlfactoryError::InvalidConfig(
                "Calibration sample count must be at least 1".into(),
            ));
        }
        if self.measurement.sample_count == 0 {
            return Err(OlfactoryError::InvalidConfig(
                "Measurement sample count must be at least 1".into(),
            ));
        }
        DividerCircuit::new(self.vcc, self.load_resistance)
    }
}

/// Sensor de gás (divisor de tensão + canal analógico).
///
/// O baseline pertence à sessão dona deste valor. Recalibrar substitui o
/// baseline; medições já construídas mantêm a razão calculada com o R0 antigo.
#[derive(Debug)]
pub struct GasSensor<C, D = StdDelay> {
    reader: AnalogReader<C, D>,
    circuit: DividerCircuit,
    config: GasSensorConfig,
    baseline: Option<CalibrationBaseline>,
    measurement_count: u64,
}

impl<C: AnalogChannel> GasSensor<C, StdDelay> {
    /// Cria sensor com configuração padrão
    pub fn new(channel: C) -> OlfactoryResult<Self> {
        Self::with_config(channel, GasSensorConfig::default())
    }

    /// Cria sensor com configuração específica
    pub fn with_config(channel: C, config: GasSensorConfig) -> OlfactoryResult<Self> {
        Self::with_reader(AnalogReader::new(channel), config)
    }
}

impl<C: AnalogChannel, D: DelayNs> GasSensor<C, D> {
    /// Cria sensor a partir de um leitor já montado (delay/cancelamento customizados)
    pub fn with_reader(reader: AnalogReader<C, D>, config: GasSensorConfig) -> OlfactoryResult<Self> {
        let circuit = config.validate()?;
        Ok(Self {
            reader,
            circuit,
            config,
            baseline: None,
            measurement_count: 0,
        })
    }

    /// Calibra em ar limpo e substitui o baseline da sessão
    pub fn calibrate(&mut self) -> OlfactoryResult<CalibrationBaseline> {
        if self.baseline.is_some() {
            tracing::info!("recalibrating: previous baseline will be replaced");
        }
        let baseline = calibrate(&mut self.reader, &self.circuit, &self.config.calibration)?;
        self.baseline = Some(baseline);
        Ok(baseline)
    }

    /// Mede contra o baseline atual
    pub fn measure(&mut self, labels: &MeasurementLabels) -> OlfactoryResult<Measurement> {
        let measurement = measure(
            &mut self.reader,
            &self.circuit,
            self.baseline.as_ref(),
            labels,
            &self.config.measurement,
        )?;
        self.measurement_count += 1;
        Ok(measurement)
    }

    pub fn baseline(&self) -> Option<&CalibrationBaseline> {
        self.baseline.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn circuit(&self) -> &DividerCircuit {
        &self.circuit
    }

    pub fn config(&self) -> &GasSensorConfig {
        &self.config
    }

    pub fn reader(&self) -> &AnalogReader<C, D> {
        &self.reader
    }

    /// Medições concluídas nesta sessão
    pub fn measurement_count(&self) -> u64 {
        self.measurement_count
    }
}

impl<C: AnalogChannel, D: DelayNs + std::fmt::Debug> DppComponent for GasSensor<C, D> {
    fn name(&self) -> &str {
        "GasSensor"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn is_ready(&self) -> bool {
        self.is_calibrated()
    }
}
