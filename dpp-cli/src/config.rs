//! Session configuration (`dpp.toml`)
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration matching the reference wiring: MQ sensor on a 3.3 V divider
//! with a 10 kΩ load, 25 × 200 ms calibration, 10 × 100 ms measurement.

use crate::error::{ConfigError, ConfigResult};
use dpp_anchor::{AnchorConfig, DEFAULT_CONFIRMATION_TIMEOUT, MemoryLedger, MemoryLedgerConfig};
use dpp_core::{Address, AnalogChannel, Ledger};
use dpp_olfactory::adapters::DEFAULT_IIO_DEVICE;
use dpp_olfactory::{
    CalibrationConfig, GasSensorConfig, IioChannel, MeasurementConfig, MeasurementLabels,
    SimulatedChannel,
};
use dpp_record::{RecordResult, RecordStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default JSON-RPC endpoint (local development chain)
pub const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub sensor: SensorSection,
    pub device: DeviceSection,
    pub calibration: CalibrationSection,
    pub measurement: MeasurementSection,
    pub channel: ChannelSection,
    pub ledger: LedgerSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSection {
    pub vcc: f64,
    pub load_resistance: f64,
}

impl Default for SensorSection {
    fn default() -> Self {
        let defaults = GasSensorConfig::default();
        Self {
            vcc: defaults.vcc,
            load_resistance: defaults.load_resistance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSection {
    pub id: String,
    pub location: String,
    pub gas_type: String,
}

impl Default for DeviceSection {
    fn default() -> Self {
        let labels = MeasurementLabels::default();
        Self {
            id: labels.device_id,
            location: labels.location,
            gas_type: labels.gas_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSection {
    pub sample_count: usize,
    pub interval_ms: u64,
}

impl Default for CalibrationSection {
    fn default() -> Self {
        Self {
            sample_count: 25,
            interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSection {
    pub sample_count: usize,
    pub interval_ms: u64,
}

impl Default for MeasurementSection {
    fn default() -> Self {
        Self {
            sample_count: 10,
            interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Scripted voltages: calibration phase, then measurement phase
    #[default]
    Simulated,
    /// Linux IIO sysfs ADC
    Iio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSection {
    pub kind: ChannelKind,
    pub calibration_voltage: f64,
    pub measurement_voltage: f64,
    pub iio_device: PathBuf,
    pub iio_channel: u8,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            kind: ChannelKind::Simulated,
            calibration_voltage: 1.5,
            measurement_voltage: 1.0,
            iio_device: PathBuf::from(DEFAULT_IIO_DEVICE),
            iio_channel: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// In-process chain, lives for one invocation
    #[default]
    Memory,
    /// Ethereum JSON-RPC node (requires the `rpc` feature)
    Rpc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub kind: LedgerKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub confirmation_timeout_ms: u64,
    /// Memory ledger only
    pub finality_delay_ms: u64,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            kind: LedgerKind::Memory,
            url: DEFAULT_LEDGER_URL.to_string(),
            account: None,
            confirmation_timeout_ms: DEFAULT_CONFIRMATION_TIMEOUT.as_millis() as u64,
            finality_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Defaults to `~/dpp_samples`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl SessionConfig {
    /// Parse and validate TOML text
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// File if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        };
        positive("sensor.vcc", self.sensor.vcc)?;
        positive("sensor.load_resistance", self.sensor.load_resistance)?;

        if self.calibration.sample_count == 0 {
            return Err(ConfigError::Invalid("calibration.sample_count must be at least 1".into()));
        }
        if self.measurement.sample_count == 0 {
            return Err(ConfigError::Invalid("measurement.sample_count must be at least 1".into()));
        }
        if self.ledger.confirmation_timeout_ms == 0 {
            return Err(ConfigError::Invalid("ledger.confirmation_timeout_ms must be positive".into()));
        }
        for (name, value) in [
            ("device.id", &self.device.id),
            ("device.location", &self.device.location),
            ("device.gas_type", &self.device.gas_type),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn gas_sensor_config(&self) -> GasSensorConfig {
        GasSensorConfig {
            vcc: self.sensor.vcc,
            load_resistance: self.sensor.load_resistance,
            calibration: CalibrationConfig {
                sample_count: self.calibration.sample_count,
                interval: Duration::from_millis(self.calibration.interval_ms),
            },
            measurement: MeasurementConfig {
                sample_count: self.measurement.sample_count,
                interval: Duration::from_millis(self.measurement.interval_ms),
            },
        }
    }

    pub fn labels(&self) -> MeasurementLabels {
        MeasurementLabels::new(&self.device.id, &self.device.gas_type, &self.device.location)
    }

    pub fn anchor_config(&self) -> AnchorConfig {
        AnchorConfig {
            confirmation_timeout: Duration::from_millis(self.ledger.confirmation_timeout_ms),
            account: self.ledger.account.clone().map(Address),
        }
    }

    pub fn record_store(&self) -> RecordResult<RecordStore> {
        match &self.storage.dir {
            Some(dir) => Ok(RecordStore::new(dir)),
            None => RecordStore::default_location(),
        }
    }

    /// Analog channel selected by `[channel]`
    pub fn build_channel(&self) -> Box<dyn AnalogChannel> {
        match self.channel.kind {
            ChannelKind::Simulated => Box::new(SimulatedChannel::phased(
                self.channel.calibration_voltage,
                self.calibration.sample_count,
                self.channel.measurement_voltage,
            )),
            ChannelKind::Iio => Box::new(IioChannel::new(&self.channel.iio_device, self.channel.iio_channel)),
        }
    }

    /// Ledger selected by `[ledger]`
    pub fn build_ledger(&self) -> ConfigResult<Box<dyn Ledger>> {
        match self.ledger.kind {
            LedgerKind::Memory => Ok(Box::new(MemoryLedger::with_config(MemoryLedgerConfig {
                finality_delay: Duration::from_millis(self.ledger.finality_delay_ms),
                ..Default::default()
            }))),
            #[cfg(feature = "rpc")]
            LedgerKind::Rpc => Ok(Box::new(dpp_anchor::JsonRpcLedger::new(&self.ledger.url))),
            #[cfg(not(feature = "rpc"))]
            LedgerKind::Rpc => Err(ConfigError::Invalid(
                "ledger.kind = \"rpc\" requires building with the `rpc` feature".into(),
            )),
        }
    }

    /// Command-line overrides for the device labels
    pub fn apply_overrides(
        &mut self,
        device_id: Option<String>,
        location: Option<String>,
        gas_type: Option<String>,
        storage_dir: Option<PathBuf>,
    ) -> ConfigResult<()> {
        if let Some(id) = device_id {
            self.device.id = id;
        }
        if let Some(location) = location {
            self.device.location = location;
        }
        if let Some(gas_type) = gas_type {
            self.device.gas_type = gas_type;
        }
        if let Some(dir) = storage_dir {
            self.storage.dir = Some(dir);
        }
        self.validate()
    }
}
