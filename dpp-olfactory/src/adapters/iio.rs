//! Canal Linux IIO (sysfs)
//!
//! O driver `ti-ads1015` do kernel expõe o ADS1115 como dispositivo IIO:
//! `in_voltageN_raw * in_voltageN_scale` = milivolts.

use dpp_core::traits::{AnalogChannel, ChannelError};
use std::io;
use std::path::{Path, PathBuf};

/// Diretório padrão do primeiro dispositivo IIO
pub const DEFAULT_IIO_DEVICE: &str = "/sys/bus/iio/devices/iio:device0";

#[derive(Debug, Clone)]
pub struct IioChannel {
    device_dir: PathBuf,
    channel: u8,
}

impl IioChannel {
    pub fn new(device_dir: impl Into<PathBuf>, channel: u8) -> Self {
        Self {
            device_dir: device_dir.into(),
            channel,
        }
    }

    pub fn raw_path(&self) -> PathBuf {
        self.device_dir.join(format!("in_voltage{}_raw", self.channel))
    }

    /// Escala do canal, ou a escala compartilhada `in_voltage_scale`
    fn scale_path(&self) -> PathBuf {
        let specific = self.device_dir.join(format!("in_voltage{}_scale", self.channel));
        if specific.exists() {
            specific
        } else {
            self.device_dir.join("in_voltage_scale")
        }
    }

    fn read_attr<T: std::str::FromStr>(&self, path: &Path) -> Result<T, ChannelError> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        text.trim().parse().map_err(|_| {
            ChannelError::InvalidReading(format!("{}: unparsable value {:?}", path.display(), text.trim()))
        })
    }
}

impl AnalogChannel for IioChannel {
    fn read_voltage(&mut self) -> Result<f64, ChannelError> {
        let raw: i64 = self.read_attr(&self.raw_path())?;
        let scale_mv: f64 = self.read_attr(&self.scale_path())?;
        Ok(raw as f64 * scale_mv / 1000.0)
    }
}

fn io_error(path: &Path, err: io::Error) -> ChannelError {
    match err.kind() {
        io::ErrorKind::NotFound => ChannelError::NotPresent(path.display().to_string()),
        _ => ChannelError::Bus(format!("{}: {err}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_scaled_voltage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("in_voltage1_raw"), "750\n").unwrap();
        fs::write(dir.path().join("in_voltage1_scale"), "2.000\n").unwrap();

        let mut channel = IioChannel::new(dir.path(), 1);
        assert_eq!(channel.read_voltage().unwrap(), 1.5);
    }

    #[test]
    fn test_falls_back_to_shared_scale() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("in_voltage0_raw"), "500").unwrap();
        fs::write(dir.path().join("in_voltage_scale"), "2").unwrap();

        let mut channel = IioChannel::new(dir.path(), 0);
        assert_eq!(channel.read_voltage().unwrap(), 1.0);
    }

    #[test]
    fn test_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let mut channel = IioChannel::new(dir.path().join("iio:device9"), 1);
        assert!(matches!(channel.read_voltage(), Err(ChannelError::NotPresent(_))));
    }

    #[test]
    fn test_garbage_value() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("in_voltage1_raw"), "abc").unwrap();
        fs::write(dir.path().join("in_voltage1_scale"), "1").unwrap();

        let mut channel = IioChannel::new(dir.path(), 1);
        assert!(matches!(channel.read_voltage(), Err(ChannelError::InvalidReading(_))));
    }
}
