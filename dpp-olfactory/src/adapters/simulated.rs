//! Canal simulado (testes e execução sem hardware)

use dpp_core::traits::{AnalogChannel, ChannelError};
use std::collections::VecDeque;

/// Canal que devolve tensões roteirizadas e depois um valor fixo
#[derive(Debug, Clone, Default)]
pub struct SimulatedChannel {
    script: VecDeque<f64>,
    fallback: Option<f64>,
    present: bool,
    reads: u64,
}

impl SimulatedChannel {
    /// Tensão constante
    pub fn constant(voltage: f64) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: Some(voltage),
            present: true,
            reads: 0,
        }
    }

    /// Sequência de tensões; esgotada, usa `fallback` (ou falha se `None`)
    pub fn scripted(voltages: impl IntoIterator<Item = f64>, fallback: Option<f64>) -> Self {
        Self {
            script: voltages.into_iter().collect(),
            fallback,
            present: true,
            reads: 0,
        }
    }

    /// `calibration_samples` leituras em ar limpo seguidas da tensão de medição
    pub fn phased(calibration_voltage: f64, calibration_samples: usize, measurement_voltage: f64) -> Self {
        Self::scripted(
            std::iter::repeat_n(calibration_voltage, calibration_samples),
            Some(measurement_voltage),
        )
    }

    /// Dispositivo ausente: toda leitura falha
    pub fn absent() -> Self {
        Self::default()
    }

    /// Enfileira mais uma leitura
    pub fn push(&mut self, voltage: f64) {
        self.script.push_back(voltage);
    }

    /// Leituras atendidas (com ou sem sucesso)
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl AnalogChannel for SimulatedChannel {
    fn read_voltage(&mut self) -> Result<f64, ChannelError> {
        self.reads += 1;
        if !self.present {
            return Err(ChannelError::NotPresent("simulated channel is absent".into()));
        }
        self.script
            .pop_front()
            .or(self.fallback)
            .ok_or_else(|| ChannelError::Bus("simulated script exhausted".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_channel() {
        let mut channel = SimulatedChannel::constant(1.5);
        assert_eq!(channel.read_voltage().unwrap(), 1.5);
        assert_eq!(channel.read_voltage().unwrap(), 1.5);
        assert_eq!(channel.reads(), 2);
    }

    #[test]
    fn test_phased_channel() {
        let mut channel = SimulatedChannel::phased(1.5, 2, 1.0);
        assert_eq!(channel.read_voltage().unwrap(), 1.5);
        assert_eq!(channel.read_voltage().unwrap(), 1.5);
        assert_eq!(channel.read_voltage().unwrap(), 1.0);
    }

    #[test]
    fn test_script_exhausted() {
        let mut channel = SimulatedChannel::scripted([0.5], None);
        assert!(channel.read_voltage().is_ok());
        assert!(matches!(channel.read_voltage(), Err(ChannelError::Bus(_))));
    }

    #[test]
    fn test_absent_channel() {
        let mut channel = SimulatedChannel::absent();
        assert!(matches!(channel.read_voltage(), Err(ChannelError::NotPresent(_))));
    }
}
