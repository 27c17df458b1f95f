//! Leitor analógico: média de amostras espaçadas no tempo
//!
//! O intervalo entre amostras deixa o front-end analógico assentar e
//! média o ruído da rede elétrica.

use crate::error::{OlfactoryError, OlfactoryResult};
use crate::types::SensorSample;
use dpp_core::CancellationToken;
use dpp_core::traits::{AnalogChannel, ChannelError};
use embedded_hal::delay::DelayNs;
use std::time::Duration;

/// Delay bloqueante baseado em `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Leitor de um canal analógico injetado
#[derive(Debug)]
pub struct AnalogReader<C, D = StdDelay> {
    channel: C,
    delay: D,
    cancel: Option<CancellationToken>,
    samples_taken: u64,
}

impl<C: AnalogChannel> AnalogReader<C, StdDelay> {
    /// Cria leitor com delay real
    pub fn new(channel: C) -> Self {
        Self::with_delay(channel, StdDelay)
    }
}

impl<C: AnalogChannel, D: DelayNs> AnalogReader<C, D> {
    /// Cria leitor com delay customizado
    pub fn with_delay(channel: C, delay: D) -> Self {
        Self {
            channel,
            delay,
            cancel: None,
            samples_taken: 0,
        }
    }

    /// Associa sinal de cancelamento (verificado antes de cada amostra)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Lê uma amostra instantânea
    pub fn sample(&mut self) -> OlfactoryResult<SensorSample> {
        let voltage = self.channel.read_voltage()?;
        if !voltage.is_finite() {
            return Err(ChannelError::InvalidReading(format!("non-finite voltage {voltage}")).into());
        }
        self.samples_taken += 1;
        tracing::trace!(voltage, "analog sample");
        Ok(SensorSample { voltage })
    }

    /// Média aritmética de `count` amostras, aguardando `interval` após cada uma.
    ///
    /// Bloqueia por aproximadamente `count * interval`.
    pub fn sample_average(&mut self, count: usize, interval: Duration) -> OlfactoryResult<f64> {
        if count == 0 {
            return Err(OlfactoryError::InvalidConfig(
                "Sample count must be at least 1".into(),
            ));
        }

        let mut sum = 0.0;
        for _ in 0..count {
            if self.is_cancelled() {
                return Err(OlfactoryError::Cancelled);
            }
            sum += self.sample()?.voltage;
            self.wait(interval);
        }

        let average = sum / count as f64;
        tracing::debug!(count, ?interval, average, "sampled average voltage");
        Ok(average)
    }

    /// Total de amostras lidas com sucesso
    pub fn samples_taken(&self) -> u64 {
        self.samples_taken
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn into_inner(self) -> C {
        self.channel
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn wait(&mut self, interval: Duration) {
        let mut remaining = interval.as_micros();
        while remaining > 0 {
            let step = remaining.min(u128::from(u32::MAX)) as u32;
            self.delay.delay_us(step);
            remaining -= u128::from(step);
        }
    }
}
