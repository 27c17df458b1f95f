//! ADS1115 — ADC de 16 bits via I²C (conversão single-shot)
//!
//! | Registro | Endereço |
//! |:---------|:---------|
//! | Conversion | 0x00 |
//! | Config | 0x01 |

use dpp_core::traits::{AnalogChannel, ChannelError};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};

/// Endereço padrão (ADDR em GND)
pub const DEFAULT_ADDRESS: u8 = 0x48;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const OS_START: u16 = 1 << 15;
const MODE_SINGLE_SHOT: u16 = 1 << 8;
const DATA_RATE_128SPS: u16 = 0b100 << 5;
const COMPARATOR_DISABLED: u16 = 0b11;

/// Tentativas de polling (1 ms cada) antes de desistir da conversão
const MAX_POLLS: u32 = 20;

/// Entrada single-ended (AINx contra GND)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    A0,
    A1,
    A2,
    A3,
}

impl InputChannel {
    fn mux_bits(self) -> u16 {
        let mux = match self {
            InputChannel::A0 => 0b100,
            InputChannel::A1 => 0b101,
            InputChannel::A2 => 0b110,
            InputChannel::A3 => 0b111,
        };
        mux << 12
    }
}

/// Ganho do amplificador (fundo de escala)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gain {
    /// ±6.144 V
    TwoThirds,
    /// ±4.096 V
    #[default]
    One,
    /// ±2.048 V
    Two,
    /// ±1.024 V
    Four,
    /// ±0.512 V
    Eight,
    /// ±0.256 V
    Sixteen,
}

impl Gain {
    fn pga_bits(self) -> u16 {
        let pga = match self {
            Gain::TwoThirds => 0b000,
            Gain::One => 0b001,
            Gain::Two => 0b010,
            Gain::Four => 0b011,
            Gain::Eight => 0b100,
            Gain::Sixteen => 0b101,
        };
        pga << 9
    }

    /// Fundo de escala em volts
    pub fn full_scale(self) -> f64 {
        match self {
            Gain::TwoThirds => 6.144,
            Gain::One => 4.096,
            Gain::Two => 2.048,
            Gain::Four => 1.024,
            Gain::Eight => 0.512,
            Gain::Sixteen => 0.256,
        }
    }
}

/// Driver ADS1115 sobre qualquer barramento `embedded-hal`
#[derive(Debug)]
pub struct Ads1115<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    input: InputChannel,
    gain: Gain,
}

impl<I2C: I2c, D: DelayNs> Ads1115<I2C, D> {
    /// Driver no endereço padrão, entrada AIN1, ganho 1
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: DEFAULT_ADDRESS,
            input: InputChannel::A1,
            gain: Gain::default(),
        }
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_input(mut self, input: InputChannel) -> Self {
        self.input = input;
        self
    }

    pub fn with_gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    /// Palavra de configuração para uma conversão single-shot
    pub fn config_word(&self) -> u16 {
        OS_START
            | self.input.mux_bits()
            | self.gain.pga_bits()
            | MODE_SINGLE_SHOT
            | DATA_RATE_128SPS
            | COMPARATOR_DISABLED
    }

    /// Executa uma conversão e retorna o valor bruto com sinal
    pub fn read_raw(&mut self) -> Result<i16, ChannelError> {
        let [hi, lo] = self.config_word().to_be_bytes();
        self.i2c
            .write(self.address, &[REG_CONFIG, hi, lo])
            .map_err(|e| bus_error("config write", e.kind()))?;

        let mut polls = 0;
        loop {
            let config = self.read_register(REG_CONFIG)?;
            if config & OS_START != 0 {
                break;
            }
            polls += 1;
            if polls >= MAX_POLLS {
                return Err(ChannelError::Timeout(u64::from(MAX_POLLS)));
            }
            self.delay.delay_ms(1);
        }

        Ok(self.read_register(REG_CONVERSION)? as i16)
    }

    /// Devolve o barramento
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, register: u8) -> Result<u16, ChannelError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| bus_error("register read", e.kind()))?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<I2C, D> AnalogChannel for Ads1115<I2C, D>
where
    I2C: I2c + std::fmt::Debug,
    D: DelayNs + std::fmt::Debug,
{
    fn read_voltage(&mut self) -> Result<f64, ChannelError> {
        let raw = self.read_raw()?;
        Ok(f64::from(raw) * self.gain.full_scale() / 32768.0)
    }
}

fn bus_error(stage: &str, kind: embedded_hal::i2c::ErrorKind) -> ChannelError {
    match kind {
        embedded_hal::i2c::ErrorKind::NoAcknowledge(_) => {
            ChannelError::NotPresent(format!("ADS1115 did not acknowledge ({stage})"))
        }
        other => ChannelError::Bus(format!("{stage}: {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug, Default)]
    struct MockBus {
        config: u16,
        conversion: u16,
        pointer: u8,
        writes: Vec<Vec<u8>>,
        busy_polls: u32,
        absent: bool,
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if self.absent || address != DEFAULT_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        self.writes.push(bytes.to_vec());
                        self.pointer = bytes[0];
                        if bytes.len() == 3 && bytes[0] == REG_CONFIG {
                            // conversão iniciada: OS=0 até terminar
                            self.config = u16::from_be_bytes([bytes[1], bytes[2]]) & !OS_START;
                        }
                    }
                    Operation::Read(buf) => {
                        let value = if self.pointer == REG_CONFIG {
                            if self.busy_polls > 0 {
                                self.busy_polls -= 1;
                                self.config
                            } else {
                                self.config | OS_START
                            }
                        } else {
                            self.conversion
                        };
                        buf.copy_from_slice(&value.to_be_bytes());
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct CountingDelay {
        ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.ms += ms;
        }
    }

    #[test]
    fn test_config_word_for_ain1_gain_one() {
        let adc = Ads1115::new(MockBus::default(), CountingDelay::default());
        assert_eq!(adc.config_word(), 0xD383);
    }

    #[test]
    fn test_read_voltage_scales_raw_value() {
        let bus = MockBus {
            conversion: 12000, // 12000 * 4.096 / 32768 = 1.5 V
            busy_polls: 3,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus, CountingDelay::default());

        let voltage = adc.read_voltage().unwrap();
        assert_eq!(voltage, 1.5);
        assert_eq!(adc.delay.ms, 3);

        let bus = adc.release();
        assert_eq!(bus.writes[0], vec![REG_CONFIG, 0xD3, 0x83]);
    }

    #[test]
    fn test_negative_reading() {
        let bus = MockBus {
            conversion: (-8192i16) as u16,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus, CountingDelay::default());
        assert_eq!(adc.read_voltage().unwrap(), -1.024);
    }

    #[test]
    fn test_conversion_timeout() {
        let bus = MockBus {
            busy_polls: u32::MAX,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus, CountingDelay::default());
        assert_eq!(adc.read_voltage(), Err(ChannelError::Timeout(20)));
    }

    #[test]
    fn test_absent_device() {
        let bus = MockBus {
            absent: true,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus, CountingDelay::default());
        assert!(matches!(adc.read_voltage(), Err(ChannelError::NotPresent(_))));
    }

    #[test]
    fn test_input_and_gain_selection() {
        let adc = Ads1115::new(MockBus::default(), CountingDelay::default())
            .with_input(InputChannel::A0)
            .with_gain(Gain::Two);
        // OS | MUX=100 | PGA=010 | MODE | DR=100 | COMP=11
        assert_eq!(adc.config_word(), 0x8000 | 0x4000 | 0x0400 | 0x0100 | 0x0080 | 0x0003);
    }
}
