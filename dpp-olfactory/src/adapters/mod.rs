//! Adaptadores de canal analógico

pub mod ads1115;
pub mod iio;
pub mod simulated;

pub use ads1115::{Ads1115, Gain, InputChannel};
pub use iio::{DEFAULT_IIO_DEVICE, IioChannel};
pub use simulated::SimulatedChannel;
