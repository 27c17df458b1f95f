//! Erros específicos do módulo olfativo

use dpp_core::traits::ChannelError;
use thiserror::Error;

pub type OlfactoryResult<T> = Result<T, OlfactoryError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OlfactoryError {
    /// Canal não pode ser lido (erro de barramento, dispositivo ausente)
    #[error("Hardware unavailable: {0}")]
    HardwareUnavailable(#[from] ChannelError),

    /// Medição tentada antes da calibração
    #[error("No calibration baseline: calibrate the sensor before measuring")]
    NoBaseline,

    #[error("Calibration failed: {0}")]
    CalibrationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sampling cancelled")]
    Cancelled,
}
