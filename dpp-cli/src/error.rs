//! Session errors and exit codes

use dpp_anchor::{AnchorError, AnchorReceipt, Digest, Verification};
use dpp_olfactory::OlfactoryError;
use dpp_record::RecordError;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SessionResult<T> = Result<T, SessionError>;

/// Process exit status per failing stage
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const HARDWARE: i32 = 3;
    pub const CALIBRATION: i32 = 4;
    pub const STORAGE: i32 = 5;
    pub const LEDGER: i32 = 6;
    pub const VERIFICATION: i32 = 7;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Sensor error: {0}")]
    Sensor(#[from] OlfactoryError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Anchoring failed after the record was persisted
    #[error("Anchoring failed ({source}); record kept at {} with digest {digest}", .record_path.display())]
    Anchor {
        #[source]
        source: AnchorError,
        record_path: PathBuf,
        digest: Digest,
    },

    #[error("Ledger error: {0}")]
    Ledger(#[from] AnchorError),

    /// Anchor confirmed but the sidecar could not be written
    #[error(
        "Anchored as {} at block {} but failed to store receipt at {}: {source}",
        .receipt.transaction_id,
        .receipt.sequence_number,
        .path.display()
    )]
    ReceiptNotStored {
        path: PathBuf,
        #[source]
        source: AnchorError,
        receipt: Box<AnchorReceipt>,
    },

    #[error("Failed to read receipt at {}: {source}", .path.display())]
    Receipt {
        path: PathBuf,
        #[source]
        source: AnchorError,
    },

    #[error("Verification failed: {0}")]
    Verification(Verification),
}

impl SessionError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit::CONFIG,
            Self::Sensor(OlfactoryError::HardwareUnavailable(_)) => exit::HARDWARE,
            Self::Sensor(OlfactoryError::InvalidConfig(_)) => exit::CONFIG,
            Self::Sensor(OlfactoryError::Cancelled) => exit::CANCELLED,
            Self::Sensor(_) => exit::CALIBRATION,
            Self::Record(_) | Self::Receipt { .. } | Self::ReceiptNotStored { .. } => exit::STORAGE,
            Self::Anchor { source: AnchorError::Cancelled { .. }, .. }
            | Self::Ledger(AnchorError::Cancelled { .. }) => exit::CANCELLED,
            Self::Ledger(AnchorError::Receipt(_) | AnchorError::Io(_)) => exit::STORAGE,
            Self::Anchor { .. } | Self::Ledger(_) => exit::LEDGER,
            Self::Verification(_) => exit::VERIFICATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpp_core::ChannelError;

    #[test]
    fn test_exit_codes_per_stage() {
        let hw = SessionError::Sensor(OlfactoryError::HardwareUnavailable(ChannelError::NotPresent("adc".into())));
        assert_eq!(hw.exit_code(), 3);
        assert_eq!(SessionError::Sensor(OlfactoryError::NoBaseline).exit_code(), 4);
        assert_eq!(SessionError::Sensor(OlfactoryError::Cancelled).exit_code(), 130);
        assert_eq!(SessionError::Config(ConfigError::Invalid("x".into())).exit_code(), 2);
        assert_eq!(
            SessionError::Record(RecordError::Serialization("x".into())).exit_code(),
            5
        );
        assert_eq!(
            SessionError::Ledger(AnchorError::LedgerUnavailable("x".into())).exit_code(),
            6
        );
        assert_eq!(SessionError::Verification(Verification::NotFound).exit_code(), 7);
    }

    #[test]
    fn test_anchor_failure_keeps_record_location() {
        let err = SessionError::Anchor {
            source: AnchorError::SubmissionRejected("insufficient funds".into()),
            record_path: PathBuf::from("/tmp/emission_20250101T120000Z.xml"),
            digest: Digest::of(b""),
        };
        let message = err.to_string();
        assert!(message.contains("emission_20250101T120000Z.xml"));
        assert!(message.contains("e3b0c442"));
        assert_eq!(err.exit_code(), 6);
    }
}
