//! Emission data passport pipeline
//!
//! Configuration loading, the sequential [`Session`] and the standalone
//! anchor/verify/digest operations behind the `dpp` binary.

pub mod config;
pub mod error;
pub mod session;

pub use config::{ChannelKind, LedgerKind, SessionConfig};
pub use error::{ConfigError, ConfigResult, SessionError, SessionResult, exit};
pub use session::{Session, SessionReport, anchor_record, digest_record, verify_record};
