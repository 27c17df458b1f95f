//! # DPP-Core — Capacidades do Passaporte de Emissões
//!
//! Traits e tipos compartilhados pelos crates do pipeline:
//!
//! ```text
//! AnalogChannel ─▶ dpp-olfactory (calibração, medição)
//!                        │
//!                        ▼
//!                  dpp-record (registro canônico)
//!                        │
//!                        ▼
//! Ledger ────────▶ dpp-anchor (digest, ancoragem, verificação)
//! ```

pub mod cancel;
pub mod prelude;
pub mod traits;

pub use cancel::CancellationToken;
pub use traits::{
    Address, AnalogChannel, ChannelError, DppComponent, Ledger, LedgerError,
    LedgerReceipt, LedgerTransaction, TransactionId, TransactionRequest,
};
