//! # DPP-Anchor — Integridade de Registros
//!
//! Digest SHA-256 dos bytes exatos de um registro canônico, ancorado como
//! payload de uma transação zero-valor de uma conta controlada para ela mesma.
//!
//! ```text
//! ┌──────────┐  sha256   ┌────────┐  send + wait  ┌────────┐
//! │  Record  │ ────────▶ │ Digest │ ────────────▶ │ Ledger │
//! └──────────┘           └────────┘               └────────┘
//!       ▲                                              │
//!       └──────────── verify (read-back) ◀─────────────┘
//! ```
//!
//! ## Ledgers
//!
//! - [`MemoryLedger`]: cadeia local determinística (testes, modo offline)
//! - `JsonRpcLedger`: nó Ethereum JSON-RPC (feature `rpc`)

pub mod anchor;
pub mod digest;
pub mod error;
pub mod ledger;
pub mod receipt;

pub use anchor::{AnchorConfig, DEFAULT_CONFIRMATION_TIMEOUT, IntegrityAnchor, Verification};
pub use digest::Digest;
pub use error::{AnchorError, AnchorResult};
pub use ledger::{MemoryLedger, MemoryLedgerConfig};
#[cfg(feature = "rpc")]
pub use ledger::{DEFAULT_RPC_URL, JsonRpcLedger};
pub use receipt::AnchorReceipt;

pub use dpp_core::prelude::*;

#[cfg(test)]
mod tests;
