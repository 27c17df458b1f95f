//! Implementações de [`Ledger`](dpp_core::Ledger)

pub mod memory;
#[cfg(feature = "rpc")]
pub mod rpc;

pub use memory::{MemoryLedger, MemoryLedgerConfig};
#[cfg(feature = "rpc")]
pub use rpc::{DEFAULT_RPC_URL, JsonRpcLedger};
