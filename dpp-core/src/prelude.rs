//! # Prelude — Re-exportações Convenientes
//!
//! ```
//! use dpp_core::prelude::*;
//! ```

pub use crate::cancel::CancellationToken;
pub use crate::traits::{
    // Base
    DppComponent,
    // Percepção
    AnalogChannel,
    ChannelError,
    // Ledger
    Address,
    Ledger,
    LedgerError,
    LedgerReceipt,
    LedgerTransaction,
    TransactionId,
    TransactionRequest,
};
