//! Recibo de ancoragem
//!
//! Gravado ao lado do registro (`*.receipt.json`) e lido de volta por `verify`.

use crate::digest::Digest;
use crate::error::AnchorResult;
use dpp_core::{Address, TransactionId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorReceipt {
    pub transaction_id: TransactionId,
    pub confirmed: bool,
    /// Bloco de inclusão
    pub sequence_number: u64,
    /// Digest ancorado
    pub digest: Digest,
    /// Conta que submeteu
    pub account: Address,
}

impl AnchorReceipt {
    pub fn to_json(&self) -> AnchorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> AnchorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> AnchorResult<()> {
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "receipt saved");
        Ok(())
    }

    pub fn load(path: &Path) -> AnchorResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
