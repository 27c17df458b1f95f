//! # Anchor — Ancoragem e Verificação
//!
//! ```text
//! Record ──sha256──▶ Digest ──tx{from: acct, to: acct, value: 0, data}──▶ Ledger
//!                                                                          │
//!   AnchorReceipt ◀──────────── wait_for_confirmation(timeout) ◀───────────┘
//! ```
//!
//! A verificação recomputa o digest e compara com o payload lido de volta
//! na transação do recibo.

use crate::digest::Digest;
use crate::error::{AnchorError, AnchorResult};
use crate::receipt::AnchorReceipt;
use dpp_core::{
    Address, CancellationToken, DppComponent, Ledger, TransactionId, TransactionRequest,
};
use dpp_record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Limite padrão de espera por confirmação
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub confirmation_timeout: Duration,
    /// Conta explícita; `None` usa a primeira conta controlada
    pub account: Option<Address>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            account: None,
        }
    }
}

/// Resultado da verificação de um registro contra seu recibo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified { sequence_number: u64 },
    /// Digest recomputado difere do payload ancorado
    Mismatch { expected: Digest, found: String },
    /// Transação existe, mas em outra sequência (ou pendente)
    SequenceMismatch { expected: u64, found: Option<u64> },
    NotFound,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified { sequence_number } => write!(f, "verified at block {sequence_number}"),
            Self::Mismatch { expected, found } => {
                write!(f, "digest mismatch: record {expected}, ledger {found}")
            }
            Self::SequenceMismatch { expected, found: Some(found) } => {
                write!(f, "sequence mismatch: receipt {expected}, ledger {found}")
            }
            Self::SequenceMismatch { expected, found: None } => {
                write!(f, "sequence mismatch: receipt {expected}, ledger pending")
            }
            Self::NotFound => f.write_str("transaction not found"),
        }
    }
}

pub struct IntegrityAnchor<L> {
    ledger: L,
    config: AnchorConfig,
    cancel: Option<CancellationToken>,
}

impl<L: Ledger> IntegrityAnchor<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_config(ledger, AnchorConfig::default())
    }

    pub fn with_config(ledger: L, config: AnchorConfig) -> Self {
        Self {
            ledger,
            config,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Hash + submissão + confirmação
    pub fn anchor(&self, record: &Record) -> AnchorResult<AnchorReceipt> {
        let digest = Digest::of_record(record);
        tracing::debug!(%digest, bytes = record.len(), "record digest computed");
        self.anchor_digest(&digest)
    }

    /// Ancora um digest já calculado (reancoragem de registro persistido)
    pub fn anchor_digest(&self, digest: &Digest) -> AnchorResult<AnchorReceipt> {
        self.check_cancelled(None)?;
        let account = self.controlled_account()?;

        let request = TransactionRequest {
            from: account.clone(),
            to: account.clone(),
            value: 0,
            data: digest.as_bytes().to_vec(),
        };
        let transaction_id = self.ledger.send_transaction(&request)?;
        tracing::info!(%transaction_id, %account, "digest submitted");

        // Já submetida: cancelar aqui só evita a espera
        self.check_cancelled(Some(&transaction_id))?;
        let confirmation = self
            .ledger
            .wait_for_confirmation(&transaction_id, self.config.confirmation_timeout)?;
        tracing::info!(
            transaction_id = %confirmation.transaction_id,
            block = confirmation.sequence_number,
            "anchor confirmed"
        );

        Ok(AnchorReceipt {
            transaction_id: confirmation.transaction_id,
            confirmed: true,
            sequence_number: confirmation.sequence_number,
            digest: *digest,
            account,
        })
    }

    /// Recomputa o digest do registro e compara com o ledger
    pub fn verify(&self, record: &Record, receipt: &AnchorReceipt) -> AnchorResult<Verification> {
        self.verify_digest(&Digest::of_record(record), receipt)
    }

    pub fn verify_digest(&self, digest: &Digest, receipt: &AnchorReceipt) -> AnchorResult<Verification> {
        let Some(tx) = self.ledger.transaction(&receipt.transaction_id)? else {
            tracing::warn!(transaction_id = %receipt.transaction_id, "anchored transaction not found");
            return Ok(Verification::NotFound);
        };

        if tx.sequence_number != Some(receipt.sequence_number) {
            return Ok(Verification::SequenceMismatch {
                expected: receipt.sequence_number,
                found: tx.sequence_number,
            });
        }

        if tx.data.as_slice() != digest.as_bytes() {
            return Ok(Verification::Mismatch {
                expected: *digest,
                found: hex::encode(&tx.data),
            });
        }

        tracing::debug!(block = receipt.sequence_number, "record verified");
        Ok(Verification::Verified {
            sequence_number: receipt.sequence_number,
        })
    }

    fn controlled_account(&self) -> AnchorResult<Address> {
        let accounts = self.ledger.accounts()?;
        match &self.config.account {
            // Nós devolvem minúsculas; a configuração pode vir em checksum EIP-55
            Some(configured) => accounts
                .into_iter()
                .find(|a| a.as_str().eq_ignore_ascii_case(configured.as_str()))
                .ok_or_else(|| {
                    AnchorError::SubmissionRejected(format!(
                        "account {configured} is not controlled by the ledger provider"
                    ))
                }),
            None => accounts
                .into_iter()
                .next()
                .ok_or_else(|| AnchorError::LedgerUnavailable("no controlled account".into())),
        }
    }

    /// `submitted` é a transação já enviada, se houver
    fn check_cancelled(&self, submitted: Option<&TransactionId>) -> AnchorResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                if let Some(id) = submitted {
                    tracing::warn!(transaction_id = %id, "cancelled after submission; confirmation not awaited");
                }
                Err(AnchorError::Cancelled {
                    transaction_id: submitted.map(ToString::to_string),
                })
            }
            _ => Ok(()),
        }
    }
}

impl<L> fmt::Debug for IntegrityAnchor<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrityAnchor")
            .field("config", &self.config)
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl<L: Ledger> DppComponent for IntegrityAnchor<L> {
    fn name(&self) -> &str {
        "IntegrityAnchor"
    }

    fn is_ready(&self) -> bool {
        self.ledger.accounts().map(|a| !a.is_empty()).unwrap_or(false)
    }
}
