//! Tipos de erro para dpp-anchor

use dpp_core::LedgerError;
use thiserror::Error;

/// Resultado customizado para operações de ancoragem
pub type AnchorResult<T> = Result<T, AnchorError>;

/// Erros de ancoragem e verificação
#[derive(Debug, Error)]
pub enum AnchorError {
    /// Provedor inacessível ou nenhuma conta controlada
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Payload malformado, saldo insuficiente ou conta desconhecida
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Submetida, mas não confirmada dentro do limite
    #[error("Transaction {transaction_id} not confirmed after {waited_ms}ms")]
    ConfirmationTimeout { transaction_id: String, waited_ms: u64 },

    /// `transaction_id` presente quando o cancelamento veio após a submissão
    #[error("Anchoring cancelled{}", submitted_suffix(.transaction_id))]
    Cancelled { transaction_id: Option<String> },

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Recibo ilegível ou inválido
    #[error("Receipt error: {0}")]
    Receipt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn submitted_suffix(transaction_id: &Option<String>) -> String {
    transaction_id
        .as_deref()
        .map(|id| format!(" after submitting {id}"))
        .unwrap_or_default()
}

impl AnchorError {
    /// Transação já enviada ao ledger, quando o erro ocorreu depois da submissão
    pub fn submitted_transaction(&self) -> Option<&str> {
        match self {
            Self::ConfirmationTimeout { transaction_id, .. } => Some(transaction_id),
            Self::Cancelled { transaction_id } => transaction_id.as_deref(),
            _ => None,
        }
    }
}

impl From<LedgerError> for AnchorError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unavailable(msg) => Self::LedgerUnavailable(msg),
            LedgerError::Rejected(msg) => Self::SubmissionRejected(msg),
            LedgerError::ConfirmationTimeout { transaction_id, waited_ms } => {
                Self::ConfirmationTimeout { transaction_id, waited_ms }
            }
        }
    }
}

impl From<serde_json::Error> for AnchorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Receipt(err.to_string())
    }
}
