//! # 🎯 Traits — Capacidades Injetadas do Pipeline DPP
//!
//! O pipeline nunca acessa hardware ou ledger como estado global. Cada
//! capacidade é um trait injetado nos engines:
//!
//! | Capacidade | Trait | Implementações |
//! |:-----------|:------|:---------------|
//! | Canal analógico | [`AnalogChannel`] | simulado, ADS1115 (I²C), IIO sysfs |
//! | Ledger | [`Ledger`] | memória, JSON-RPC |
//!
//! > *"Trait no core, implementação no módulo."*

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// BASE
// ═══════════════════════════════════════════════════════════════════════════════

/// Componente do pipeline (para logs e diagnóstico)
pub trait DppComponent: Debug {
    /// Nome único do componente
    fn name(&self) -> &str;

    /// Versão do componente
    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    /// Componente está pronto para uso?
    fn is_ready(&self) -> bool {
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANAL ANALÓGICO
// ═══════════════════════════════════════════════════════════════════════════════

/// Erro de leitura de canal analógico
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    #[error("Device not present: {0}")]
    NotPresent(String),
    #[error("Bus error: {0}")]
    Bus(String),
    #[error("Conversion timeout after {0}ms")]
    Timeout(u64),
    #[error("Invalid reading: {0}")]
    InvalidReading(String),
}

/// Canal que produz uma tensão instantânea (volts).
///
/// `&mut self` garante que apenas um leitor amostra o barramento físico por vez.
pub trait AnalogChannel: Debug {
    /// Lê a tensão instantânea do canal
    fn read_voltage(&mut self) -> Result<f64, ChannelError>;
}

impl<C: AnalogChannel + ?Sized> AnalogChannel for Box<C> {
    fn read_voltage(&mut self) -> Result<f64, ChannelError> {
        (**self).read_voltage()
    }
}

impl<C: AnalogChannel + ?Sized> AnalogChannel for &mut C {
    fn read_voltage(&mut self) -> Result<f64, ChannelError> {
        (**self).read_voltage()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEDGER
// ═══════════════════════════════════════════════════════════════════════════════

/// Erro de ledger
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error("Transaction {transaction_id} not confirmed after {waited_ms}ms")]
    ConfirmationTimeout { transaction_id: String, waited_ms: u64 },
}

/// Endereço de conta controlada (hex com prefixo `0x`)
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    /// Cria endereço a partir de 20 bytes
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identificador de transação (hash hex com prefixo `0x`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pedido de escrita no ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    /// Valor transferido (unidade mínima do ledger)
    pub value: u128,
    /// Payload opaco
    pub data: Vec<u8>,
}

/// Confirmação de inclusão
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub transaction_id: TransactionId,
    /// Número do bloco/sequência de inclusão
    pub sequence_number: u64,
}

/// Transação incluída, lida de volta do ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransaction {
    pub transaction_id: TransactionId,
    pub from: Address,
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
    /// `None` enquanto pendente
    pub sequence_number: Option<u64>,
}

/// Ledger append-only e ordenado.
///
/// Implementações são compartilháveis entre threads; escrita e leitura usam `&self`.
pub trait Ledger: Send + Sync {
    /// Contas controladas (ao menos uma deve existir para ancorar)
    fn accounts(&self) -> Result<Vec<Address>, LedgerError>;

    /// Submete transação e retorna seu identificador
    fn send_transaction(&self, tx: &TransactionRequest) -> Result<TransactionId, LedgerError>;

    /// Bloqueia até a inclusão ou até `timeout`
    fn wait_for_confirmation(
        &self,
        id: &TransactionId,
        timeout: Duration,
    ) -> Result<LedgerReceipt, LedgerError>;

    /// Lê a transação de volta (`None` se desconhecida)
    fn transaction(&self, id: &TransactionId) -> Result<Option<LedgerTransaction>, LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for Box<L> {
    fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        (**self).accounts()
    }

    fn send_transaction(&self, tx: &TransactionRequest) -> Result<TransactionId, LedgerError> {
        (**self).send_transaction(tx)
    }

    fn wait_for_confirmation(
        &self,
        id: &TransactionId,
        timeout: Duration,
    ) -> Result<LedgerReceipt, LedgerError> {
        (**self).wait_for_confirmation(id, timeout)
    }

    fn transaction(&self, id: &TransactionId) -> Result<Option<LedgerTransaction>, LedgerError> {
        (**self).transaction(id)
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        (**self).accounts()
    }

    fn send_transaction(&self, tx: &TransactionRequest) -> Result<TransactionId, LedgerError> {
        (**self).send_transaction(tx)
    }

    fn wait_for_confirmation(
        &self,
        id: &TransactionId,
        timeout: Duration,
    ) -> Result<LedgerReceipt, LedgerError> {
        (**self).wait_for_confirmation(id, timeout)
    }

    fn transaction(&self, id: &TransactionId) -> Result<Option<LedgerTransaction>, LedgerError> {
        (**self).transaction(id)
    }
}
