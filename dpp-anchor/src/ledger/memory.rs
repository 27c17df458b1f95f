//! Ledger em memória
//!
//! Cadeia local determinística com contas pré-financiadas. Cada transação
//! aceita é minerada no próprio bloco; o bloco 0 é a gênese.

use dpp_core::{
    Address, Ledger, LedgerError, LedgerReceipt, LedgerTransaction, TransactionId,
    TransactionRequest,
};
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// 1 ether em wei
const ETHER: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLedgerConfig {
    /// Número de contas financiadas
    pub accounts: usize,
    pub initial_balance: u128,
    /// Taxa cobrada por transação aceita
    pub fee: u128,
    /// Maior payload aceito (bytes)
    pub max_payload_len: usize,
    /// Tempo entre submissão e inclusão
    pub finality_delay: Duration,
    pub poll_interval: Duration,
}

impl Default for MemoryLedgerConfig {
    fn default() -> Self {
        Self {
            accounts: 10,
            initial_balance: 100 * ETHER,
            fee: 21_000 * 1_000_000_000,
            max_payload_len: 1024,
            finality_delay: Duration::ZERO,
            poll_interval: Duration::from_millis(10),
        }
    }
}

#[derive(Debug)]
struct Entry {
    tx: LedgerTransaction,
    submitted_at: Instant,
}

#[derive(Debug, Default)]
struct Chain {
    accounts: Vec<Address>,
    balances: HashMap<Address, u128>,
    nonces: HashMap<Address, u64>,
    entries: HashMap<TransactionId, Entry>,
    /// Submissão em ordem, aguardando inclusão
    pending: Vec<TransactionId>,
    height: u64,
}

impl Chain {
    /// Inclui as pendentes cujo atraso de finalidade já passou
    fn mine_ready(&mut self, now: Instant, delay: Duration) {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for id in std::mem::take(&mut self.pending) {
            let ready = self
                .entries
                .get(&id)
                .is_some_and(|e| now.duration_since(e.submitted_at) >= delay);
            // Ordem de submissão preservada: nada passa à frente de uma pendente
            if ready && still_pending.is_empty() {
                self.height += 1;
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.tx.sequence_number = Some(self.height);
                    tracing::trace!(transaction_id = %id, block = self.height, "mined");
                }
            } else {
                still_pending.push(id);
            }
        }
        self.pending = still_pending;
    }
}

#[derive(Debug)]
pub struct MemoryLedger {
    config: MemoryLedgerConfig,
    chain: Mutex<Chain>,
    online: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::with_config(MemoryLedgerConfig::default())
    }

    pub fn with_config(config: MemoryLedgerConfig) -> Self {
        let mut chain = Chain::default();
        for index in 0..config.accounts {
            let address = derive_address(index);
            chain.balances.insert(address.clone(), config.initial_balance);
            chain.accounts.push(address);
        }
        Self {
            config,
            chain: Mutex::new(chain),
            online: AtomicBool::new(true),
        }
    }

    pub fn config(&self) -> &MemoryLedgerConfig {
        &self.config
    }

    /// Simula queda/retorno do provedor
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Altura atual (0 = só gênese)
    pub fn block_number(&self) -> Result<u64, LedgerError> {
        let mut chain = self.lock()?;
        chain.mine_ready(Instant::now(), self.config.finality_delay);
        Ok(chain.height)
    }

    pub fn balance(&self, address: &Address) -> Result<u128, LedgerError> {
        Ok(self.lock()?.balances.get(address).copied().unwrap_or(0))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Chain>, LedgerError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("memory ledger offline".into()));
        }
        self.chain
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger state poisoned".into()))
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for MemoryLedger {
    fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        Ok(self.lock()?.accounts.clone())
    }

    fn send_transaction(&self, tx: &TransactionRequest) -> Result<TransactionId, LedgerError> {
        let mut chain = self.lock()?;

        if tx.data.len() > self.config.max_payload_len {
            return Err(LedgerError::Rejected(format!(
                "payload of {} bytes exceeds {}",
                tx.data.len(),
                self.config.max_payload_len
            )));
        }
        let balance = *chain
            .balances
            .get(&tx.from)
            .ok_or_else(|| LedgerError::Rejected(format!("unknown account {}", tx.from)))?;
        let cost = tx
            .value
            .checked_add(self.config.fee)
            .ok_or_else(|| LedgerError::Rejected("value overflow".into()))?;
        if balance < cost {
            return Err(LedgerError::Rejected(format!(
                "insufficient funds: balance {balance}, cost {cost}"
            )));
        }

        let nonce = chain.nonces.get(&tx.from).copied().unwrap_or(0);
        let id = transaction_hash(tx, nonce);

        chain.nonces.insert(tx.from.clone(), nonce + 1);
        chain.balances.insert(tx.from.clone(), balance - cost);
        *chain.balances.entry(tx.to.clone()).or_insert(0) += tx.value;

        let now = Instant::now();
        chain.entries.insert(
            id.clone(),
            Entry {
                tx: LedgerTransaction {
                    transaction_id: id.clone(),
                    from: tx.from.clone(),
                    to: tx.to.clone(),
                    value: tx.value,
                    data: tx.data.clone(),
                    sequence_number: None,
                },
                submitted_at: now,
            },
        );
        chain.pending.push(id.clone());
        chain.mine_ready(now, self.config.finality_delay);

        Ok(id)
    }

    fn wait_for_confirmation(
        &self,
        id: &TransactionId,
        timeout: Duration,
    ) -> Result<LedgerReceipt, LedgerError> {
        let started = Instant::now();
        loop {
            {
                let mut chain = self.lock()?;
                chain.mine_ready(Instant::now(), self.config.finality_delay);
                let entry = chain
                    .entries
                    .get(id)
                    .ok_or_else(|| LedgerError::Rejected(format!("unknown transaction {id}")))?;
                if let Some(sequence_number) = entry.tx.sequence_number {
                    return Ok(LedgerReceipt {
                        transaction_id: id.clone(),
                        sequence_number,
                    });
                }
            }

            let waited = started.elapsed();
            if waited >= timeout {
                return Err(LedgerError::ConfirmationTimeout {
                    transaction_id: id.to_string(),
                    waited_ms: waited.as_millis() as u64,
                });
            }
            thread::sleep(self.config.poll_interval.min(timeout - waited));
        }
    }

    fn transaction(&self, id: &TransactionId) -> Result<Option<LedgerTransaction>, LedgerError> {
        let mut chain = self.lock()?;
        chain.mine_ready(Instant::now(), self.config.finality_delay);
        Ok(chain.entries.get(id).map(|e| e.tx.clone()))
    }
}

/// Endereço determinístico da conta `index`
fn derive_address(index: usize) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"dpp-memory-ledger/account");
    hasher.update((index as u64).to_be_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(&bytes)
}

fn transaction_hash(tx: &TransactionRequest, nonce: u64) -> TransactionId {
    let mut hasher = Sha256::new();
    hasher.update(tx.from.as_str().as_bytes());
    hasher.update(tx.to.as_str().as_bytes());
    hasher.update(tx.value.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.update(&tx.data);
    TransactionId(format!("0x{}", hex::encode(hasher.finalize())))
}
