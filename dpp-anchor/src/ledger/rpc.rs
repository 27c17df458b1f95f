//! Ledger Ethereum JSON-RPC sobre HTTP
//!
//! `eth_accounts`, `eth_sendTransaction`, `eth_getTransactionReceipt` (polling)
//! e `eth_getTransactionByHash` para leitura de volta. Erros de transporte
//! viram `Unavailable`; objetos de erro JSON-RPC viram `Rejected`.

use dpp_core::{
    Address, Ledger, LedgerError, LedgerReceipt, LedgerTransaction, TransactionId,
    TransactionRequest,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct JsonRpcLedger {
    url: String,
    agent: ureq::Agent,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            poll_interval: Duration::from_millis(500),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        tracing::trace!(method, id, "json-rpc call");

        let response = match self.agent.post(&self.url).send_json(body) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(LedgerError::Unavailable(format!("{method}: HTTP {code}")));
            }
            Err(e) => return Err(LedgerError::Unavailable(format!("{}: {e}", self.url))),
        };
        let reply: Value = response
            .into_json()
            .map_err(|e| LedgerError::Unavailable(format!("{method}: invalid response: {e}")))?;
        unwrap_reply(reply)
    }
}

impl std::fmt::Debug for JsonRpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcLedger")
            .field("url", &self.url)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl Ledger for JsonRpcLedger {
    fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        let result = self.call("eth_accounts", json!([]))?;
        let list = result
            .as_array()
            .ok_or_else(|| malformed("eth_accounts", "expected array"))?;
        list.iter()
            .map(|v| {
                v.as_str()
                    .map(|s| Address(s.to_string()))
                    .ok_or_else(|| malformed("eth_accounts", "expected address string"))
            })
            .collect()
    }

    fn send_transaction(&self, tx: &TransactionRequest) -> Result<TransactionId, LedgerError> {
        let params = json!([{
            "from": tx.from.as_str(),
            "to": tx.to.as_str(),
            "value": format!("0x{:x}", tx.value),
            "data": format!("0x{}", hex::encode(&tx.data)),
        }]);
        let result = self.call("eth_sendTransaction", params)?;
        result
            .as_str()
            .map(|s| TransactionId(s.to_string()))
            .ok_or_else(|| malformed("eth_sendTransaction", "expected transaction hash"))
    }

    fn wait_for_confirmation(
        &self,
        id: &TransactionId,
        timeout: Duration,
    ) -> Result<LedgerReceipt, LedgerError> {
        let started = Instant::now();
        loop {
            let receipt = self.call("eth_getTransactionReceipt", json!([id.as_str()]))?;
            if !receipt.is_null() {
                return parse_receipt(id, &receipt);
            }

            let waited = started.elapsed();
            if waited >= timeout {
                return Err(LedgerError::ConfirmationTimeout {
                    transaction_id: id.to_string(),
                    waited_ms: waited.as_millis() as u64,
                });
            }
            thread::sleep(self.poll_interval.min(timeout - waited));
        }
    }

    fn transaction(&self, id: &TransactionId) -> Result<Option<LedgerTransaction>, LedgerError> {
        let tx = self.call("eth_getTransactionByHash", json!([id.as_str()]))?;
        if tx.is_null() {
            return Ok(None);
        }
        parse_transaction(&tx).map(Some)
    }
}

fn malformed(method: &str, what: &str) -> LedgerError {
    LedgerError::Unavailable(format!("{method}: malformed response, {what}"))
}

fn unwrap_reply(mut reply: Value) -> Result<Value, LedgerError> {
    if let Some(error) = reply.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown json-rpc error");
        return Err(LedgerError::Rejected(message.to_string()));
    }
    Ok(reply.get_mut("result").map(Value::take).unwrap_or(Value::Null))
}

/// Quantidade hex (`0x1a`)
fn parse_quantity(value: &Value, field: &str) -> Result<u128, LedgerError> {
    let s = value
        .as_str()
        .ok_or_else(|| malformed(field, "expected hex quantity"))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(|e| malformed(field, &e.to_string()))
}

fn parse_block(value: &Value, field: &str) -> Result<u64, LedgerError> {
    u64::try_from(parse_quantity(value, field)?).map_err(|_| malformed(field, "block out of range"))
}

fn parse_data(value: &Value) -> Result<Vec<u8>, LedgerError> {
    let s = value.as_str().ok_or_else(|| malformed("input", "expected hex data"))?;
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|e| malformed("input", &e.to_string()))
}

fn parse_receipt(id: &TransactionId, receipt: &Value) -> Result<LedgerReceipt, LedgerError> {
    if receipt.get("status").and_then(Value::as_str) == Some("0x0") {
        return Err(LedgerError::Rejected(format!("transaction {id} reverted")));
    }
    Ok(LedgerReceipt {
        transaction_id: id.clone(),
        sequence_number: parse_block(&receipt["blockNumber"], "blockNumber")?,
    })
}

fn parse_transaction(tx: &Value) -> Result<LedgerTransaction, LedgerError> {
    let text = |field: &str| {
        tx[field]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| malformed(field, "expected string"))
    };
    let sequence_number = match &tx["blockNumber"] {
        Value::Null => None,
        block => Some(parse_block(block, "blockNumber")?),
    };
    Ok(LedgerTransaction {
        transaction_id: TransactionId(text("hash")?),
        from: Address(text("from")?),
        // `to` é nulo em criação de contrato
        to: Address(tx["to"].as_str().unwrap_or_default().to_string()),
        value: parse_quantity(&tx["value"], "value")?,
        data: parse_data(&tx["input"])?,
        sequence_number,
    })
}
