//! Testes de ancoragem e verificação

use super::*;
use dpp_record::Record;
use std::sync::Arc;
use std::time::Duration;

/// Registro do cenário de referência (Rs = 23000, R0 = 12000)
const REFERENCE_RECORD: &str = "<EmissionData>\n  \
    <DeviceID>MQ_01</DeviceID>\n  \
    <Timestamp>2025-01-01T12:00:00Z</Timestamp>\n  \
    <GasType>CO2</GasType>\n  \
    <Voltage unit=\"V\">1.000</Voltage>\n  \
    <SensorResistance unit=\"ohm\">23000.0</SensorResistance>\n  \
    <RsOverR0>1.917</RsOverR0>\n  \
    <Location>Warehouse_A</Location>\n\
    </EmissionData>";

const REFERENCE_DIGEST: &str = "2f44ce9bb7842c59191e30910a165c582f143c05b9d9e4ecc8e8ac20a40469d0";

fn record() -> Record {
    Record::from_canonical(REFERENCE_RECORD)
}

fn anchor() -> IntegrityAnchor<MemoryLedger> {
    IntegrityAnchor::new(MemoryLedger::new())
}

#[test]
fn test_reference_digest() {
    assert_eq!(Digest::of_record(&record()).to_hex(), REFERENCE_DIGEST);
}

#[test]
fn test_first_anchor_lands_after_genesis() {
    let anchor = anchor();
    let receipt = anchor.anchor(&record()).unwrap();

    assert!(receipt.confirmed);
    assert_eq!(receipt.sequence_number, 1);
    assert_eq!(receipt.digest.to_hex(), REFERENCE_DIGEST);
    assert_eq!(receipt.account, anchor.ledger().accounts().unwrap()[0]);
}

#[test]
fn test_payload_is_self_transfer_of_digest() {
    let anchor = anchor();
    let receipt = anchor.anchor(&record()).unwrap();
    let tx = anchor.ledger().transaction(&receipt.transaction_id).unwrap().unwrap();

    assert_eq!(tx.from, tx.to);
    assert_eq!(tx.value, 0);
    assert_eq!(tx.data.len(), 32);
    assert_eq!(hex::encode(&tx.data), REFERENCE_DIGEST);
}

#[test]
fn test_read_back_is_idempotent() {
    let anchor = anchor();
    let receipt = anchor.anchor(&record()).unwrap();
    let a = anchor.ledger().transaction(&receipt.transaction_id).unwrap();
    let b = anchor.ledger().transaction(&receipt.transaction_id).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.unwrap().sequence_number, Some(receipt.sequence_number));
}

#[test]
fn test_verify_unchanged_record() {
    let anchor = anchor();
    let receipt = anchor.anchor(&record()).unwrap();
    assert_eq!(
        anchor.verify(&record(), &receipt).unwrap(),
        Verification::Verified { sequence_number: 1 }
    );
}

#[test]
fn test_verify_detects_single_byte_change() {
    let anchor = anchor();
    let receipt = anchor.anchor(&record()).unwrap();
    let tampered = Record::from_canonical(REFERENCE_RECORD.replace("1.917", "1.918"));

    let result = anchor.verify(&tampered, &receipt).unwrap();
    match result {
        Verification::Mismatch { expected, found } => {
            assert_eq!(expected, Digest::of_record(&tampered));
            assert_eq!(found, REFERENCE_DIGEST);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_verify_wrong_sequence() {
    let anchor = anchor();
    let mut receipt = anchor.anchor(&record()).unwrap();
    receipt.sequence_number = 7;
    assert_eq!(
        anchor.verify(&record(), &receipt).unwrap(),
        Verification::SequenceMismatch { expected: 7, found: Some(1) }
    );
}

#[test]
fn test_verify_unknown_transaction() {
    let anchor = anchor();
    let mut receipt = anchor.anchor(&record()).unwrap();
    receipt.transaction_id = TransactionId("0xfeed".into());
    assert_eq!(anchor.verify(&record(), &receipt).unwrap(), Verification::NotFound);
}

#[test]
fn test_no_controlled_account_is_unavailable() {
    let anchor = IntegrityAnchor::new(MemoryLedger::with_config(MemoryLedgerConfig {
        accounts: 0,
        ..Default::default()
    }));
    assert!(matches!(anchor.anchor(&record()), Err(AnchorError::LedgerUnavailable(_))));
    assert!(!anchor.is_ready());
}

#[test]
fn test_offline_ledger_is_unavailable() {
    let ledger = MemoryLedger::new();
    ledger.set_online(false);
    let anchor = IntegrityAnchor::new(ledger);
    assert!(matches!(anchor.anchor(&record()), Err(AnchorError::LedgerUnavailable(_))));
}

#[test]
fn test_configured_account_must_be_controlled() {
    let config = AnchorConfig {
        account: Some(Address("0x0000000000000000000000000000000000000001".into())),
        ..Default::default()
    };
    let anchor = IntegrityAnchor::with_config(MemoryLedger::new(), config);
    assert!(matches!(anchor.anchor(&record()), Err(AnchorError::SubmissionRejected(_))));
}

#[test]
fn test_configured_account_is_used() {
    let ledger = MemoryLedger::new();
    let second = ledger.accounts().unwrap()[1].clone();
    let config = AnchorConfig {
        account: Some(second.clone()),
        ..Default::default()
    };
    let receipt = IntegrityAnchor::with_config(ledger, config).anchor(&record()).unwrap();
    assert_eq!(receipt.account, second);
}

#[test]
fn test_oversized_payload_rejected() {
    let ledger = MemoryLedger::with_config(MemoryLedgerConfig {
        max_payload_len: 16,
        ..Default::default()
    });
    let anchor = IntegrityAnchor::new(ledger);
    assert!(matches!(anchor.anchor(&record()), Err(AnchorError::SubmissionRejected(_))));
}

#[test]
fn test_insufficient_funds_rejected() {
    let ledger = MemoryLedger::with_config(MemoryLedgerConfig {
        initial_balance: 0,
        ..Default::default()
    });
    let anchor = IntegrityAnchor::new(ledger);
    assert!(matches!(anchor.anchor(&record()), Err(AnchorError::SubmissionRejected(_))));
}

#[test]
fn test_confirmation_timeout_reports_transaction() {
    let ledger = MemoryLedger::with_config(MemoryLedgerConfig {
        finality_delay: Duration::from_secs(60),
        poll_interval: Duration::from_millis(5),
        ..Default::default()
    });
    let config = AnchorConfig {
        confirmation_timeout: Duration::from_millis(25),
        ..Default::default()
    };
    let anchor = IntegrityAnchor::with_config(ledger, config);

    match anchor.anchor(&record()) {
        Err(AnchorError::ConfirmationTimeout { transaction_id, waited_ms }) => {
            assert!(transaction_id.starts_with("0x"));
            assert!(waited_ms >= 25);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn test_cancelled_before_submission() {
    let token = CancellationToken::new();
    token.cancel();
    let anchor = IntegrityAnchor::new(MemoryLedger::new()).with_cancellation(token);
    assert!(matches!(
        anchor.anchor(&record()),
        Err(AnchorError::Cancelled { transaction_id: None })
    ));
    assert_eq!(anchor.ledger().block_number().unwrap(), 0);
}

/// Ledger que dispara o cancelamento logo após aceitar a transação
struct CancelOnSubmit {
    inner: MemoryLedger,
    token: CancellationToken,
}

impl Ledger for CancelOnSubmit {
    fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        self.inner.accounts()
    }

    fn send_transaction(&self, tx: &TransactionRequest) -> Result<TransactionId, LedgerError> {
        let id = self.inner.send_transaction(tx)?;
        self.token.cancel();
        Ok(id)
    }

    fn wait_for_confirmation(
        &self,
        id: &TransactionId,
        timeout: Duration,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.inner.wait_for_confirmation(id, timeout)
    }

    fn transaction(&self, id: &TransactionId) -> Result<Option<LedgerTransaction>, LedgerError> {
        self.inner.transaction(id)
    }
}

#[test]
fn test_cancelled_after_submission_keeps_transaction_id() {
    let token = CancellationToken::new();
    let ledger = CancelOnSubmit {
        inner: MemoryLedger::new(),
        token: token.clone(),
    };
    let anchor = IntegrityAnchor::new(ledger).with_cancellation(token);

    let err = anchor.anchor(&record()).unwrap_err();
    let id = match &err {
        AnchorError::Cancelled { transaction_id: Some(id) } => TransactionId(id.clone()),
        other => panic!("expected cancellation with transaction id, got {other:?}"),
    };
    assert_eq!(err.submitted_transaction(), Some(id.as_str()));
    assert!(err.to_string().contains(id.as_str()));

    // A transação enviada continua verificável
    let tx = anchor.ledger().transaction(&id).unwrap().unwrap();
    assert_eq!(hex::encode(&tx.data), REFERENCE_DIGEST);
}

#[test]
fn test_configured_account_matches_checksum_case() {
    let ledger = MemoryLedger::new();
    let second = ledger.accounts().unwrap()[1].clone();
    let checksummed = format!("0x{}", second.as_str()[2..].to_ascii_uppercase());
    assert_ne!(checksummed, second.as_str());

    let config = AnchorConfig {
        account: Some(Address(checksummed)),
        ..Default::default()
    };
    let receipt = IntegrityAnchor::with_config(ledger, config).anchor(&record()).unwrap();
    assert_eq!(receipt.account, second);
}

#[test]
fn test_anchor_digest_reentry() {
    let anchor = anchor();
    let digest = Digest::of_record(&record());
    let receipt = anchor.anchor_digest(&digest).unwrap();
    assert!(anchor.verify(&record(), &receipt).unwrap().is_verified());
}

#[test]
fn test_shared_ledger_sequences() {
    let ledger = Arc::new(MemoryLedger::new());
    let a = IntegrityAnchor::new(Arc::clone(&ledger));
    let b = IntegrityAnchor::new(Arc::clone(&ledger));

    let first = a.anchor(&record()).unwrap();
    let second = b.anchor(&record()).unwrap();
    assert_eq!(first.sequence_number, 1);
    assert_eq!(second.sequence_number, 2);
    assert_ne!(first.transaction_id, second.transaction_id);
    assert!(a.verify(&record(), &second).unwrap().is_verified());
}

#[test]
fn test_component() {
    let anchor = anchor();
    assert_eq!(anchor.name(), "IntegrityAnchor");
    assert!(anchor.is_ready());
}
