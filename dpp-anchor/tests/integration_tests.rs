//! Registro → disco → âncora → recibo → verificação

use chrono::{TimeZone, Utc};
use dpp_anchor::{AnchorReceipt, IntegrityAnchor, MemoryLedger, Verification};
use dpp_olfactory::Measurement;
use dpp_record::{RecordStore, build_record};

fn measurement() -> Measurement {
    Measurement {
        device_id: "MQ_01".into(),
        timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        gas_type: "CO2".into(),
        location: "Warehouse_A".into(),
        voltage: 1.0,
        resistance: 23_000.0,
        ratio: 23_000.0 / 12_000.0,
    }
}

#[test]
fn test_persisted_record_verifies_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path());
    let m = measurement();
    let record = build_record(&m).unwrap();
    let path = store.persist(&record, &m.timestamp).unwrap();

    let anchor = IntegrityAnchor::new(MemoryLedger::new());
    let receipt = anchor.anchor(&record).unwrap();
    let receipt_path = RecordStore::receipt_path(&path);
    receipt.save(&receipt_path).unwrap();

    let reloaded = RecordStore::load(&path).unwrap();
    let reloaded_receipt = AnchorReceipt::load(&receipt_path).unwrap();
    assert_eq!(
        anchor.verify(&reloaded, &reloaded_receipt).unwrap(),
        Verification::Verified { sequence_number: 1 }
    );
}

#[test]
fn test_edited_file_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path());
    let m = measurement();
    let record = build_record(&m).unwrap();
    let path = store.persist(&record, &m.timestamp).unwrap();

    let anchor = IntegrityAnchor::new(MemoryLedger::new());
    let receipt = anchor.anchor(&record).unwrap();

    std::fs::write(&path, record.as_str().replace("Warehouse_A", "Warehouse_B")).unwrap();
    let edited = RecordStore::load(&path).unwrap();
    assert!(matches!(
        anchor.verify(&edited, &receipt).unwrap(),
        Verification::Mismatch { .. }
    ));
}
