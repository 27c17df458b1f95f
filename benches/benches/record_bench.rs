//! # Record Benchmarks
//!
//! Canonical serialization, SHA-256 digest and anchor/verify against the
//! memory ledger.
//!
//! Run: `cargo bench --bench record_bench`

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dpp_anchor::{Digest, IntegrityAnchor, MemoryLedger};
use dpp_olfactory::Measurement;
use dpp_record::build_record;

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

fn bench_build_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_record");
    let plain = measurement();
    let mut escaped = measurement();
    escaped.location = "Dock <A> & \"B\"".into();

    group.bench_function("plain_labels", |b| b.iter(|| black_box(build_record(&plain))));
    group.bench_function("escaped_labels", |b| b.iter(|| black_box(build_record(&escaped))));
    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");
    let record = build_record(&measurement()).unwrap();

    group.bench_function("record", |b| b.iter(|| black_box(Digest::of_record(&record))));

    for size in [256usize, 4096, 65_536] {
        let data = vec![0xA5u8; size];
        group.bench_with_input(BenchmarkId::new("bytes", size), &data, |b, data| {
            b.iter(|| black_box(Digest::of(data)))
        });
    }
    group.finish();
}

fn bench_anchor(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor");
    let record = build_record(&measurement()).unwrap();

    group.bench_function("anchor_memory", |b| {
        let anchor = IntegrityAnchor::new(MemoryLedger::new());
        b.iter(|| black_box(anchor.anchor(&record)))
    });

    let anchor = IntegrityAnchor::new(MemoryLedger::new());
    let receipt = anchor.anchor(&record).unwrap();
    group.bench_function("verify_memory", |b| {
        b.iter(|| black_box(anchor.verify(&record, &receipt)))
    });
    group.finish();
}

criterion_group!(benches, bench_build_record, bench_digest, bench_anchor);
criterion_main!(benches);
