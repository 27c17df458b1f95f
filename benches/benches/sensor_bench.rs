//! # Sensor Benchmarks
//!
//! Divider inversion and a full calibrate + measure cycle on a simulated
//! channel with zero sampling interval.
//!
//! Run: `cargo bench --bench sensor_bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dpp_olfactory::{
    CalibrationConfig, DividerCircuit, GasSensor, GasSensorConfig, MeasurementConfig,
    MeasurementLabels, SimulatedChannel,
};
use std::time::Duration;

fn bench_resistance(c: &mut Criterion) {
    let circuit = DividerCircuit::default();
    c.bench_function("divider_resistance", |b| {
        b.iter(|| black_box(circuit.resistance(black_box(1.0))))
    });
}

fn bench_session_cycle(c: &mut Criterion) {
    let config = GasSensorConfig {
        calibration: CalibrationConfig {
            sample_count: 25,
            interval: Duration::ZERO,
        },
        measurement: MeasurementConfig {
            sample_count: 10,
            interval: Duration::ZERO,
        },
        ..Default::default()
    };
    let labels = MeasurementLabels::default();

    c.bench_function("calibrate_and_measure", |b| {
        b.iter(|| {
            let channel = SimulatedChannel::phased(1.5, 25, 1.0);
            let mut sensor = GasSensor::with_config(channel, config.clone()).unwrap();
            sensor.calibrate().unwrap();
            black_box(sensor.measure(&labels).unwrap())
        })
    });
}

criterion_group!(benches, bench_resistance, bench_session_cycle);
criterion_main!(benches);
