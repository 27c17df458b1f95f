//! # Session — One Calibrated, Anchored Measurement
//!
//! ```text
//! calibrate ─▶ measure ─▶ build_record ─▶ persist ─▶ digest ─▶ anchor ─▶ receipt
//!    (R0)      (Rs/R0)     (canonical)    (write-once)  (sha256)  (ledger)  (sidecar)
//! ```
//!
//! Strictly sequential; each stage either yields its output or stops the
//! session with the stage's error. A failed anchor leaves the persisted
//! record in place and reports its path and digest for `dpp anchor`.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use dpp_anchor::{AnchorReceipt, Digest, IntegrityAnchor, Verification};
use dpp_core::{AnalogChannel, CancellationToken, Ledger};
use dpp_olfactory::{
    AnalogReader, CalibrationBaseline, DelayNs, GasSensor, Measurement, MeasurementLabels,
    StdDelay,
};
use dpp_record::{Record, RecordStore, build_record};
use std::path::{Path, PathBuf};

/// Everything one successful run produced
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub baseline: CalibrationBaseline,
    pub measurement: Measurement,
    pub record: Record,
    pub record_path: PathBuf,
    pub digest: Digest,
    pub receipt: AnchorReceipt,
    pub receipt_path: PathBuf,
}

pub struct Session<C, L, D = StdDelay> {
    sensor: GasSensor<C, D>,
    anchor: IntegrityAnchor<L>,
    store: RecordStore,
    labels: MeasurementLabels,
}

impl Session<Box<dyn AnalogChannel>, Box<dyn Ledger>, StdDelay> {
    /// Wire channel, ledger and store from configuration
    pub fn from_config(config: &SessionConfig, cancel: CancellationToken) -> SessionResult<Self> {
        config.validate()?;
        let reader = AnalogReader::new(config.build_channel()).with_cancellation(cancel.clone());
        let sensor = GasSensor::with_reader(reader, config.gas_sensor_config())?;
        let anchor = IntegrityAnchor::with_config(config.build_ledger()?, config.anchor_config())
            .with_cancellation(cancel);
        Ok(Self::new(sensor, anchor, config.record_store()?, config.labels()))
    }
}

impl<C: AnalogChannel, L: Ledger, D: DelayNs> Session<C, L, D> {
    pub fn new(
        sensor: GasSensor<C, D>,
        anchor: IntegrityAnchor<L>,
        store: RecordStore,
        labels: MeasurementLabels,
    ) -> Self {
        Self {
            sensor,
            anchor,
            store,
            labels,
        }
    }

    pub fn sensor(&self) -> &GasSensor<C, D> {
        &self.sensor
    }

    pub fn anchor(&self) -> &IntegrityAnchor<L> {
        &self.anchor
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run the whole pipeline once
    pub fn run(&mut self) -> SessionResult<SessionReport> {
        tracing::info!(device = %self.labels.device_id, "calibrating in clean air");
        let baseline = self.sensor.calibrate()?;

        tracing::info!("taking measurement");
        let measurement = self.sensor.measure(&self.labels)?;

        let record = build_record(&measurement)?;
        let record_path = self.store.persist(&record, &measurement.timestamp)?;

        let digest = Digest::of_record(&record);
        tracing::info!(%digest, "record digest");

        let receipt = match self.anchor.anchor_digest(&digest) {
            Ok(receipt) => receipt,
            Err(source) => {
                tracing::warn!(
                    error = %source,
                    record = %record_path.display(),
                    %digest,
                    "anchoring failed; record kept for anchor-only retry"
                );
                return Err(SessionError::Anchor {
                    source,
                    record_path,
                    digest,
                });
            }
        };
        let receipt_path = save_receipt(&receipt, &record_path)?;

        Ok(SessionReport {
            baseline,
            measurement,
            record,
            record_path,
            digest,
            receipt,
            receipt_path,
        })
    }
}

fn save_receipt(receipt: &AnchorReceipt, record_path: &Path) -> SessionResult<PathBuf> {
    let path = RecordStore::receipt_path(record_path);
    if let Err(source) = receipt.save(&path) {
        tracing::warn!(
            error = %source,
            transaction_id = %receipt.transaction_id,
            block = receipt.sequence_number,
            path = %path.display(),
            "anchor confirmed but receipt not stored"
        );
        return Err(SessionError::ReceiptNotStored {
            path,
            source,
            receipt: Box::new(receipt.clone()),
        });
    }
    Ok(path)
}

/// Anchor an already persisted record without re-sampling
pub fn anchor_record<L: Ledger>(
    anchor: &IntegrityAnchor<L>,
    record_path: &Path,
) -> SessionResult<(AnchorReceipt, PathBuf)> {
    let record = RecordStore::load(record_path)?;
    let receipt = anchor.anchor(&record)?;
    let receipt_path = save_receipt(&receipt, record_path)?;
    Ok((receipt, receipt_path))
}

/// Recompute the digest of a stored record and check it against the ledger.
///
/// The receipt defaults to the record's sidecar. Anything other than
/// [`Verification::Verified`] is returned as [`SessionError::Verification`].
pub fn verify_record<L: Ledger>(
    anchor: &IntegrityAnchor<L>,
    record_path: &Path,
    receipt_path: Option<&Path>,
) -> SessionResult<Verification> {
    let record = RecordStore::load(record_path)?;
    let receipt_path = receipt_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| RecordStore::receipt_path(record_path));
    let receipt = AnchorReceipt::load(&receipt_path)
        .map_err(|source| SessionError::Receipt { path: receipt_path, source })?;

    match anchor.verify(&record, &receipt)? {
        verified @ Verification::Verified { .. } => Ok(verified),
        failed => Err(SessionError::Verification(failed)),
    }
}

/// SHA-256 of a stored record's exact bytes
pub fn digest_record(record_path: &Path) -> SessionResult<Digest> {
    Ok(Digest::of_record(&RecordStore::load(record_path)?))
}
