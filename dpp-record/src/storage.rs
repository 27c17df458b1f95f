//! Write-once record store
//!
//! One file per measurement, named from its timestamp:
//! `2025-01-01T12:00:00Z` → `emission_20250101T120000Z.xml`.

use crate::error::{RecordError, RecordResult};
use crate::record::Record;
use chrono::{DateTime, Utc};
use dpp_olfactory::TIMESTAMP_FORMAT;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory under `$HOME` used when none is configured
pub const DEFAULT_DIR_NAME: &str = "dpp_samples";

const FILE_PREFIX: &str = "emission_";
const FILE_EXTENSION: &str = "xml";
const RECEIPT_EXTENSION: &str = "receipt.json";

#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/dpp_samples`
    pub fn default_location() -> RecordResult<Self> {
        let home = dirs::home_dir().ok_or(RecordError::HomeDirUnavailable)?;
        Ok(Self::new(home.join(DEFAULT_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name derived from the record timestamp (`:` and `-` stripped)
    pub fn file_name(timestamp: &DateTime<Utc>) -> String {
        let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string().replace([':', '-'], "");
        format!("{FILE_PREFIX}{stamp}.{FILE_EXTENSION}")
    }

    pub fn path_for(&self, timestamp: &DateTime<Utc>) -> PathBuf {
        self.root.join(Self::file_name(timestamp))
    }

    /// Sidecar path holding the anchor receipt of a record
    pub fn receipt_path(record_path: &Path) -> PathBuf {
        record_path.with_extension(RECEIPT_EXTENSION)
    }

    /// Persist the exact record bytes. Never overwrites an existing record.
    ///
    /// Bytes are written and synced to a temporary file in the same
    /// directory, then linked under the final name, so a failed write never
    /// leaves a partial record behind.
    pub fn persist(&self, record: &Record, timestamp: &DateTime<Utc>) -> RecordResult<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(timestamp);
        if path.exists() {
            return Err(RecordError::AlreadyExists(path));
        }

        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(record.as_bytes())?;
        staged.as_file().sync_all()?;

        match staged.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RecordError::AlreadyExists(path));
            }
            Err(e) => return Err(e.error.into()),
        }

        tracing::info!(path = %path.display(), bytes = record.len(), "record persisted");
        Ok(path)
    }

    /// Read a stored record back byte-for-byte
    pub fn load(path: &Path) -> RecordResult<Record> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| RecordError::InvalidEncoding(path.to_path_buf()))?;
        Ok(Record::from_canonical(text))
    }
}
