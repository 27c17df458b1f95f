//! Canonical emission record
//!
//! The exact bytes produced here are what gets hashed and anchored, so the
//! field order, precision and whitespace below are part of the wire contract.

use crate::error::{RecordError, RecordResult};
use crate::printer::Printer;
use dpp_olfactory::Measurement;
use std::borrow::Cow;
use std::fmt;

pub const ROOT_ELEMENT: &str = "EmissionData";

pub const VOLTAGE_DECIMALS: usize = 3;
pub const RESISTANCE_DECIMALS: usize = 1;
pub const RATIO_DECIMALS: usize = 3;

/// Serialized measurement (UTF-8 text)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    text: String,
}

impl Record {
    /// Wrap already-canonical text, e.g. a record read back from storage
    pub fn from_canonical(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Serialize a measurement into its canonical record.
///
/// Field-identical measurements always produce byte-identical records.
pub fn build_record(measurement: &Measurement) -> RecordResult<Record> {
    let device_id = text_field("DeviceID", &measurement.device_id)?;
    let gas_type = text_field("GasType", &measurement.gas_type)?;
    let location = text_field("Location", &measurement.location)?;
    let voltage = numeric_field("Voltage", measurement.voltage, VOLTAGE_DECIMALS)?;
    let resistance = numeric_field("SensorResistance", measurement.resistance, RESISTANCE_DECIMALS)?;
    let ratio = numeric_field("RsOverR0", measurement.ratio, RATIO_DECIMALS)?;

    let mut p = Printer::new();
    p.open(ROOT_ELEMENT);
    p.element("DeviceID", &device_id);
    p.element("Timestamp", &measurement.timestamp_str());
    p.element("GasType", &gas_type);
    p.element_with_unit("Voltage", "V", &voltage);
    p.element_with_unit("SensorResistance", "ohm", &resistance);
    p.element("RsOverR0", &ratio);
    p.element("Location", &location);
    p.close(ROOT_ELEMENT);

    let record = Record { text: p.finish() };
    tracing::debug!(bytes = record.len(), device = %measurement.device_id, "record built");
    Ok(record)
}

fn numeric_field(name: &str, value: f64, decimals: usize) -> RecordResult<String> {
    if !value.is_finite() {
        return Err(RecordError::Serialization(format!(
            "{name} is not a finite number ({value})"
        )));
    }
    Ok(format!("{value:.decimals$}"))
}

fn text_field<'a>(name: &str, value: &'a str) -> RecordResult<Cow<'a, str>> {
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        return Err(RecordError::Serialization(format!(
            "{name} contains control character {c:?}"
        )));
    }
    Ok(escape(value))
}

/// Escape markup characters; plain labels are returned unchanged
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
