//! Outbound sample messages

use serde::Serialize;

use crate::error::Result;

/// One emitted tick worth of signal values
///
/// Serializes as `{"time_stamp": .., "pulse_oximetry": ..}` with
/// `oximeter` appended only on ticks that carry a fresh reading.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleMessage {
    /// Seconds since the session started
    #[serde(rename = "time_stamp")]
    pub elapsed_time: f64,
    pub pulse_oximetry: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oximeter: Option<f64>,
    #[serde(flatten)]
    pub reference: Option<ReferenceSignals>,
}

/// 1 Hz reference signals, sent only when enabled in settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReferenceSignals {
    pub sine: f64,
    pub cosine: f64,
}

impl SampleMessage {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
