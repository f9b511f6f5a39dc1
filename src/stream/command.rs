//! Inbound control messages
//!
//! Clients send `{"command": "start_data_stream"}` or
//! `{"command": "stop_data_stream"}`. Any other JSON object is accepted
//! and ignored; anything that is not a JSON object fails to decode.

use serde_json::Value;

use crate::error::{Result, StreamError};

pub const START_DATA_STREAM: &str = "start_data_stream";
pub const STOP_DATA_STREAM: &str = "stop_data_stream";

/// A decoded control message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Begin emitting samples
    Start,
    /// Stop emitting samples
    Stop,
    /// Decodable but not a command we know; carries the raw `command` value if any
    Unrecognized(Option<String>),
}

impl Command {
    /// Decode one text frame
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| StreamError::Decode(e.to_string()))?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(StreamError::Decode(format!("expected a JSON object, got {other}")))
            }
        };

        Ok(match fields.remove("command") {
            Some(Value::String(name)) => match name.as_str() {
                START_DATA_STREAM => Command::Start,
                STOP_DATA_STREAM => Command::Stop,
                _ => Command::Unrecognized(Some(name)),
            },
            Some(other) => Command::Unrecognized(Some(other.to_string())),
            None => Command::Unrecognized(None),
        })
    }
}
