//! Error types shared across the server

use std::path::PathBuf;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Everything that can end a connection or the process
#[derive(Debug, Error)]
pub enum StreamError {
    /// Binding or accepting on the listen socket failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket handshake, read or write failed (peer gone)
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// Inbound frame could not be decoded as a control message
    #[error("undecodable frame: {0}")]
    Decode(String),

    /// Outbound sample could not be serialized
    #[error("failed to encode sample: {0}")]
    Encode(#[from] serde_json::Error),

    /// Settings file could not be read or written
    #[error("settings file {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, StreamError>;
