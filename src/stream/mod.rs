//! Stream module - one WebSocket connection's streaming loop
//!
//! This module provides:
//! - `Command` decoding for inbound control frames
//! - `Session` state shared by the two halves of a connection
//! - `Emitter` which sends a `SampleMessage` every tick while streaming
//! - `receive_commands` which applies control frames to the session
//!
//! ## Lifecycle
//!
//! ```text
//! handshake ──▶ OPEN(idle) ⇄ OPEN(streaming) ──▶ CLOSED
//!                 start_data_stream / stop_data_stream
//! ```
//!
//! The receiver and emitter are raced on the connection's task. When
//! either one finishes (peer closed, write failed, bad frame) the other
//! is dropped and the socket is closed.

mod command;
mod emitter;
mod receiver;
mod sample;
mod session;

use std::time::Instant;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::WebSocketStream;

use crate::error::Result;
use crate::settings::Settings;

#[allow(unused_imports)]
pub use command::Command;
pub use emitter::Emitter;
pub use receiver::receive_commands;
#[allow(unused_imports)]
pub use sample::{ReferenceSignals, SampleMessage};
pub use session::Session;

/// Run one accepted connection until either side ends it
pub async fn serve_connection<S>(
    ws: WebSocketStream<S>,
    id: u64,
    settings: &Settings,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let session = Session::new(id, Instant::now());
    let emitter = Emitter::new(&session, settings);
    let (mut sink, mut stream) = ws.split();

    let outcome = tokio::select! {
        result = receive_commands(&session, &mut stream, settings.malformed_frames) => result,
        result = emitter.run(&session, &mut sink) => result,
    };

    if let Err(e) = sink.close().await {
        log::debug!("[conn {}] close: {}", id, e);
    }

    outcome
}
