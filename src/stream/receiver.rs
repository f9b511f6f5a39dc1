//! Control receiver - reads inbound frames and toggles streaming

use futures_util::{Stream, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};

use super::command::Command;
use super::session::Session;
use crate::error::{Result, StreamError};
use crate::settings::MalformedPolicy;

/// Read control frames until the peer closes
///
/// Returns `Ok(())` on a close frame or end of stream. Transport errors
/// are returned as-is; undecodable frames are returned as
/// [`StreamError::Decode`] unless `policy` says to ignore them.
pub async fn receive_commands<S>(
    session: &Session,
    stream: &mut S,
    policy: MalformedPolicy,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        let decoded = match frame? {
            Message::Text(text) => Command::decode(&text),
            Message::Binary(bytes) => Err(StreamError::Decode(format!(
                "binary frame of {} bytes",
                bytes.len()
            ))),
            Message::Close(frame) => {
                log::debug!("[conn {}] close frame: {:?}", session.id(), frame);
                return Ok(());
            }
            // Ping/pong replies are handled by tungstenite
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        };

        match decoded {
            Ok(command) => {
                session.apply(&command);
            }
            Err(e) => match policy {
                MalformedPolicy::Close => return Err(e),
                MalformedPolicy::Ignore => {
                    log::warn!("[conn {}] ignoring malformed frame: {}", session.id(), e);
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::time::Instant;

    type Frame = std::result::Result<Message, tungstenite::Error>;

    fn frames(texts: &[&str]) -> Vec<Frame> {
        texts.iter().map(|t| Ok(Message::text(*t))).collect()
    }

    async fn run(frames: Vec<Frame>, policy: MalformedPolicy) -> (Session, Result<()>) {
        let session = Session::new(1, Instant::now());
        let mut input = stream::iter(frames);
        let result = receive_commands(&session, &mut input, policy).await;
        (session, result)
    }

    #[tokio::test]
    async fn test_start_then_end_of_stream() {
        let (session, result) =
            run(frames(&[r#"{"command":"start_data_stream"}"#]), MalformedPolicy::Close).await;
        assert!(result.is_ok());
        assert!(session.is_streaming());
    }

    #[tokio::test]
    async fn test_last_command_wins() {
        let (session, result) = run(
            frames(&[
                r#"{"command":"start_data_stream"}"#,
                r#"{"command":"nope"}"#,
                r#"{"command":"stop_data_stream"}"#,
                r#"{"other":1}"#,
            ]),
            MalformedPolicy::Close,
        )
        .await;
        assert!(result.is_ok());
        assert!(!session.is_streaming());
    }

    #[tokio::test]
    async fn test_malformed_frame_closes_by_default() {
        let (session, result) = run(
            frames(&[r#"{"command":"start_data_stream"}"#, "garbage"]),
            MalformedPolicy::Close,
        )
        .await;
        assert!(matches!(result, Err(StreamError::Decode(_))));
        assert!(session.is_streaming());
    }

    #[tokio::test]
    async fn test_malformed_frame_ignored_when_configured() {
        let mut input = frames(&["garbage"]);
        input.push(Ok(Message::binary(vec![1u8, 2, 3])));
        input.extend(frames(&[r#"{"command":"start_data_stream"}"#]));

        let (session, result) = run(input, MalformedPolicy::Ignore).await;
        assert!(result.is_ok());
        assert!(session.is_streaming());
    }

    #[tokio::test]
    async fn test_close_frame_stops_reading() {
        let mut input = vec![Ok(Message::Close(None))];
        input.extend(frames(&[r#"{"command":"start_data_stream"}"#]));

        let (session, result) = run(input, MalformedPolicy::Close).await;
        assert!(result.is_ok());
        assert!(!session.is_streaming());
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal() {
        let input = vec![Err(tungstenite::Error::ConnectionClosed)];
        let (_, result) = run(input, MalformedPolicy::Ignore).await;
        assert!(matches!(result, Err(StreamError::Transport(_))));
    }
}
