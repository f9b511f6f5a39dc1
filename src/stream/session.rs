//! Per-connection session state
//!
//! The control receiver is the only writer of the streaming flag and the
//! emitter only reads it, so a relaxed atomic is enough: the emitter sees
//! the latest command on its next tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::command::Command;

/// State shared by the receiver and emitter of one connection
#[derive(Debug)]
pub struct Session {
    /// Connection number assigned by the accept loop (for logs)
    id: u64,
    /// Whether the emitter should send samples
    streaming: AtomicBool,
    /// When the connection was accepted
    started_at: Instant,
}

impl Session {
    /// Open a session at `started_at` with streaming off
    pub fn new(id: u64, started_at: Instant) -> Self {
        Self {
            id,
            streaming: AtomicBool::new(false),
            started_at,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Check if samples should currently be sent
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::Relaxed)
    }

    /// Time since the session opened
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Apply a control command
    ///
    /// # Returns
    /// `true` if the streaming flag changed
    pub fn apply(&self, command: &Command) -> bool {
        let enable = match command {
            Command::Start => true,
            Command::Stop => false,
            Command::Unrecognized(name) => {
                log::debug!("[conn {}] ignoring command {:?}", self.id, name);
                return false;
            }
        };

        let was = self.streaming.swap(enable, Ordering::Relaxed);
        if was != enable {
            log::info!(
                "[conn {}] data stream {}",
                self.id,
                if enable { "started" } else { "stopped" }
            );
        }
        was != enable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(1, Instant::now());
        assert!(!session.is_streaming());
    }

    #[test]
    fn test_start_stop_transitions() {
        let session = Session::new(1, Instant::now());

        assert!(session.apply(&Command::Start));
        assert!(session.is_streaming());

        // Repeated start is accepted but changes nothing
        assert!(!session.apply(&Command::Start));
        assert!(session.is_streaming());

        assert!(session.apply(&Command::Stop));
        assert!(!session.is_streaming());

        assert!(!session.apply(&Command::Stop));
        assert!(!session.is_streaming());
    }

    #[test]
    fn test_unrecognized_is_noop() {
        let session = Session::new(1, Instant::now());
        session.apply(&Command::Start);

        assert!(!session.apply(&Command::Unrecognized(Some("pause".into()))));
        assert!(!session.apply(&Command::Unrecognized(None)));
        assert!(session.is_streaming());
    }

    #[test]
    fn test_elapsed_never_negative() {
        let start = Instant::now();
        let session = Session::new(1, start + Duration::from_secs(1));
        assert_eq!(session.elapsed(start), Duration::ZERO);
        assert_eq!(
            session.elapsed(start + Duration::from_millis(1500)),
            Duration::from_millis(500)
        );
    }
}
