//! Waveform emitter - builds and sends one sample per tick
//!
//! The emitter owns the oximeter clock: it is the only code that reads
//! or advances `last_oximeter_at`, so the clock lives here rather than
//! on the shared [`Session`].

use std::time::{Duration, Instant};

use futures_util::{Sink, SinkExt};
use tokio::time::{self, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};

use super::sample::{ReferenceSignals, SampleMessage};
use super::session::Session;
use crate::error::Result;
use crate::settings::Settings;
use crate::signal::{cosine, oximeter_reading, sine, PpgParams};

/// Per-connection emitter state
#[derive(Clone, Debug)]
pub struct Emitter {
    ppg: PpgParams,
    tick_interval: Duration,
    oximeter_interval: Duration,
    /// When the last reading was attached (starts at session open)
    last_oximeter_at: Instant,
    reference_signals: bool,
}

impl Emitter {
    pub fn new(session: &Session, settings: &Settings) -> Self {
        Self {
            ppg: settings.ppg(),
            tick_interval: settings.tick_interval(),
            oximeter_interval: settings.oximeter_interval(),
            last_oximeter_at: session.started_at(),
            reference_signals: settings.reference_signals,
        }
    }

    /// Build the sample for the tick at `now`
    ///
    /// # Returns
    /// `None` while the session is not streaming
    pub fn tick(&mut self, session: &Session, now: Instant) -> Option<SampleMessage> {
        if !session.is_streaming() {
            return None;
        }

        let t = session.elapsed(now).as_secs_f64();

        let oximeter = if now.saturating_duration_since(self.last_oximeter_at)
            >= self.oximeter_interval
        {
            self.last_oximeter_at = now;
            Some(oximeter_reading())
        } else {
            None
        };

        let reference = self.reference_signals.then(|| ReferenceSignals {
            sine: sine(t, 1.0, 1.0, 0.0),
            cosine: cosine(t, 1.0, 1.0, 0.0),
        });

        Some(SampleMessage {
            elapsed_time: t,
            pulse_oximetry: self.ppg.sample(t),
            oximeter,
            reference,
        })
    }

    /// Tick until the sink fails
    ///
    /// Only returns on a write error, which means the peer is gone.
    pub async fn run<S>(mut self, session: &Session, sink: &mut S) -> Result<()>
    where
        S: Sink<Message, Error = tungstenite::Error> + Unpin,
    {
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Some(sample) = self.tick(session, Instant::now()) {
                let json = sample.encode()?;
                log::debug!("[conn {}] {}", session.id(), json);
                sink.send(Message::text(json)).await?;
            }
        }
    }
}
