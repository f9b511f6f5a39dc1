//! Waveforms - deterministic signals sampled from elapsed time
//!
//! All functions take `t` in seconds since the session started.
//! They hold no state, so the same inputs always give the same output.

use std::f64::consts::TAU;

/// Phase offset of the systolic peak within one beat (0.0 to 1.0)
const PPG_PHASE_SHIFT: f64 = 0.6;

/// Centre of the dicrotic notch within one beat
const NOTCH_CENTER: f64 = 0.5;
const NOTCH_WIDTH: f64 = 0.1;
const NOTCH_DEPTH: f64 = 0.3;

/// Sample a sine wave
///
/// # Arguments
/// * `t` - Time in seconds
/// * `frequency` - Frequency in Hz
/// * `amplitude` - Peak value
/// * `phase` - Phase offset in radians
pub fn sine(t: f64, frequency: f64, amplitude: f64, phase: f64) -> f64 {
    amplitude * (TAU * frequency * t + phase).sin()
}

/// Sample a cosine wave (same arguments as [`sine`])
pub fn cosine(t: f64, frequency: f64, amplitude: f64, phase: f64) -> f64 {
    amplitude * (TAU * frequency * t + phase).cos()
}

/// Sample the PPG pulse waveform
///
/// One beat is a rectified sine hump with a gaussian notch carved out
/// at mid-beat. The result repeats every `60 / heart_rate` seconds and
/// never drops below `-NOTCH_DEPTH`.
///
/// # Arguments
/// * `t` - Time in seconds
/// * `heart_rate` - Beats per minute
/// * `amplitude` - Peak height of the pulse
pub fn ppg(t: f64, heart_rate: f64, amplitude: f64) -> f64 {
    let frequency = heart_rate / 60.0;

    // Fractional progress through the current beat
    let beat = (t % (1.0 / frequency)) * frequency;

    let pulse = (amplitude * (TAU * (beat - PPG_PHASE_SHIFT)).sin()).max(0.0);

    let offset = beat - NOTCH_CENTER;
    let notch = NOTCH_DEPTH * (-(offset * offset) / (2.0 * NOTCH_WIDTH * NOTCH_WIDTH)).exp();

    pulse - notch
}

/// PPG shape parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PpgParams {
    /// Beats per minute
    pub heart_rate: f64,
    /// Peak height of the pulse
    pub amplitude: f64,
}

impl PpgParams {
    pub fn new(heart_rate: f64, amplitude: f64) -> Self {
        Self {
            heart_rate,
            amplitude,
        }
    }

    /// Length of one beat in seconds
    pub fn period(&self) -> f64 {
        60.0 / self.heart_rate
    }

    /// Sample the waveform at `t` seconds
    pub fn sample(&self, t: f64) -> f64 {
        ppg(t, self.heart_rate, self.amplitude)
    }
}

impl Default for PpgParams {
    fn default() -> Self {
        Self::new(72.0, 1.0)
    }
}
