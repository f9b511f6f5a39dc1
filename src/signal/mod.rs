//! Signal module - synthetic physiological signals
//!
//! This module provides:
//! - Reference periodic signals (sine, cosine)
//! - The PPG (plethysmograph) pulse waveform
//! - Random oxygen-saturation readings
//!
//! Everything here is a pure function of elapsed time, except the
//! oximeter reading which draws from a random source.

mod oximeter;
mod waveform;

#[allow(unused_imports)]
pub use oximeter::{oximeter_reading, oximeter_reading_with, OXIMETER_MAX, OXIMETER_MIN};
#[allow(unused_imports)]
pub use waveform::{cosine, ppg, sine, PpgParams};
