//! Simulated SpO2 readings

use rand::Rng;

/// Lowest reading the simulated oximeter reports (percent)
pub const OXIMETER_MIN: f64 = 95.0;
/// Highest reading the simulated oximeter reports (percent)
pub const OXIMETER_MAX: f64 = 99.0;

/// Draw a reading from the thread-local RNG
pub fn oximeter_reading() -> f64 {
    oximeter_reading_with(&mut rand::thread_rng())
}

/// Draw a uniform reading in `[OXIMETER_MIN, OXIMETER_MAX]`, rounded to
/// one decimal place.
pub fn oximeter_reading_with<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let raw = rng.gen_range(OXIMETER_MIN..=OXIMETER_MAX);
    (raw * 10.0).round() / 10.0
}
