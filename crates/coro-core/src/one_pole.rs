//! One-pole lowpass filter for tone shaping around the delay line.
//!
//! A single-pole IIR lowpass with the difference equation:
//!
//! ```text
//! y[n] = y[n-1] + a * (x[n] - y[n-1])
//! ```
//!
//! where `a = 1 - exp(-2π * freq / sample_rate)`, clamped to `[0, 1]`.
//!
//! This is the simplest possible lowpass — 6 dB/octave rolloff, zero latency,
//! one multiply per sample. The chorus engines run one instance before the
//! delay write (brightness shaping) and one after the modulated read
//! (high-frequency rolloff on the wet path).

use crate::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in `[0, 1]` for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
///
/// # Example
///
/// ```rust
/// use coro_core::OnePole;
///
/// let mut lp = OnePole::new(44_100.0, 7_000.0);
/// let filtered = lp.process(1.0);
/// assert!(filtered < 1.0); // attenuated above cutoff
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Create a new one-pole lowpass filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq_hz` - Cutoff frequency in Hz (−3 dB point)
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the cutoff frequency and recalculate the coefficient.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_coeff();
    }

    /// Process one sample through the lowpass filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.state + self.coeff * (input - self.state));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// The smoothing coefficient currently in use.
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Recalculate the coefficient from frequency and sample rate.
    ///
    /// `a = 1 - exp(-2π * freq / sample_rate)`. Higher freq → higher coeff →
    /// less filtering. At freq = 0, a = 0 (output frozen). Well past Nyquist,
    /// a → 1 (pass-through).
    fn recalculate_coeff(&mut self) {
        let a = 1.0 - expf(-(core::f32::consts::TAU * self.freq) / self.sample_rate);
        self.coeff = a.clamp(0.0, 1.0);
    }
}
