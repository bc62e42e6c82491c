//! Low-frequency oscillator waveforms for delay modulation.
//!
//! The engines drive their delay taps from triangle waves, either bipolar
//! around a center delay or unipolar across a min/max range, plus a
//! composite triangle that fakes the beating of two detuned LFOs with a
//! single phase accumulator. All waveform functions take a normalized phase
//! in cycles, `0.0..1.0`.

use core::f32::consts::{FRAC_PI_2, TAU};

use libm::{floorf, sinf};

/// Triangle wave in `[-1.0, 1.0]` from a normalized phase.
///
/// Rises from `-1.0` at phase `0.0` to `+1.0` at `0.5`, then falls back.
pub fn triangle_bipolar(phase01: f32) -> f32 {
    if phase01 < 0.5 {
        4.0 * phase01 - 1.0
    } else {
        3.0 - 4.0 * phase01
    }
}

/// Triangle wave in `[0.0, 1.0]` from a normalized phase.
///
/// Rises from `0.0` at phase `0.0` to `1.0` at `0.5`, then falls back.
pub fn triangle_unipolar(phase01: f32) -> f32 {
    if phase01 < 0.5 {
        phase01 * 2.0
    } else {
        2.0 - phase01 * 2.0
    }
}

/// Triangle with a secondary ripple at 2.6x the fundamental, in `[0.0, 1.0]`.
///
/// Approximates the beating of two chorus LFOs running at once without a
/// second phase accumulator. The ripple weight is 0.15, so the sum can
/// poke outside the unit range at the triangle's extremes; the result is
/// clamped back in.
pub fn beating_triangle(phase01: f32) -> f32 {
    let tri = triangle_unipolar(phase01);
    let ripple = sinf(TAU * phase01 * 2.6) * 0.15;
    (tri + ripple).clamp(0.0, 1.0)
}

/// Wraps an arbitrary phase into `[0.0, 1.0)`.
pub fn wrap_phase01(phase: f32) -> f32 {
    let wrapped = phase - floorf(phase);
    // `x - floor(x)` rounds up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Free-running triangle LFO pair in quadrature, phases held in radians.
///
/// Drives a pair of modulated delay taps: the second phase leads the first
/// by a quarter cycle so the taps breathe against each other. Phases
/// accumulate in radians and each call to
/// [`triangle_pair`](QuadratureLfo::triangle_pair) converts to normalized
/// cycles before shaping.
///
/// # Example
///
/// ```
/// use coro_core::QuadratureLfo;
///
/// let mut lfo = QuadratureLfo::new(44_100.0, 0.5);
/// let [a, b] = lfo.triangle_pair();
/// assert_eq!(a, -1.0); // trough at phase zero
/// assert_eq!(b, 0.0); // quarter cycle ahead, crossing zero
/// lfo.advance();
/// ```
#[derive(Debug)]
pub struct QuadratureLfo {
    sample_rate: f32,
    rate_hz: f32,
    increment: f32,
    phase: [f32; 2],
}

impl QuadratureLfo {
    /// Creates an LFO pair at `rate_hz`, phases at zero and a quarter cycle.
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        Self {
            sample_rate,
            rate_hz,
            increment: rate_hz * TAU / sample_rate,
            phase: [0.0, FRAC_PI_2],
        }
    }

    /// Changes the oscillation rate without disturbing the current phases.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate_hz = rate_hz;
        self.increment = rate_hz * TAU / self.sample_rate;
    }

    /// Current oscillation rate in Hz.
    pub fn rate_hz(&self) -> f32 {
        self.rate_hz
    }

    /// Advances both phases by one sample period, wrapping at `2*pi`.
    pub fn advance(&mut self) {
        for phase in &mut self.phase {
            *phase += self.increment;
            if *phase >= TAU {
                *phase -= TAU;
            }
        }
    }

    /// Bipolar triangle values for both phases.
    pub fn triangle_pair(&self) -> [f32; 2] {
        let mut pair = [0.0; 2];
        for (out, &phase) in pair.iter_mut().zip(&self.phase) {
            let p = wrap_phase01(phase * (1.0 / TAU));
            *out = triangle_bipolar(p);
        }
        pair
    }

    /// Rewinds both phases to their initial quadrature positions.
    pub fn reset(&mut self) {
        self.phase = [0.0, FRAC_PI_2];
    }
}
