//! Multi-mode ensemble chorus with a block-synchronized stereo LFO.
//!
//! One engine instance per channel, each owning its delay line and filter
//! states, with the LFO phase shared through a [`PhaseLatch`] so left and
//! right sweep in lockstep no matter which channel the pipeline processes
//! first. The right channel evaluates the shared phase half a cycle late
//! and reads its tap six samples further back, which keeps the pair audibly
//! and meter-visibly decorrelated.
//!
//! Output is always 100% wet; blending with the dry signal belongs to the
//! mixer stage downstream. The signal path is pre-lowpass → delay write →
//! modulated fractional read → post-lowpass → soft saturation.

use alloc::rc::Rc;

use coro_core::{
    AudioBlock, BLOCK_SAMPLES, BlockEffect, DelayLine, OnePole, SAMPLE_RATE_HZ, beating_triangle,
    clamp_i16, soft_knee, triangle_unipolar,
};

use crate::error::ChorusError;
use crate::latch::PhaseLatch;

/// Chorus program selector.
///
/// Each active mode pins the LFO rate, sweep range, and depth to a tuned
/// table entry; `Off` is equivalent to bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChorusMode {
    /// No effect; blocks pass through untouched.
    Off,
    /// Subtle single chorus, slow sweep.
    #[default]
    ModeA,
    /// Richer single chorus, faster sweep.
    ModeB,
    /// Both choruses at once, approximated with a beating composite LFO.
    Combined,
}

impl ChorusMode {
    /// LFO rate for this mode, in Hz.
    pub const fn rate_hz(self) -> f32 {
        match self {
            Self::Off => 0.0,
            Self::ModeA => 0.5,
            Self::ModeB => 0.8,
            Self::Combined => 0.65,
        }
    }

    /// Shortest sweep delay for this mode, in seconds.
    pub const fn min_delay_secs(self) -> f32 {
        match self {
            Self::Off => 0.0,
            _ => 0.00166,
        }
    }

    /// Longest sweep delay for this mode, in seconds.
    pub const fn max_delay_secs(self) -> f32 {
        match self {
            Self::Off => 0.0,
            _ => 0.00535,
        }
    }

    /// Modulation depth for this mode.
    pub const fn depth(self) -> f32 {
        match self {
            Self::Off => 0.0,
            Self::ModeA => 0.65,
            Self::ModeB => 0.90,
            Self::Combined => 0.78,
        }
    }

    /// Maps a menu/MIDI mode index to a mode, clamping out-of-range values.
    pub const fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => Self::Off,
            1 => Self::ModeA,
            2 => Self::ModeB,
            _ => Self::Combined,
        }
    }

    /// The menu/MIDI index for this mode.
    pub const fn index(self) -> i32 {
        match self {
            Self::Off => 0,
            Self::ModeA => 1,
            Self::ModeB => 2,
            Self::Combined => 3,
        }
    }
}

/// Which half of a stereo pair an engine instance serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoChannel {
    /// Primary channel; publishes the end-of-block phase to the latch.
    Left,
    /// Offset channel; evaluates the LFO 180° late plus a static tap skew.
    Right,
}

/// One channel of a phase-synchronized ensemble chorus pair.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use coro_core::{AudioBlock, BLOCK_SAMPLES, BlockEffect};
/// use coro_effects::{ChorusMode, EnsembleChorus, PhaseLatch, StereoChannel};
///
/// let latch = Rc::new(PhaseLatch::new());
/// let mut left_buf = vec![0i16; 512];
/// let mut right_buf = vec![0i16; 512];
/// let mut left =
///     EnsembleChorus::new(&mut left_buf, Rc::clone(&latch), StereoChannel::Left).unwrap();
/// let mut right = EnsembleChorus::new(&mut right_buf, latch, StereoChannel::Right).unwrap();
/// left.set_mode(ChorusMode::ModeB);
/// right.set_mode(ChorusMode::ModeB);
///
/// let mut l: AudioBlock = [1000; BLOCK_SAMPLES];
/// let mut r: AudioBlock = [1000; BLOCK_SAMPLES];
/// left.process_block(Some(&mut l));
/// right.process_block(Some(&mut r));
/// ```
#[derive(Debug)]
pub struct EnsembleChorus<'a> {
    delay: DelayLine<'a>,
    latch: Rc<PhaseLatch>,
    channel: StereoChannel,
    mode: ChorusMode,
    bypass: bool,
    pre_filter: OnePole,
    post_filter: OnePole,
}

impl<'a> EnsembleChorus<'a> {
    /// Smallest delay line the engine accepts, in samples.
    pub const MIN_DELAY_SAMPLES: usize = 32;

    /// Pre-delay brightness shaping cutoff.
    const PRE_CUTOFF_HZ: f32 = 18_000.0;
    /// Post-read rolloff cutoff on the wet path.
    const POST_CUTOFF_HZ: f32 = 7_000.0;

    /// Soft saturation threshold on the post-filtered wet signal.
    const KNEE_THRESHOLD: f32 = 16_000.0;
    /// Compression ratio applied beyond the knee.
    const KNEE_RATIO: f32 = 0.30;

    /// Static extra tap delay on the right channel, in samples.
    const RIGHT_TAP_SKEW: f32 = 6.0;

    /// Builds one channel of a chorus pair over `storage`, zeroing it.
    ///
    /// Both channels of a pair must share the same `latch`. Defaults:
    /// [`ChorusMode::ModeA`], bypass off.
    ///
    /// # Errors
    ///
    /// Returns [`ChorusError::DelayLineTooShort`] if `storage` holds fewer
    /// than [`MIN_DELAY_SAMPLES`](Self::MIN_DELAY_SAMPLES) samples.
    pub fn new(
        storage: &'a mut [i16],
        latch: Rc<PhaseLatch>,
        channel: StereoChannel,
    ) -> Result<Self, ChorusError> {
        if storage.len() < Self::MIN_DELAY_SAMPLES {
            return Err(ChorusError::DelayLineTooShort {
                required: Self::MIN_DELAY_SAMPLES,
                len: storage.len(),
            });
        }

        Ok(Self {
            delay: DelayLine::new(storage),
            latch,
            channel,
            mode: ChorusMode::ModeA,
            bypass: false,
            pre_filter: OnePole::new(SAMPLE_RATE_HZ, Self::PRE_CUTOFF_HZ),
            post_filter: OnePole::new(SAMPLE_RATE_HZ, Self::POST_CUTOFF_HZ),
        })
    }

    /// Selects the chorus program.
    pub fn set_mode(&mut self, mode: ChorusMode) {
        self.mode = mode;
    }

    /// Enables or disables bypass.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// The selected chorus program.
    pub fn mode(&self) -> ChorusMode {
        self.mode
    }

    /// Whether the engine is bypassed.
    pub fn bypass(&self) -> bool {
        self.bypass
    }

    /// Which stereo channel this instance serves.
    pub fn channel(&self) -> StereoChannel {
        self.channel
    }

    /// Length of the delay line in samples, for diagnostics/UI.
    pub fn delay_len(&self) -> usize {
        self.delay.len()
    }

    /// Evaluates this channel's LFO at a shared phase position.
    fn lfo_value(&self, phase01: f32) -> f32 {
        let mut p = phase01;
        if self.channel == StereoChannel::Right {
            p += 0.5;
            if p >= 1.0 {
                p -= 1.0;
            }
        }
        if self.mode == ChorusMode::Combined {
            beating_triangle(p)
        } else {
            triangle_unipolar(p)
        }
    }

    fn process_samples(&mut self, block: &mut AudioBlock, mut phase: f32, increment: f32) -> f32 {
        let min_tap = self.mode.min_delay_secs() * SAMPLE_RATE_HZ;
        let max_tap = self.mode.max_delay_secs() * SAMPLE_RATE_HZ;
        let center = 0.5 * (min_tap + max_tap);
        let half_range = 0.5 * (max_tap - min_tap) * self.mode.depth();

        let tap_skew = match self.channel {
            StereoChannel::Left => 0.0,
            StereoChannel::Right => Self::RIGHT_TAP_SKEW,
        };

        for sample in block.iter_mut() {
            let filtered_in = self.pre_filter.process(f32::from(*sample));
            self.delay.write(filtered_in as i16);

            let lfo01 = self.lfo_value(phase);
            let tap = (center + (lfo01 - 0.5) * (2.0 * half_range) + tap_skew)
                .clamp(min_tap, max_tap);

            let delayed = self.delay.read_interpolated(tap);
            let shaped = self.post_filter.process(delayed);
            let saturated = soft_knee(shaped, Self::KNEE_THRESHOLD, Self::KNEE_RATIO);

            // 100% wet; the dry path belongs to the external mixer.
            *sample = clamp_i16(saturated as i32);

            phase += increment;
            if phase >= 1.0 {
                phase -= 1.0;
            }
        }

        phase
    }
}

impl BlockEffect for EnsembleChorus<'_> {
    fn process_block(&mut self, block: Option<&mut AudioBlock>) {
        // Bypassed or off: no audio change, no state change, and no latch
        // participation — the partner channel is expected to be configured
        // identically, so the shared phase simply holds.
        if self.bypass || self.mode == ChorusMode::Off {
            return;
        }

        let start_phase = self.latch.begin_block();
        let increment = self.mode.rate_hz() / SAMPLE_RATE_HZ;

        let end_phase = match block {
            Some(block) => self.process_samples(block, start_phase, increment),
            None => {
                let mut silent: AudioBlock = [0; BLOCK_SAMPLES];
                self.process_samples(&mut silent, start_phase, increment)
            }
        };

        if self.channel == StereoChannel::Left {
            self.latch.publish_end(end_phase);
        }
        self.latch.finish_block();
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.pre_filter.reset();
        self.post_filter.reset();
        self.latch.set_phase(0.0);
    }
}
