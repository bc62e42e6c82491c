//! Block-based processing contract shared by the chorus engines.
//!
//! Audio moves through the pipeline as fixed-size blocks of 16-bit PCM at a
//! fixed sample rate. An upstream stage may have produced nothing for a
//! given block period, which the pipeline models as `None` rather than a
//! block of zeros, so effects can skip work while still keeping their
//! modulation state moving.

/// Sample rate the engines are tuned for, in Hz.
///
/// Delay offsets, LFO increments and filter coefficients in the engine
/// crates all assume this rate. The primitives in this crate take the rate
/// as a parameter so they can be reused, but the engines pin it here.
pub const SAMPLE_RATE_HZ: f32 = 44_100.0;

/// Number of samples in one processing block.
pub const BLOCK_SAMPLES: usize = 128;

/// One block of 16-bit PCM samples.
pub type AudioBlock = [i16; BLOCK_SAMPLES];

/// Trait for effects that consume and produce audio one block at a time.
///
/// `process_block` receives `Some` block to transform in place, or `None`
/// when the upstream stage produced nothing this period. Implementations
/// must advance their time-varying state (LFO phases, delay write heads)
/// either way, so that modulation stays continuous across dropped blocks.
///
/// # Example
///
/// ```
/// use coro_core::{AudioBlock, BLOCK_SAMPLES, BlockEffect};
///
/// struct Gain(i32);
///
/// impl BlockEffect for Gain {
///     fn process_block(&mut self, block: Option<&mut AudioBlock>) {
///         if let Some(block) = block {
///             for s in block.iter_mut() {
///                 *s = (i32::from(*s) * self.0 / 256).clamp(-32768, 32767) as i16;
///             }
///         }
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain(128);
/// let mut block: AudioBlock = [16000; BLOCK_SAMPLES];
/// gain.process_block(Some(&mut block));
/// assert_eq!(block[0], 8000);
/// ```
pub trait BlockEffect {
    /// Process one block in place, or advance state past a missing block.
    fn process_block(&mut self, block: Option<&mut AudioBlock>);

    /// Reset internal state (delay contents, filters, LFO phases).
    fn reset(&mut self);
}
