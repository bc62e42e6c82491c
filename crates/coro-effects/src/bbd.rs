//! BBD-style chorus with two quadrature delay taps.
//!
//! Models the bucket-brigade chorus found in late-70s polysynths: a short
//! modulated delay around a 3 ms center, swept by a slow triangle LFO. Two
//! taps read the same delay line with their LFOs a quarter cycle apart, and
//! the taps are averaged into a single thick voice rather than split into
//! stereo — the width comes from the two slightly detuned reads beating
//! against each other, the way the original hardware's paired BBD clocks
//! did.
//!
//! The wet/dry blend uses the legacy Q8 fixed-point mix so output samples
//! match the original pipeline bit for bit.

use coro_core::{
    AudioBlock, BLOCK_SAMPLES, BlockEffect, DelayLine, QuadratureLfo, SAMPLE_RATE_HZ, mix_q8,
    q8_gain,
};

use crate::error::ChorusError;

/// Dual-tap BBD chorus over caller-supplied delay storage.
///
/// # Example
///
/// ```
/// use coro_core::{AudioBlock, BLOCK_SAMPLES, BlockEffect};
/// use coro_effects::BbdChorus;
///
/// let mut storage = vec![0i16; 512];
/// let mut chorus = BbdChorus::new(&mut storage).unwrap();
/// chorus.set_rate(0.5);
/// chorus.set_mix(1.0);
///
/// let mut block: AudioBlock = [0; BLOCK_SAMPLES];
/// block[0] = 16_000;
/// chorus.process_block(Some(&mut block));
/// ```
#[derive(Debug)]
pub struct BbdChorus<'a> {
    delay: DelayLine<'a>,
    lfo: QuadratureLfo,
    rate: f32,
    depth: f32,
    mix: f32,
    bypass: bool,
}

impl<'a> BbdChorus<'a> {
    /// Smallest delay line the engine accepts, in samples.
    pub const MIN_DELAY_SAMPLES: usize = 10;

    /// Modulation center point: ~3 ms at 44.1 kHz.
    const BASE_DELAY: f32 = 132.0;
    /// Peak modulation excursion around the center: ~±2 ms.
    const MOD_RANGE: f32 = 88.0;
    /// Shortest allowed tap delay: ~1.5 ms.
    const MIN_TAP: f32 = 66.0;
    /// Longest allowed tap delay: ~5 ms.
    const MAX_TAP: f32 = 220.0;

    const MIN_RATE_HZ: f32 = 0.1;
    const MAX_RATE_HZ: f32 = 5.0;

    /// Builds a chorus over `storage`, zeroing it.
    ///
    /// Defaults match the hardware preset: 0.5 Hz rate, full depth, 100%
    /// wet, bypass off.
    ///
    /// # Errors
    ///
    /// Returns [`ChorusError::DelayLineTooShort`] if `storage` holds fewer
    /// than [`MIN_DELAY_SAMPLES`](Self::MIN_DELAY_SAMPLES) samples.
    pub fn new(storage: &'a mut [i16]) -> Result<Self, ChorusError> {
        if storage.len() < Self::MIN_DELAY_SAMPLES {
            return Err(ChorusError::DelayLineTooShort {
                required: Self::MIN_DELAY_SAMPLES,
                len: storage.len(),
            });
        }

        Ok(Self {
            delay: DelayLine::new(storage),
            lfo: QuadratureLfo::new(SAMPLE_RATE_HZ, 0.5),
            rate: 0.5,
            depth: 1.0,
            mix: 1.0,
            bypass: false,
        })
    }

    /// Sets the LFO rate, clamped to 0.1–5.0 Hz.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = rate_hz.clamp(Self::MIN_RATE_HZ, Self::MAX_RATE_HZ);
        self.lfo.set_rate(self.rate);
    }

    /// Sets the modulation depth, clamped to `[0, 1]`.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    /// Sets the wet/dry mix, clamped to `[0, 1]`.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Enables or disables bypass.
    ///
    /// While bypassed, blocks pass through untouched and no internal state
    /// moves — the delay line and LFO freeze where they are.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// Current LFO rate in Hz, after clamping.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Current modulation depth, after clamping.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Current wet/dry mix, after clamping.
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Whether the engine is bypassed.
    pub fn bypass(&self) -> bool {
        self.bypass
    }

    /// Length of the delay line in samples, for diagnostics/UI.
    pub fn delay_len(&self) -> usize {
        self.delay.len()
    }

    fn process_samples(&mut self, block: &mut AudioBlock) {
        // Mix gains are fixed for the whole block.
        let wet256 = q8_gain(self.mix);
        let dry256 = 256 - wet256;

        for sample in block.iter_mut() {
            let input = *sample;

            // One write feeds both taps.
            self.delay.write(input);

            let [tri_a, tri_b] = self.lfo.triangle_pair();
            let delay_a = (Self::BASE_DELAY + tri_a * self.depth * Self::MOD_RANGE)
                .clamp(Self::MIN_TAP, Self::MAX_TAP);
            let delay_b = (Self::BASE_DELAY + tri_b * self.depth * Self::MOD_RANGE)
                .clamp(Self::MIN_TAP, Self::MAX_TAP);

            let tap_a = self.delay.read_interpolated(delay_a);
            let tap_b = self.delay.read_interpolated(delay_b);

            // Two taps averaged into one thick mono voice. The truncating
            // cast matches the legacy integer pipeline.
            let wet = ((tap_a + tap_b) * 0.5) as i32;

            *sample = mix_q8(input, wet, wet256, dry256);

            self.lfo.advance();
        }
    }
}

impl BlockEffect for BbdChorus<'_> {
    fn process_block(&mut self, block: Option<&mut AudioBlock>) {
        if self.bypass {
            return;
        }

        match block {
            Some(block) => self.process_samples(block),
            None => {
                // No upstream audio: run a silent block through so the
                // delay line and LFO keep moving, then drop the result.
                let mut silent: AudioBlock = [0; BLOCK_SAMPLES];
                self.process_samples(&mut silent);
            }
        }
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.lfo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_block(amplitude: i16) -> AudioBlock {
        let mut block: AudioBlock = [0; BLOCK_SAMPLES];
        block[0] = amplitude;
        block
    }

    #[test]
    fn test_too_short_storage_rejected() {
        let mut storage = [0i16; 9];
        let err = BbdChorus::new(&mut storage).unwrap_err();
        assert_eq!(
            err,
            ChorusError::DelayLineTooShort {
                required: 10,
                len: 9
            }
        );
    }

    #[test]
    fn test_minimum_storage_accepted() {
        let mut storage = [0i16; 10];
        assert!(BbdChorus::new(&mut storage).is_ok());
    }

    #[test]
    fn test_impulse_reappears_at_base_delay() {
        let mut storage = vec![0i16; 512];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();
        chorus.set_depth(0.0); // pin both taps to the 132-sample center
        chorus.set_mix(1.0);

        let mut output = Vec::new();
        let mut block = impulse_block(10_000);
        chorus.process_block(Some(&mut block));
        output.extend_from_slice(&block);
        let mut block: AudioBlock = [0; BLOCK_SAMPLES];
        chorus.process_block(Some(&mut block));
        output.extend_from_slice(&block);

        // Both taps read the same integer position, so the impulse comes
        // back whole, exactly 132 samples late.
        assert_eq!(output[132], 10_000);
        for (i, &s) in output.iter().enumerate() {
            if i != 132 {
                assert_eq!(s, 0, "unexpected energy at sample {i}");
            }
        }
    }

    #[test]
    fn test_mix_zero_is_exact_passthrough_with_live_state() {
        let mut storage = vec![0i16; 512];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();
        chorus.set_mix(0.0);

        let mut block: AudioBlock = core::array::from_fn(|i| (i as i16).wrapping_mul(251));
        let expected = block;
        chorus.process_block(Some(&mut block));
        assert_eq!(block, expected);
    }

    #[test]
    fn test_setters_clamp() {
        let mut storage = vec![0i16; 64];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();

        chorus.set_rate(99.0);
        assert_eq!(chorus.rate(), 5.0);
        chorus.set_rate(0.0);
        assert_eq!(chorus.rate(), 0.1);

        chorus.set_depth(2.0);
        assert_eq!(chorus.depth(), 1.0);
        chorus.set_depth(-1.0);
        assert_eq!(chorus.depth(), 0.0);

        chorus.set_mix(1.5);
        assert_eq!(chorus.mix(), 1.0);
        chorus.set_mix(-0.5);
        assert_eq!(chorus.mix(), 0.0);
    }

    #[test]
    fn test_bypass_leaves_block_and_state_untouched() {
        let mut storage = vec![0i16; 512];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();
        chorus.set_bypass(true);

        let mut block = impulse_block(20_000);
        let expected = block;
        chorus.process_block(Some(&mut block));
        assert_eq!(block, expected);

        // Nothing may have reached the delay line: unbypass, feed silence,
        // and confirm nothing delayed comes back out.
        chorus.set_bypass(false);
        chorus.set_mix(1.0);
        for _ in 0..4 {
            let mut silent: AudioBlock = [0; BLOCK_SAMPLES];
            chorus.process_block(Some(&mut silent));
            assert!(silent.iter().all(|&s| s == 0));
        }
    }

    #[test]
    fn test_missing_block_advances_state() {
        let mut storage = vec![0i16; 512];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();
        chorus.set_depth(0.0);
        chorus.set_mix(1.0);

        let mut block = impulse_block(10_000);
        chorus.process_block(Some(&mut block));

        // The delayed impulse lands at sample 132, inside the second
        // block — which never arrives. Its audio is discarded, but the
        // write head must still move, so the third block is clean silence
        // rather than a late replay.
        chorus.process_block(None);

        let mut third: AudioBlock = [0; BLOCK_SAMPLES];
        chorus.process_block(Some(&mut third));
        assert!(third.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_reset_clears_audio_but_keeps_parameters() {
        let mut storage = vec![0i16; 512];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();
        chorus.set_rate(2.0);
        chorus.set_mix(0.7);

        let mut block = impulse_block(10_000);
        chorus.process_block(Some(&mut block));
        chorus.reset();

        assert_eq!(chorus.rate(), 2.0);
        assert_eq!(chorus.mix(), 0.7);

        let mut silent: AudioBlock = [0; BLOCK_SAMPLES];
        chorus.process_block(Some(&mut silent));
        assert!(silent.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_delay_len_reports_storage() {
        let mut storage = vec![0i16; 300];
        let chorus = BbdChorus::new(&mut storage).unwrap();
        assert_eq!(chorus.delay_len(), 300);
    }
}
