//! Shared LFO phase latch for stereo engine pairs.
//!
//! The two channels of an [`EnsembleChorus`](crate::EnsembleChorus) pair are
//! independent objects, invoked in whatever order the surrounding pipeline
//! happens to call them each block. Both must modulate from the same LFO
//! phase, and that phase must advance by exactly one block's worth of
//! increments per block — not two. The latch arbitrates this: the first
//! channel to start a block snapshots the committed phase, both run their
//! per-sample loops on local copies, the primary channel publishes its final
//! phase, and the second channel to finish commits it.
//!
//! The latch is an explicit shared handle injected into both constructors,
//! so a pair of engines is self-contained: multiple stereo pairs coexist by
//! giving each pair its own latch. `Rc<PhaseLatch>` is `!Send + !Sync`,
//! which pins the whole arrangement to the single-threaded audio callback
//! it was designed for; a multi-threaded port would need a mutex here.

use core::cell::Cell;

use coro_core::wrap_phase01;

/// Block-synchronization state shared by one stereo pair of chorus engines.
///
/// Phases are normalized cycle positions in `[0, 1)`.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use coro_effects::PhaseLatch;
///
/// let latch = Rc::new(PhaseLatch::new());
/// latch.set_phase(0.25);
/// assert_eq!(latch.phase(), 0.25);
/// ```
#[derive(Debug, Default)]
pub struct PhaseLatch {
    /// Committed phase carried between blocks.
    phase: Cell<f32>,
    /// Snapshot taken by the first channel to start the current block.
    block_start: Cell<f32>,
    /// Final phase published by the primary channel.
    block_end: Cell<f32>,
    /// Number of channels that have finished the current block.
    finished: Cell<u8>,
    /// Whether a block is currently in flight.
    armed: Cell<bool>,
    /// Whether `block_end` holds a value for this block.
    end_ready: Cell<bool>,
}

impl PhaseLatch {
    /// Creates a latch with phase zero and no block in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the committed phase, wrapping into `[0, 1)`.
    ///
    /// Escape hatch for aligning a chorus pair with other modulated
    /// effects. Takes effect at the next block boundary.
    pub fn set_phase(&self, phase01: f32) {
        self.phase.set(wrap_phase01(phase01));
    }

    /// The committed phase, in cycles.
    pub fn phase(&self) -> f32 {
        self.phase.get()
    }

    /// Marks the start of a channel's block and returns the phase to run
    /// the block from.
    ///
    /// The first caller of a block arms the latch and snapshots the
    /// committed phase; the second caller sees the same snapshot.
    pub(crate) fn begin_block(&self) -> f32 {
        if !self.armed.get() {
            self.block_start.set(self.phase.get());
            self.armed.set(true);
            self.finished.set(0);
            self.end_ready.set(false);
        }
        self.block_start.get()
    }

    /// Publishes the primary channel's end-of-block phase.
    pub(crate) fn publish_end(&self, phase01: f32) {
        self.block_end.set(phase01);
        self.end_ready.set(true);
    }

    /// Records that a channel finished its block.
    ///
    /// When both channels have finished, the published end phase (if any)
    /// is committed and the latch disarms for the next block.
    pub(crate) fn finish_block(&self) {
        let finished = self.finished.get() + 1;
        self.finished.set(finished);
        if finished >= 2 {
            if self.end_ready.get() {
                self.phase.set(self.block_end.get());
            }
            self.armed.set(false);
            self.finished.set(0);
            self.end_ready.set(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_phase_wraps() {
        let latch = PhaseLatch::new();
        latch.set_phase(1.75);
        assert!((latch.phase() - 0.75).abs() < 1e-6);
        latch.set_phase(-0.25);
        assert!((latch.phase() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_both_channels_see_same_snapshot() {
        let latch = PhaseLatch::new();
        latch.set_phase(0.3);

        let first = latch.begin_block();
        let second = latch.begin_block();
        assert_eq!(first, 0.3);
        assert_eq!(second, 0.3);
    }

    #[test]
    fn test_commit_requires_both_finishers() {
        let latch = PhaseLatch::new();
        let start = latch.begin_block();
        latch.publish_end(start + 0.1);
        latch.finish_block();
        // Only one channel has finished: nothing committed yet.
        assert_eq!(latch.phase(), start);
        latch.finish_block();
        assert!((latch.phase() - (start + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_phase_advances_once_per_block_either_order() {
        let inc = 0.5 / 44_100.0;
        let block = 128;

        // Simulate N blocks where the "channels" alternate which one
        // begins first; the committed phase must advance exactly once
        // per block either way.
        for swap in [false, true] {
            let latch = PhaseLatch::new();
            let blocks = 100;
            for b in 0..blocks {
                let order_swapped = swap && b % 2 == 1;

                let start = latch.begin_block();
                let mut local_primary = start;
                for _ in 0..block {
                    local_primary = wrap_phase01(local_primary + inc);
                }

                if order_swapped {
                    latch.finish_block();
                    latch.publish_end(local_primary);
                    latch.finish_block();
                } else {
                    latch.publish_end(local_primary);
                    latch.finish_block();
                    latch.finish_block();
                }
            }

            let expected = wrap_phase01(blocks as f32 * block as f32 * inc);
            assert!(
                (latch.phase() - expected).abs() < 1e-3,
                "swap={swap}: got {}, expected {expected}",
                latch.phase()
            );
        }
    }

    #[test]
    fn test_missing_publish_stalls_phase() {
        // If the primary never publishes (e.g. it is bypassed), the phase
        // must not move at all.
        let latch = PhaseLatch::new();
        latch.set_phase(0.4);
        latch.begin_block();
        latch.finish_block();
        latch.finish_block();
        assert_eq!(latch.phase(), 0.4);
    }
}
