//! Construction-time errors for the chorus engines.

/// Errors reported when building a chorus engine.
///
/// Construction is the only fallible operation; once an engine exists, every
/// parameter setter clamps silently and processing never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChorusError {
    /// The caller-supplied delay storage is shorter than the engine's
    /// minimum viable length.
    #[error("delay line too short: need at least {required} samples, got {len}")]
    DelayLineTooShort {
        /// Minimum number of samples the engine requires.
        required: usize,
        /// Length of the storage that was supplied.
        len: usize,
    },
}
