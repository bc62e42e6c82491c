//! Coro Effects - Analog-modeled chorus engines
//!
//! Two chorus voicings built on the `coro-core` primitives:
//!
//! - [`BbdChorus`] - BBD-style chorus with two quadrature taps averaged
//!   into one thick voice, adjustable rate/depth/mix
//! - [`EnsembleChorus`] - multi-mode, 100%-wet stereo chorus whose left
//!   and right instances share one LFO phase through a [`PhaseLatch`]
//!
//! Both engines process fixed-size 16-bit PCM blocks over caller-supplied
//! delay storage, never allocate after construction, and clamp every
//! parameter silently — construction is the only fallible operation.
//!
//! ## Example
//!
//! ```rust
//! use coro_core::{AudioBlock, BLOCK_SAMPLES, BlockEffect};
//! use coro_effects::BbdChorus;
//!
//! let mut storage = vec![0i16; 512];
//! let mut chorus = BbdChorus::new(&mut storage).unwrap();
//! chorus.set_rate(0.8);
//! chorus.set_mix(0.5);
//!
//! let mut block: AudioBlock = [0; BLOCK_SAMPLES];
//! chorus.process_block(Some(&mut block));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bbd;
pub mod ensemble;
pub mod error;
pub mod latch;

// Re-export main types at crate root
pub use bbd::BbdChorus;
pub use ensemble::{ChorusMode, EnsembleChorus, StereoChannel};
pub use error::ChorusError;
pub use latch::PhaseLatch;
