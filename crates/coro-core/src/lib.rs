//! Coro Core - DSP primitives for the coro chorus engines
//!
//! Building blocks for real-time, fixed-rate audio processing on 16-bit PCM
//! blocks: a circular delay line with fractional reads, triangle/composite
//! LFO waveforms, a one-pole smoothing filter, and the integer mix/saturation
//! arithmetic the engines share.
//!
//! Everything here is written for a hard real-time audio callback: no heap
//! allocation after setup, no blocking, bounded per-sample work. Delay
//! storage is borrowed from the caller so embedded targets can hand in
//! static buffers.
//!
//! # Fixed operating point
//!
//! The pipeline runs at one sample rate ([`SAMPLE_RATE_HZ`]) and one block
//! size ([`BLOCK_SAMPLES`]). Primitives take an explicit sample rate so they
//! stay reusable, but the engines built on top pin it to the constant.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! coro-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod block;
pub mod delay;
pub mod lfo;
pub mod math;
pub mod one_pole;

// Re-export main types at crate root
pub use block::{AudioBlock, BLOCK_SAMPLES, BlockEffect, SAMPLE_RATE_HZ};
pub use delay::DelayLine;
pub use lfo::{QuadratureLfo, beating_triangle, triangle_bipolar, triangle_unipolar, wrap_phase01};
pub use math::{clamp_i16, flush_denormal, mix_q8, q8_gain, soft_knee};
pub use one_pole::OnePole;
