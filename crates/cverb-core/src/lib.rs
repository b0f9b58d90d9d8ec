//! cverb Core - Schroeder reverberator DSP
//!
//! This crate provides the signal-processing core of cverb: a per-sample
//! Schroeder reverb for mono 16-bit PCM, built from fixed-capacity delay lines
//! with wraparound addressing.
//!
//! # Building Blocks
//!
//! - [`DelayLine`] - Circular `f32` buffer with a single read/write head
//! - [`StagingBuffer`] - Small byte ring that stages each raw input frame
//! - [`CombBank`] - N parallel feedback combs sharing one input and one output line
//! - [`AllpassStage`] / [`AllpassChain`] - M all-pass stages in series
//! - [`Reverb`] - The orchestrator: ingest → comb → all-pass → mix → emit
//!
//! ## Boundary Conversion
//!
//! - [`sample::decode`] / [`sample::encode`] - 2-byte frames with explicit [`Endianness`]
//! - [`sample::quantize`] - float to `i16` under an [`OverflowPolicy`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc`). Disable the default `std`
//! feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cverb-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cverb_core::{Reverb, ReverbConfig};
//!
//! let config = ReverbConfig::default();
//! let mut reverb = Reverb::new(&config, 44100)?;
//!
//! let input: Vec<i16> = vec![0, 12000, -8000, 0];
//! let output: Vec<i16> = input
//!     .iter()
//!     .map(|s| reverb.process_frame(s.to_le_bytes()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(output.len(), input.len());
//! # Ok::<(), cverb_core::ReverbError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Owned state**: each [`Reverb`] owns all of its lines; independent
//!   pipelines can run on separate threads with no coordination
//! - **No allocation per sample**: every buffer is sized once at construction
//! - **Explicit numeric contract**: out-of-range output follows a chosen policy

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod config;
pub mod delay;
pub mod error;
pub mod pipeline;
pub mod sample;
pub mod staging;

// Re-export main types at crate root
pub use allpass::{AllpassChain, AllpassStage};
pub use comb::CombBank;
pub use config::{HISTORY_FACTOR, MAX_SAMPLE_RATE, ReverbConfig, delay_samples};
pub use delay::{DelayLine, MAX_CAPACITY, wrap_index};
pub use error::ReverbError;
pub use pipeline::Reverb;
pub use sample::{Endianness, OverflowPolicy, SAMPLE_MAX, SAMPLE_MIN};
pub use staging::{BYTES_PER_SAMPLE, StagingBuffer};
