//! Per-sample Schroeder reverb pipeline.
//!
//! [`Reverb`] owns every delay line and the staging buffer for one stream and
//! runs each frame through the same fixed sequence:
//!
//! ```text
//! Ingest ─→ CombProcess ─→ AllPassProcess(1..M) ─→ Mix ─→ Emit ─→ AdvanceHeads
//!   │            │                  │                │
//!   │            └─ comb line ──────┘                │
//!   └─ input line                   └─ stage lines ──┘
//! ```
//!
//! All reads and writes for a sample happen before any head moves, so every
//! stage sees a consistent view of the lines it shares.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use crate::sample::{self, Endianness, OverflowPolicy};
use crate::{
    AllpassChain, AllpassStage, CombBank, DelayLine, ReverbConfig, ReverbError, StagingBuffer,
};

/// Schroeder reverberator for one mono 16-bit stream.
///
/// # Example
///
/// ```rust
/// use cverb_core::{Reverb, ReverbConfig};
///
/// let mut reverb = Reverb::new(&ReverbConfig::default(), 8000).unwrap();
///
/// // An impulse passes the dry comb path and the four all-pass stages at once.
/// let first = reverb.process_frame([0x10, 0x27]).unwrap(); // 10000, little-endian
/// assert_eq!(first, 6875);
/// assert_eq!(reverb.process_frame([0, 0]).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    staging: StagingBuffer,
    input: DelayLine,
    comb_line: DelayLine,
    comb: CombBank,
    allpass: AllpassChain,
    overflow: OverflowPolicy,
    endianness: Endianness,
    sample_rate: u32,
    frames: u64,
    clipped: u64,
}

impl Reverb {
    /// Builds a pipeline for `config` at `sample_rate`.
    ///
    /// Every delay line gets [`ReverbConfig::history_capacity`] slots. Fails
    /// before allocating anything if the configuration or sample rate is invalid.
    pub fn new(config: &ReverbConfig, sample_rate: u32) -> Result<Self, ReverbError> {
        let capacity = config.history_capacity(sample_rate)?;
        let comb_delay = config.comb_delay_samples(sample_rate)?;
        let stages: Vec<AllpassStage> = config
            .allpass_delay_samples(sample_rate)?
            .into_iter()
            .map(|d| AllpassStage::new(config.allpass_feedforward, config.allpass_feedback, d))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            capacity,
            comb_delay,
            combs = config.comb_count,
            allpasses = stages.len(),
            "reverb pipeline sized"
        );

        Ok(Self {
            staging: StagingBuffer::with_slots(config.staging_slots)?,
            input: DelayLine::new(capacity)?,
            comb_line: DelayLine::new(capacity)?,
            comb: CombBank::new(
                config.comb_count,
                config.comb_feedforward,
                config.comb_feedback,
                comb_delay,
            ),
            allpass: AllpassChain::new(&stages, capacity)?,
            overflow: config.overflow,
            endianness: config.endianness,
            sample_rate,
            frames: 0,
            clipped: 0,
        })
    }

    /// Passes one raw frame through the staging buffer and decodes it.
    pub fn ingest(&mut self, frame: [u8; 2]) -> Result<f32, ReverbError> {
        for byte in frame {
            self.staging.put(byte)?;
        }
        let mut staged = [0u8; 2];
        for slot in &mut staged {
            *slot = self.staging.get().ok_or(ReverbError::StagingOverflow)?;
        }
        Ok(sample::to_float(sample::decode(staged, self.endianness)))
    }

    /// Filters one sample and returns the unquantized mix.
    ///
    /// Writes `x` to the input line, runs the comb bank and the all-pass chain,
    /// mixes `comb_out + Σ stage outputs`, then advances every head once.
    pub fn process_sample(&mut self, x: f32) -> f32 {
        self.input.write(x);

        let comb_out = self.comb.process(&self.input, &self.comb_line);
        self.comb_line.write(comb_out);

        let diffused = self.allpass.process(&self.comb_line);
        let mix = comb_out + diffused;

        self.input.advance();
        self.comb_line.advance();
        self.allpass.advance();
        self.frames += 1;

        mix
    }

    /// Quantizes a mixed sample under the configured overflow policy.
    pub fn emit(&mut self, mix: f32) -> Result<i16, ReverbError> {
        if !sample::in_range(mix) {
            self.clipped += 1;
            #[cfg(feature = "tracing")]
            tracing::warn!(
                frame = self.frames,
                value = mix,
                policy = ?self.overflow,
                "sample out of 16-bit range"
            );
        }
        sample::quantize(mix, self.overflow)
    }

    /// Runs one raw frame end to end: ingest, filter, mix, emit.
    pub fn process_frame(&mut self, frame: [u8; 2]) -> Result<i16, ReverbError> {
        let x = self.ingest(frame)?;
        let mix = self.process_sample(x);
        self.emit(mix)
    }

    /// Like [`process_frame`](Self::process_frame), returning encoded output bytes.
    pub fn process_frame_bytes(&mut self, frame: [u8; 2]) -> Result<[u8; 2], ReverbError> {
        let out = self.process_frame(frame)?;
        Ok(sample::encode(out, self.endianness))
    }

    /// Zeroes all delay lines and counters.
    pub fn reset(&mut self) {
        self.staging.clear();
        self.input.clear();
        self.comb_line.clear();
        self.allpass.clear();
        self.frames = 0;
        self.clipped = 0;
    }

    /// Sample rate the pipeline was sized for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Capacity of every delay line.
    pub fn capacity(&self) -> usize {
        self.input.capacity()
    }

    /// Comb bank parameters.
    pub fn comb(&self) -> &CombBank {
        &self.comb
    }

    /// All-pass chain.
    pub fn allpass(&self) -> &AllpassChain {
        &self.allpass
    }

    /// Frame byte order.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Samples processed since construction or the last reset.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Emitted samples that fell outside the 16-bit range.
    pub fn clipped_samples(&self) -> u64 {
        self.clipped
    }
}
