//! Reverb run configuration and delay-line sizing.
//!
//! All values are fixed for the lifetime of a pipeline. Delay times are given
//! in milliseconds and converted to samples once, at construction, from the
//! stream's sample rate.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::{Endianness, MAX_CAPACITY, OverflowPolicy, ReverbError};

/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 768_000;

/// Minimum number of delay lengths each line must retain.
pub const HISTORY_FACTOR: usize = 5;

/// Converts a delay in milliseconds to whole samples at `sample_rate`.
///
/// Rounds to the nearest sample. Fails for non-finite or non-positive delays
/// and for delays that round to zero samples.
pub fn delay_samples(delay_ms: f32, sample_rate: u32) -> Result<usize, ReverbError> {
    if !delay_ms.is_finite() || delay_ms <= 0.0 {
        return Err(ReverbError::InvalidDelay(delay_ms));
    }

    let samples = libm::round(f64::from(delay_ms) * f64::from(sample_rate) / 1000.0);
    if samples < 1.0 || samples > MAX_CAPACITY as f64 {
        return Err(ReverbError::InvalidDelay(delay_ms));
    }
    Ok(samples as usize)
}

/// Schroeder reverberator configuration.
///
/// The default is the reference configuration: four comb taps, four all-pass
/// stages, 32 ms delay, unity comb feed-forward with a total comb loop gain
/// of 0.8, and 0.5 all-pass gains.
///
/// # Example
///
/// ```rust
/// use cverb_core::ReverbConfig;
///
/// let config = ReverbConfig {
///     delay_ms: 600.0,
///     ..ReverbConfig::default()
/// };
/// assert_eq!(config.comb_delay_samples(8000).unwrap(), 4800);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReverbConfig {
    /// Number of feedback taps in the comb bank (N).
    pub comb_count: usize,
    /// Number of all-pass stages in series (M).
    pub allpass_count: usize,
    /// Comb feed-forward gain applied to the dry input.
    pub comb_feedforward: f32,
    /// Comb feedback gain applied to each tap.
    pub comb_feedback: f32,
    /// All-pass feed-forward gain.
    pub allpass_feedforward: f32,
    /// All-pass feedback gain.
    pub allpass_feedback: f32,
    /// Comb delay, and default all-pass delay, in milliseconds.
    pub delay_ms: f32,
    /// Per-stage all-pass delays in milliseconds. Empty means `delay_ms` for every stage.
    pub allpass_delays_ms: Vec<f32>,
    /// Extra slots added to every delay line.
    pub margin_samples: usize,
    /// Staging buffer size in 16-bit frames.
    pub staging_slots: usize,
    /// Out-of-range policy for emitted samples.
    pub overflow: OverflowPolicy,
    /// Byte order of input and output frames.
    pub endianness: Endianness,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            comb_count: 4,
            allpass_count: 4,
            comb_feedforward: 1.0,
            comb_feedback: 0.2,
            allpass_feedforward: 0.5,
            allpass_feedback: 0.5,
            delay_ms: 32.0,
            allpass_delays_ms: Vec::new(),
            margin_samples: 50,
            staging_slots: 6,
            overflow: OverflowPolicy::Saturate,
            endianness: Endianness::Little,
        }
    }
}

impl ReverbConfig {
    /// Checks the fields that do not depend on the sample rate.
    pub fn validate(&self) -> Result<(), ReverbError> {
        if self.comb_count == 0 {
            return Err(ReverbError::InvalidConfig("comb_count must be at least 1"));
        }
        if self.staging_slots == 0 {
            return Err(ReverbError::InvalidConfig(
                "staging_slots must be at least 1",
            ));
        }
        let gains = [
            self.comb_feedforward,
            self.comb_feedback,
            self.allpass_feedforward,
            self.allpass_feedback,
        ];
        if gains.iter().any(|g| !g.is_finite()) {
            return Err(ReverbError::InvalidConfig("gains must be finite"));
        }
        if !self.allpass_delays_ms.is_empty() && self.allpass_delays_ms.len() != self.allpass_count
        {
            return Err(ReverbError::InvalidConfig(
                "allpass_delays_ms must be empty or have allpass_count entries",
            ));
        }
        Ok(())
    }

    /// Comb delay in samples at `sample_rate`.
    pub fn comb_delay_samples(&self, sample_rate: u32) -> Result<usize, ReverbError> {
        check_sample_rate(sample_rate)?;
        delay_samples(self.delay_ms, sample_rate)
    }

    /// Delay in samples for each all-pass stage at `sample_rate`.
    pub fn allpass_delay_samples(&self, sample_rate: u32) -> Result<Vec<usize>, ReverbError> {
        check_sample_rate(sample_rate)?;
        if self.allpass_delays_ms.is_empty() {
            let d = delay_samples(self.delay_ms, sample_rate)?;
            return Ok(vec![d; self.allpass_count]);
        }
        self.allpass_delays_ms
            .iter()
            .map(|&ms| delay_samples(ms, sample_rate))
            .collect()
    }

    /// Capacity shared by every delay line of a pipeline at `sample_rate`.
    ///
    /// `max(HISTORY_FACTOR, comb_count + 1) × longest delay + margin`, so the
    /// deepest comb tap never aliases.
    pub fn history_capacity(&self, sample_rate: u32) -> Result<usize, ReverbError> {
        self.validate()?;
        let longest = self
            .allpass_delay_samples(sample_rate)?
            .into_iter()
            .fold(self.comb_delay_samples(sample_rate)?, usize::max);

        let factor = HISTORY_FACTOR.max(self.comb_count.saturating_add(1));
        let capacity = factor
            .checked_mul(longest)
            .and_then(|n| n.checked_add(self.margin_samples))
            .ok_or(ReverbError::InvalidCapacity(usize::MAX))?;

        if capacity > MAX_CAPACITY {
            return Err(ReverbError::InvalidCapacity(capacity));
        }
        Ok(capacity)
    }
}

fn check_sample_rate(sample_rate: u32) -> Result<(), ReverbError> {
    if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
        return Err(ReverbError::InvalidSampleRate(sample_rate));
    }
    Ok(())
}
