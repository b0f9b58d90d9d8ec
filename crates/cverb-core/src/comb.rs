//! Parallel feedback comb bank.
//!
//! N feedback combs share one input line and one output line. Comb `i` taps
//! the output line `i × d` samples back, so the bank computes
//!
//! ```text
//! y[n] = FF · x[n] + FB · Σ_{i=1..=N} y[n − i·d]
//! ```
//!
//! The bank is a pure function of the two lines: writing `y[n]` into the
//! output line and advancing heads is left to the caller, so every stage of
//! the pipeline sees the same head position within one sample.

use crate::DelayLine;

/// Bank of N parallel feedback combs with shared delay lines.
///
/// # Example
///
/// ```rust
/// use cverb_core::{CombBank, DelayLine};
///
/// let bank = CombBank::new(1, 1.0, 0.5, 3);
/// let mut input = DelayLine::new(16).unwrap();
/// let mut output = DelayLine::new(16).unwrap();
///
/// let mut response = Vec::new();
/// for n in 0..7 {
///     input.write(if n == 0 { 1.0 } else { 0.0 });
///     let y = bank.process(&input, &output);
///     output.write(y);
///     response.push(y);
///     input.advance();
///     output.advance();
/// }
/// assert_eq!(response, [1.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombBank {
    count: usize,
    feedforward: f32,
    feedback: f32,
    delay_samples: usize,
}

impl CombBank {
    /// Creates a bank of `count` combs spaced `delay_samples` apart.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of feedback taps (N)
    /// * `feedforward` - Gain on the current input sample
    /// * `feedback` - Gain on every tap
    /// * `delay_samples` - Tap spacing in samples
    pub fn new(count: usize, feedforward: f32, feedback: f32, delay_samples: usize) -> Self {
        Self {
            count,
            feedforward,
            feedback,
            delay_samples,
        }
    }

    /// Computes the bank output for the sample at `input`'s head.
    ///
    /// Taps are read relative to `output`'s head; the slot at the head itself
    /// has not been written for this sample yet.
    #[inline]
    pub fn process(&self, input: &DelayLine, output: &DelayLine) -> f32 {
        let mut y = self.feedforward * input.read();
        for i in 1..=self.count {
            y += self.feedback * output.read_at_offset(i * self.delay_samples);
        }
        y
    }

    /// Number of taps (N).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Tap spacing in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Feed-forward gain.
    pub fn feedforward(&self) -> f32 {
        self.feedforward
    }

    /// Per-tap feedback gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }
}
