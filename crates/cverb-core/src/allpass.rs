//! Schroeder all-pass chain for echo diffusion.
//!
//! Each stage computes
//!
//! ```text
//! y[n] = −FF · x[n] + x[n − d] + FB · y[n − d]
//! ```
//!
//! where `x` is the previous stage's output line and `y` the stage's own line.
//! With `FF == FB` the magnitude response is flat and only the phase depends
//! on frequency. Stages run strictly in order within one sample: stage `i`
//! writes its line before stage `i + 1` reads it as input.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use crate::{DelayLine, ReverbError};

/// Gains and delay of one all-pass stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllpassStage {
    feedforward: f32,
    feedback: f32,
    delay_samples: usize,
}

impl AllpassStage {
    /// Creates a stage with the given gains and delay in samples.
    pub fn new(feedforward: f32, feedback: f32, delay_samples: usize) -> Self {
        Self {
            feedforward,
            feedback,
            delay_samples,
        }
    }

    /// Computes this stage's output for the current sample.
    ///
    /// `input`'s head holds the current input sample. `output`'s head has not
    /// been written for this sample yet.
    #[inline]
    pub fn process(&self, input: &DelayLine, output: &DelayLine) -> f32 {
        let d = self.delay_samples;
        (-self.feedforward) * input.read()
            + input.read_at_offset(d)
            + self.feedback * output.read_at_offset(d)
    }

    /// Delay in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Feed-forward gain.
    pub fn feedforward(&self) -> f32 {
        self.feedforward
    }

    /// Feedback gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }
}

/// M all-pass stages in series, each owning its output line.
///
/// # Example
///
/// ```rust
/// use cverb_core::{AllpassChain, AllpassStage, DelayLine};
///
/// let stages = [AllpassStage::new(0.5, 0.5, 4); 2];
/// let mut chain = AllpassChain::new(&stages, 32).unwrap();
/// let mut input = DelayLine::new(32).unwrap();
///
/// input.write(1.0);
/// let sum = chain.process(&input);
/// // Stage 1 emits -0.5, stage 2 emits 0.25.
/// assert_eq!(chain.stage_output(0), -0.5);
/// assert_eq!(chain.stage_output(1), 0.25);
/// assert_eq!(sum, -0.25);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassChain {
    stages: Vec<AllpassStage>,
    lines: Vec<DelayLine>,
}

impl AllpassChain {
    /// Creates a chain from `stages`, giving each a `capacity`-slot output line.
    pub fn new(stages: &[AllpassStage], capacity: usize) -> Result<Self, ReverbError> {
        let lines = stages
            .iter()
            .map(|_| DelayLine::new(capacity))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            stages: stages.to_vec(),
            lines,
        })
    }

    /// Runs every stage for the current sample and returns the sum of their outputs.
    ///
    /// Stage 0 reads `input`; stage `i` reads stage `i − 1`'s line. Each result
    /// is written at its line's head before the next stage runs. Heads are not
    /// advanced here.
    pub fn process(&mut self, input: &DelayLine) -> f32 {
        let mut sum = 0.0;
        for i in 0..self.stages.len() {
            let (upstream, rest) = self.lines.split_at_mut(i);
            let source = upstream.last().unwrap_or(input);
            let line = &mut rest[0];
            let y = self.stages[i].process(source, line);
            line.write(y);
            sum += y;
        }
        sum
    }

    /// Advances every stage line by one sample.
    pub fn advance(&mut self) {
        for line in &mut self.lines {
            line.advance();
        }
    }

    /// Value most recently written by stage `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn stage_output(&self, index: usize) -> f32 {
        self.lines[index].read()
    }

    /// Stage parameters in chain order.
    pub fn stages(&self) -> &[AllpassStage] {
        &self.stages
    }

    /// Number of stages (M).
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` for an empty chain.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Zeroes every stage line.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }
}
