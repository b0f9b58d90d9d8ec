//! Fixed-capacity delay line shared by every filter stage.
//!
//! A [`DelayLine`] is a circular buffer of `f32` samples with a single head.
//! Writing and advancing are separate operations so that several stages can
//! read the "current" sample of a line before any of them moves it on:
//!
//! ```text
//! per sample:  write(x) ─→ read()/read_at_offset(k) from any stage ─→ advance()
//! ```
//!
//! Offsets are always reduced with full modulo arithmetic, so any
//! delay/capacity ratio is safe to read (the result simply aliases once the
//! offset reaches the capacity).

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::ReverbError;

/// Upper bound on delay-line capacity in samples (64 MiB of `f32`).
pub const MAX_CAPACITY: usize = 1 << 24;

/// Index `offset` positions behind `head` in a ring of `capacity` slots.
///
/// Equivalent to `((head - offset) % capacity + capacity) % capacity` for
/// signed integers, evaluated without leaving `usize`.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[inline]
pub fn wrap_index(head: usize, offset: usize, capacity: usize) -> usize {
    (head % capacity + capacity - offset % capacity) % capacity
}

/// Circular buffer of samples with a single read/write head.
///
/// `samples[head]` always holds the most recently written value for the
/// current sample period; [`advance`](Self::advance) moves on to the slot that
/// will be overwritten next.
///
/// # Example
///
/// ```rust
/// use cverb_core::DelayLine;
///
/// let mut line = DelayLine::new(8).unwrap();
/// for x in [1.0, 2.0, 3.0] {
///     line.write(x);
///     line.advance();
/// }
/// line.write(4.0);
/// assert_eq!(line.read(), 4.0);
/// assert_eq!(line.read_at_offset(3), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    samples: Vec<f32>,
    head: usize,
}

impl DelayLine {
    /// Creates a zeroed delay line with `capacity` slots and the head at 0.
    ///
    /// Fails with [`ReverbError::InvalidCapacity`] if `capacity` is zero or
    /// exceeds [`MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self, ReverbError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(ReverbError::InvalidCapacity(capacity));
        }

        Ok(Self {
            samples: vec![0.0; capacity],
            head: 0,
        })
    }

    /// Stores `value` at the head. The head does not move.
    #[inline]
    pub fn write(&mut self, value: f32) {
        self.samples[self.head] = value;
    }

    /// Returns the sample at the head.
    #[inline]
    pub fn read(&self) -> f32 {
        self.samples[self.head]
    }

    /// Returns the sample `k` positions behind the head, wrapping modulo capacity.
    #[inline]
    pub fn read_at_offset(&self, k: usize) -> f32 {
        self.samples[wrap_index(self.head, k, self.samples.len())]
    }

    /// Moves the head forward one slot, wrapping to 0 at the capacity.
    #[inline]
    pub fn advance(&mut self) {
        self.head += 1;
        if self.head == self.samples.len() {
            self.head = 0;
        }
    }

    /// Current head position.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of slots in the line.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Zeroes every slot and returns the head to 0.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.head = 0;
    }
}
