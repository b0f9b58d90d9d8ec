//! Ingest staging buffer.
//!
//! A small byte ring that sits between the source stream and the filter
//! network. Each frame is pushed in as raw bytes and immediately popped back
//! out, which gives the pipeline a live per-sample input cadence with a bounded
//! amount of buffering. Byte order is preserved exactly; endianness is handled
//! by [`crate::sample`], not here.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::{MAX_CAPACITY, ReverbError};

/// Bytes per 16-bit sample frame.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Fixed-capacity FIFO of raw bytes.
///
/// # Overflow
///
/// [`put`](Self::put) on a full buffer fails with
/// [`ReverbError::StagingOverflow`] and leaves the contents untouched; unread
/// data is never overwritten.
///
/// # Example
///
/// ```rust
/// use cverb_core::StagingBuffer;
///
/// let mut staging = StagingBuffer::with_slots(6).unwrap();
/// staging.put(0x34).unwrap();
/// staging.put(0x12).unwrap();
/// assert_eq!(staging.get(), Some(0x34));
/// assert_eq!(staging.get(), Some(0x12));
/// assert_eq!(staging.get(), None);
/// ```
#[derive(Debug, Clone)]
pub struct StagingBuffer {
    bytes: Vec<u8>,
    read_pos: usize,
    write_pos: usize,
    len: usize,
}

impl StagingBuffer {
    /// Creates a staging buffer holding `capacity_in_bytes` bytes.
    pub fn new(capacity_in_bytes: usize) -> Result<Self, ReverbError> {
        if capacity_in_bytes == 0 || capacity_in_bytes > MAX_CAPACITY {
            return Err(ReverbError::InvalidCapacity(capacity_in_bytes));
        }

        Ok(Self {
            bytes: vec![0; capacity_in_bytes],
            read_pos: 0,
            write_pos: 0,
            len: 0,
        })
    }

    /// Creates a staging buffer sized for `slots` 16-bit frames.
    pub fn with_slots(slots: usize) -> Result<Self, ReverbError> {
        Self::new(slots.saturating_mul(BYTES_PER_SAMPLE))
    }

    /// Appends one byte.
    #[inline]
    pub fn put(&mut self, byte: u8) -> Result<(), ReverbError> {
        if self.len == self.bytes.len() {
            return Err(ReverbError::StagingOverflow);
        }

        self.bytes[self.write_pos] = byte;
        self.write_pos = (self.write_pos + 1) % self.bytes.len();
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the oldest byte, or `None` when empty.
    #[inline]
    pub fn get(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }

        let byte = self.bytes[self.read_pos];
        self.read_pos = (self.read_pos + 1) % self.bytes.len();
        self.len -= 1;
        Some(byte)
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no bytes are waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Drops all unread bytes.
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.len = 0;
    }
}
