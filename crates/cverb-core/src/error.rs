//! Error type for reverb construction and processing.

/// Errors raised while sizing or running a reverb pipeline.
///
/// Every variant is fatal for the run that produced it: configuration and
/// sizing errors abort construction, and processing errors abort the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReverbError {
    /// A delay line or staging buffer was asked for zero (or oversized) storage.
    InvalidCapacity(usize),
    /// The sample rate is zero or beyond [`MAX_SAMPLE_RATE`](crate::MAX_SAMPLE_RATE).
    InvalidSampleRate(u32),
    /// A delay time is non-finite, non-positive, or rounds to zero samples.
    InvalidDelay(f32),
    /// A configuration field is inconsistent.
    InvalidConfig(&'static str),
    /// The staging buffer has no free slot for another byte.
    StagingOverflow,
    /// A mixed sample left the 16-bit range under [`OverflowPolicy::Fail`](crate::OverflowPolicy::Fail).
    SampleOutOfRange(f32),
}

impl core::fmt::Display for ReverbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidCapacity(n) => write!(f, "invalid delay-line capacity: {n} samples"),
            Self::InvalidSampleRate(sr) => write!(f, "invalid sample rate: {sr} Hz"),
            Self::InvalidDelay(ms) => write!(f, "invalid delay time: {ms} ms"),
            Self::InvalidConfig(msg) => write!(f, "invalid reverb configuration: {msg}"),
            Self::StagingOverflow => write!(f, "staging buffer overflow"),
            Self::SampleOutOfRange(v) => {
                write!(f, "sample {v} outside 16-bit range [-32768, 32767]")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReverbError {}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate alloc;
    use alloc::string::ToString;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ReverbError::InvalidSampleRate(0).to_string(),
            "invalid sample rate: 0 Hz"
        );
        assert_eq!(
            ReverbError::StagingOverflow.to_string(),
            "staging buffer overflow"
        );
        assert!(
            ReverbError::SampleOutOfRange(40000.0)
                .to_string()
                .contains("40000")
        );
    }
}
