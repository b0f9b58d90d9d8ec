//! Boundary conversion between 16-bit PCM frames and pipeline floats.
//!
//! Inside the pipeline a sample is a single `f32` carrying the raw 16-bit
//! magnitude (no normalisation), so a full-scale input stays at ±32767.
//! At the edges:
//!
//! - [`decode`] / [`encode`] convert between a 2-byte frame and `i16` with an
//!   explicit [`Endianness`].
//! - [`quantize`] turns the mixed float back into `i16` under an
//!   [`OverflowPolicy`].

use crate::ReverbError;

/// Smallest representable boundary sample.
pub const SAMPLE_MIN: f32 = i16::MIN as f32;

/// Largest representable boundary sample.
pub const SAMPLE_MAX: f32 = i16::MAX as f32;

/// Byte order of a 16-bit frame on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endianness {
    /// Least-significant byte first (RIFF/WAVE).
    #[default]
    Little,
    /// Most-significant byte first.
    Big,
}

/// What to do when a mixed sample leaves `[-32768, 32767]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Clamp to the nearest representable value.
    #[default]
    Saturate,
    /// Truncating cast that wraps modulo 2^16 (legacy behavior).
    Wrap,
    /// Abort the run with [`ReverbError::SampleOutOfRange`].
    Fail,
}

/// Decodes a 2-byte frame into a signed sample.
#[inline]
pub fn decode(frame: [u8; 2], endianness: Endianness) -> i16 {
    match endianness {
        Endianness::Little => i16::from_le_bytes(frame),
        Endianness::Big => i16::from_be_bytes(frame),
    }
}

/// Encodes a signed sample as a 2-byte frame.
#[inline]
pub fn encode(sample: i16, endianness: Endianness) -> [u8; 2] {
    match endianness {
        Endianness::Little => sample.to_le_bytes(),
        Endianness::Big => sample.to_be_bytes(),
    }
}

/// Lifts a boundary sample into the pipeline representation.
#[inline]
pub fn to_float(sample: i16) -> f32 {
    f32::from(sample)
}

/// Returns `true` if `value` fits the 16-bit range after truncation toward zero.
#[inline]
pub fn in_range(value: f32) -> bool {
    value > SAMPLE_MIN - 1.0 && value < SAMPLE_MAX + 1.0
}

/// Converts a pipeline float to a boundary sample under `policy`.
///
/// In-range values are truncated toward zero under every policy. NaN maps to
/// 0 for `Saturate` and `Wrap`, and is rejected by `Fail`.
#[inline]
pub fn quantize(value: f32, policy: OverflowPolicy) -> Result<i16, ReverbError> {
    match policy {
        OverflowPolicy::Saturate => Ok(value.clamp(SAMPLE_MIN, SAMPLE_MAX) as i16),
        // `as i32` truncates (saturating at i32 bounds), `as i16` then wraps.
        OverflowPolicy::Wrap => Ok(value as i32 as i16),
        OverflowPolicy::Fail => {
            if in_range(value) {
                Ok(value as i16)
            } else {
                Err(ReverbError::SampleOutOfRange(value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_little_endian() {
        assert_eq!(decode([0x34, 0x12], Endianness::Little), 0x1234);
        assert_eq!(decode([0xff, 0xff], Endianness::Little), -1);
        assert_eq!(decode([0x00, 0x80], Endianness::Little), i16::MIN);
    }

    #[test]
    fn test_decode_big_endian() {
        assert_eq!(decode([0x12, 0x34], Endianness::Big), 0x1234);
        assert_eq!(decode([0x80, 0x00], Endianness::Big), i16::MIN);
    }

    #[test]
    fn test_encode_inverts_decode() {
        for sample in [0i16, 1, -1, 0x1234, i16::MIN, i16::MAX] {
            for endianness in [Endianness::Little, Endianness::Big] {
                assert_eq!(decode(encode(sample, endianness), endianness), sample);
            }
        }
        assert_eq!(encode(0x1234, Endianness::Little), [0x34, 0x12]);
        assert_eq!(encode(0x1234, Endianness::Big), [0x12, 0x34]);
    }

    #[test]
    fn test_quantize_in_range_truncates() {
        for policy in [
            OverflowPolicy::Saturate,
            OverflowPolicy::Wrap,
            OverflowPolicy::Fail,
        ] {
            assert_eq!(quantize(1.9, policy), Ok(1));
            assert_eq!(quantize(-1.9, policy), Ok(-1));
            assert_eq!(quantize(32767.5, policy), Ok(32767));
            assert_eq!(quantize(-32768.5, policy), Ok(-32768));
        }
    }

    #[test]
    fn test_saturate_clamps() {
        assert_eq!(quantize(40000.0, OverflowPolicy::Saturate), Ok(i16::MAX));
        assert_eq!(quantize(-40000.0, OverflowPolicy::Saturate), Ok(i16::MIN));
        assert_eq!(quantize(f32::INFINITY, OverflowPolicy::Saturate), Ok(i16::MAX));
        assert_eq!(quantize(f32::NAN, OverflowPolicy::Saturate), Ok(0));
    }

    #[test]
    fn test_wrap_matches_legacy_cast() {
        // 32768 wraps to -32768, 40000 to 40000 - 65536.
        assert_eq!(quantize(32768.0, OverflowPolicy::Wrap), Ok(i16::MIN));
        assert_eq!(quantize(40000.0, OverflowPolicy::Wrap), Ok(-25536));
        assert_eq!(quantize(-32769.0, OverflowPolicy::Wrap), Ok(i16::MAX));
    }

    #[test]
    fn test_fail_rejects_out_of_range() {
        assert_eq!(
            quantize(32768.0, OverflowPolicy::Fail),
            Err(ReverbError::SampleOutOfRange(32768.0))
        );
        assert!(quantize(-32769.0, OverflowPolicy::Fail).is_err());
        assert!(quantize(f32::NAN, OverflowPolicy::Fail).is_err());
    }

    #[test]
    fn test_to_float_is_exact() {
        assert_eq!(to_float(i16::MIN), -32768.0);
        assert_eq!(to_float(i16::MAX), 32767.0);
    }
}
