//! Preset range and stability checks.
//!
//! [`ReverbConfig::validate`](cverb_core::ReverbConfig::validate) only rejects
//! configurations the pipeline cannot be built from. Presets are additionally
//! held to ranges that keep the output bounded: a comb bank whose total loop
//! gain reaches 1 never decays, and neither does an all-pass stage with
//! `|feedback| >= 1`.

use cverb_core::{ReverbConfig, ReverbError};
use thiserror::Error;

use crate::{ReverbParams, ReverbPreset};

/// Upper bound for comb taps and all-pass stages.
pub const MAX_STAGES: usize = 64;

/// Longest accepted delay or tail in milliseconds.
pub const MAX_TIME_MS: f32 = 60_000.0;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: &'static str,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Comb taps sum to a loop gain of 1 or more.
    #[error(
        "comb loop gain {comb_count} x {comb_feedback} must stay below 1.0 for the tail to decay"
    )]
    UnstableComb {
        /// Number of comb taps.
        comb_count: usize,
        /// Feedback gain per tap.
        comb_feedback: f32,
    },

    /// The pipeline rejected the configuration.
    #[error("{0}")]
    Reverb(ReverbError),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(
    errors: &mut Vec<ValidationError>,
    param: &'static str,
    value: f32,
    min: f32,
    max: f32,
) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            param,
            value,
            min,
            max,
        });
    }
}

/// Checks every field of `params`, collecting all failures.
pub fn validate_params(params: &ReverbParams) -> ValidationResult<()> {
    let mut errors = Vec::new();

    check_range(&mut errors, "comb_count", params.comb_count as f32, 1.0, MAX_STAGES as f32);
    check_range(
        &mut errors,
        "allpass_count",
        params.allpass_count as f32,
        0.0,
        MAX_STAGES as f32,
    );
    check_range(&mut errors, "comb_feedforward", params.comb_feedforward, -4.0, 4.0);
    check_range(&mut errors, "comb_feedback", params.comb_feedback, -1.0, 1.0);
    check_range(&mut errors, "allpass_feedforward", params.allpass_feedforward, -1.0, 1.0);
    check_range(&mut errors, "allpass_feedback", params.allpass_feedback, -0.99, 0.99);
    check_range(&mut errors, "delay_ms", params.delay_ms, 0.01, MAX_TIME_MS);
    for &ms in &params.allpass_delays_ms {
        check_range(&mut errors, "allpass_delays_ms", ms, 0.01, MAX_TIME_MS);
    }
    check_range(&mut errors, "staging_slots", params.staging_slots as f32, 1.0, 1024.0);
    check_range(&mut errors, "tail_ms", params.tail_ms, 0.0, MAX_TIME_MS);

    let loop_gain = params.comb_count as f32 * params.comb_feedback.abs();
    if loop_gain >= 1.0 {
        errors.push(ValidationError::UnstableComb {
            comb_count: params.comb_count,
            comb_feedback: params.comb_feedback,
        });
    }

    if errors.is_empty()
        && let Err(e) = ReverbConfig::from(params).validate()
    {
        errors.push(ValidationError::Reverb(e));
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Checks a preset's reverb parameters.
pub fn validate_preset(preset: &ReverbPreset) -> ValidationResult<()> {
    validate_params(&preset.reverb)
}
