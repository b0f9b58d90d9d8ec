//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cverb_core::{Endianness, OverflowPolicy, ReverbConfig};

use crate::error::{ConfigError, FileOp};

/// Out-of-range handling as written in preset files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Clamp to the 16-bit range.
    #[default]
    Saturate,
    /// Wrap modulo 2^16.
    Wrap,
    /// Abort the run.
    Fail,
}

impl From<Overflow> for OverflowPolicy {
    fn from(value: Overflow) -> Self {
        match value {
            Overflow::Saturate => OverflowPolicy::Saturate,
            Overflow::Wrap => OverflowPolicy::Wrap,
            Overflow::Fail => OverflowPolicy::Fail,
        }
    }
}

impl From<OverflowPolicy> for Overflow {
    fn from(value: OverflowPolicy) -> Self {
        match value {
            OverflowPolicy::Saturate => Overflow::Saturate,
            OverflowPolicy::Wrap => Overflow::Wrap,
            OverflowPolicy::Fail => Overflow::Fail,
        }
    }
}

/// Frame byte order as written in preset files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Little-endian.
    #[default]
    Little,
    /// Big-endian.
    Big,
}

impl From<ByteOrder> for Endianness {
    fn from(value: ByteOrder) -> Self {
        match value {
            ByteOrder::Little => Endianness::Little,
            ByteOrder::Big => Endianness::Big,
        }
    }
}

impl From<Endianness> for ByteOrder {
    fn from(value: Endianness) -> Self {
        match value {
            Endianness::Little => ByteOrder::Little,
            Endianness::Big => ByteOrder::Big,
        }
    }
}

/// The `[reverb]` table of a preset.
///
/// Every field is optional in TOML; missing fields take the reference values
/// from [`ReverbConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReverbParams {
    /// Feedback taps in the comb bank.
    pub comb_count: usize,
    /// All-pass stages in series.
    pub allpass_count: usize,
    /// Comb feed-forward gain.
    pub comb_feedforward: f32,
    /// Comb feedback gain per tap.
    pub comb_feedback: f32,
    /// All-pass feed-forward gain.
    pub allpass_feedforward: f32,
    /// All-pass feedback gain.
    pub allpass_feedback: f32,
    /// Comb delay in milliseconds.
    pub delay_ms: f32,
    /// Per-stage all-pass delays in milliseconds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allpass_delays_ms: Vec<f32>,
    /// Extra delay-line slots.
    pub margin_samples: usize,
    /// Staging buffer size in frames.
    pub staging_slots: usize,
    /// Out-of-range handling.
    pub overflow: Overflow,
    /// Frame byte order for raw streams.
    pub endianness: ByteOrder,
    /// Silence appended after the input so the reverb can ring out.
    pub tail_ms: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self::from(&ReverbConfig::default())
    }
}

impl From<&ReverbConfig> for ReverbParams {
    fn from(config: &ReverbConfig) -> Self {
        Self {
            comb_count: config.comb_count,
            allpass_count: config.allpass_count,
            comb_feedforward: config.comb_feedforward,
            comb_feedback: config.comb_feedback,
            allpass_feedforward: config.allpass_feedforward,
            allpass_feedback: config.allpass_feedback,
            delay_ms: config.delay_ms,
            allpass_delays_ms: config.allpass_delays_ms.clone(),
            margin_samples: config.margin_samples,
            staging_slots: config.staging_slots,
            overflow: config.overflow.into(),
            endianness: config.endianness.into(),
            tail_ms: 0.0,
        }
    }
}

impl From<&ReverbParams> for ReverbConfig {
    fn from(params: &ReverbParams) -> Self {
        Self {
            comb_count: params.comb_count,
            allpass_count: params.allpass_count,
            comb_feedforward: params.comb_feedforward,
            comb_feedback: params.comb_feedback,
            allpass_feedforward: params.allpass_feedforward,
            allpass_feedback: params.allpass_feedback,
            delay_ms: params.delay_ms,
            allpass_delays_ms: params.allpass_delays_ms.clone(),
            margin_samples: params.margin_samples,
            staging_slots: params.staging_slots,
            overflow: params.overflow.into(),
            endianness: params.endianness.into(),
        }
    }
}

/// A named reverb configuration stored as TOML.
///
/// # TOML Format
///
/// ```toml
/// name = "Small Room"
/// description = "Short, dense reflections"
///
/// [reverb]
/// comb_count = 4
/// comb_feedback = 0.18
/// delay_ms = 23.0
/// allpass_delays_ms = [5.0, 1.7, 1.3, 1.1]
/// overflow = "saturate"
/// tail_ms = 400.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReverbPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reverb parameters.
    #[serde(default)]
    pub reverb: ReverbParams,
}

impl ReverbPreset {
    /// Create a preset with reference parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            reverb: ReverbParams::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the reverb parameters.
    pub fn with_params(mut self, reverb: ReverbParams) -> Self {
        self.reverb = reverb;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::file(FileOp::Read, path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::file(FileOp::CreateDir, parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::file(FileOp::Write, path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The pipeline configuration this preset describes.
    pub fn to_config(&self) -> ReverbConfig {
        ReverbConfig::from(&self.reverb)
    }

    /// Reverb tail in milliseconds.
    pub fn tail_ms(&self) -> f32 {
        self.reverb.tail_ms
    }
}

impl Default for ReverbPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
