//! Reverb presets and configuration files for cverb.
//!
//! A preset is a named [`ReverbParams`] table stored as TOML. Presets turn into
//! the plain [`ReverbConfig`](cverb_core::ReverbConfig) the pipeline runs with.
//!
//! # Features
//!
//! - **Preset files**: load and save [`ReverbPreset`]s as TOML
//! - **Validation**: range and stability checks before a pipeline is built
//! - **Paths**: platform-specific user and system preset directories
//! - **Factory presets**: `reference`, `room`, `hall` and `slapback`, always available
//!
//! # Example
//!
//! ```rust
//! use cverb_config::{ReverbPreset, get_factory_preset};
//!
//! let hall = get_factory_preset("hall").unwrap();
//! let config = hall.to_config();
//! assert!(config.delay_ms > 32.0);
//!
//! let preset = ReverbPreset::from_toml(r#"
//!     name = "Tight"
//!     [reverb]
//!     delay_ms = 12.0
//!     overflow = "fail"
//! "#).unwrap();
//! assert_eq!(preset.reverb.comb_count, 4);
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets.
#[cfg(feature = "std")]
pub mod paths;

/// Preset range and stability checks.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::{ConfigError, FileOp};
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
#[cfg(feature = "std")]
pub use paths::{
    PresetDirs, ensure_user_presets_dir, find_preset, list_all_presets, list_system_presets,
    list_user_presets, load_preset, preset_name_from_path, system_presets_dir, user_config_dir,
    user_presets_dir,
};
pub use preset::{ByteOrder, Overflow, ReverbParams, ReverbPreset};
pub use validation::{ValidationError, ValidationResult, validate_params, validate_preset};
