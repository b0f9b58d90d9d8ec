//! Factory presets bundled with cverb.
//!
//! These are embedded at compile time and always available without external
//! files. `reference` is the default configuration: the four-comb,
//! four-all-pass topology with the comb feedback split across the taps so the
//! total loop gain is 0.8. The others are starting points for common spaces.

use crate::ReverbPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["reference", "room", "hall", "slapback"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("reference", REFERENCE_PRESET),
    ("room", ROOM_PRESET),
    ("hall", HALL_PRESET),
    ("slapback", SLAPBACK_PRESET),
];

const REFERENCE_PRESET: &str = r#"
name = "Reference"
description = "Four combs and four all-passes at 32 ms"

[reverb]
comb_count = 4
allpass_count = 4
comb_feedforward = 1.0
comb_feedback = 0.2
allpass_feedforward = 0.5
allpass_feedback = 0.5
delay_ms = 32.0
"#;

const ROOM_PRESET: &str = r#"
name = "Room"
description = "Short, dense reflections with staggered diffusion"

[reverb]
comb_count = 4
allpass_count = 4
comb_feedback = 0.18
allpass_feedforward = 0.6
allpass_feedback = 0.6
delay_ms = 23.0
allpass_delays_ms = [5.0, 1.7, 1.3, 1.1]
tail_ms = 400.0
"#;

const HALL_PRESET: &str = r#"
name = "Hall"
description = "Long decay with six comb taps and a ringing tail"

[reverb]
comb_count = 6
allpass_count = 4
comb_feedback = 0.15
allpass_feedforward = 0.7
allpass_feedback = 0.7
delay_ms = 47.0
allpass_delays_ms = [12.0, 7.0, 4.1, 1.9]
tail_ms = 2000.0
"#;

const SLAPBACK_PRESET: &str = r#"
name = "Slapback"
description = "Single distinct echo, no diffusion"

[reverb]
comb_count = 1
allpass_count = 0
comb_feedback = 0.35
delay_ms = 110.0
tail_ms = 300.0
"#;

/// Get all factory presets.
pub fn factory_presets() -> Vec<ReverbPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| ReverbPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches the internal name or the display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use cverb_config::get_factory_preset;
///
/// let preset = get_factory_preset("Slapback").unwrap();
/// assert_eq!(preset.reverb.allpass_count, 0);
/// ```
pub fn get_factory_preset(name: &str) -> Option<ReverbPreset> {
    let name_lower = name.to_lowercase();

    FACTORY_PRESETS_TOML.iter().find_map(|(preset_name, toml)| {
        let preset = ReverbPreset::from_toml(toml).ok()?;
        (*preset_name == name_lower || preset.name.to_lowercase() == name_lower).then_some(preset)
    })
}

/// Get the internal names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a preset name is a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_preset;
    use cverb_core::ReverbConfig;

    #[test]
    fn test_all_factory_presets_parse_and_validate() {
        for (name, toml) in FACTORY_PRESETS_TOML {
            let preset = ReverbPreset::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory preset '{name}' should parse: {e}"));
            assert!(preset.description.is_some(), "'{name}' needs a description");
            validate_preset(&preset)
                .unwrap_or_else(|e| panic!("factory preset '{name}' should validate: {e}"));
        }
        assert_eq!(factory_presets().len(), FACTORY_PRESET_NAMES.len());
    }

    #[test]
    fn test_reference_matches_default_config() {
        let preset = get_factory_preset("reference").unwrap();
        assert_eq!(preset.to_config(), ReverbConfig::default());
        assert_eq!(preset.tail_ms(), 0.0);
    }

    #[test]
    fn test_reference_loop_gain_is_stable() {
        let params = get_factory_preset("reference").unwrap().reverb;
        assert_eq!(params.comb_count, 4);
        let loop_gain = params.comb_count as f32 * params.comb_feedback;
        assert!((loop_gain - 0.8).abs() < 1e-6, "loop gain {loop_gain}");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(get_factory_preset("HALL").unwrap().name, "Hall");
        assert_eq!(get_factory_preset("Room").unwrap().name, "Room");
        assert!(get_factory_preset("cathedral").is_none());
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
        assert!(is_factory_preset("slapback"));
        assert!(!is_factory_preset("init"));
    }

    #[test]
    fn test_presets_build_at_low_sample_rate() {
        for preset in factory_presets() {
            let config = preset.to_config();
            assert!(
                config.history_capacity(8000).is_ok(),
                "'{}' should size at 8 kHz",
                preset.name
            );
        }
    }
}
