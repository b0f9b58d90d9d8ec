//! Preset lookup on disk.
//!
//! Presets are resolved from, in order: an explicit file path, the factory
//! set, the user preset directory, then the system preset directory.
//!
//! | Platform | User                                          | System                                  |
//! |----------|-----------------------------------------------|-----------------------------------------|
//! | Linux    | `$XDG_CONFIG_HOME/cverb/presets`              | `/usr/share/cverb/presets`              |
//! | macOS    | `~/Library/Application Support/cverb/presets` | `/Library/Application Support/cverb/presets` |
//! | Windows  | `%APPDATA%\cverb\presets`                     | `%APPDATA%\cverb\presets`               |
//!
//! # Example
//!
//! ```rust,no_run
//! use cverb_config::paths;
//!
//! let preset = paths::load_preset("room")?;
//! println!("{} ({} ms)", preset.name, preset.reverb.delay_ms);
//! # Ok::<(), cverb_config::ConfigError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{ConfigError, FileOp, ReverbPreset, get_factory_preset};

const APP_NAME: &str = "cverb";
const PRESET_EXT: &str = "toml";

/// The directories searched for preset files, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDirs {
    /// Per-user presets.
    pub user: PathBuf,
    /// Machine-wide presets.
    pub system: PathBuf,
}

impl PresetDirs {
    /// Directories for the current user and platform.
    pub fn platform() -> Self {
        Self {
            user: user_presets_dir(),
            system: system_presets_dir(),
        }
    }

    /// Search order: user, then system.
    pub fn search_order(&self) -> [&Path; 2] {
        [self.user.as_path(), self.system.as_path()]
    }

    /// First `<dir>/<name>.toml` that exists, in search order.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let file_name = with_preset_ext(name);
        self.search_order()
            .into_iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }

    /// Resolves `name` as a path, a factory preset, or a preset file in these directories.
    pub fn load(&self, name: &str) -> Result<ReverbPreset, ConfigError> {
        let as_path = Path::new(name);
        if as_path.is_file() {
            return ReverbPreset::load(as_path);
        }
        if let Some(preset) = get_factory_preset(name) {
            return Ok(preset);
        }
        let path = self
            .find(name)
            .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))?;
        ReverbPreset::load(path)
    }
}

fn with_preset_ext(name: &str) -> String {
    if Path::new(name).extension().is_some_and(|ext| ext == PRESET_EXT) {
        name.to_string()
    } else {
        format!("{name}.{PRESET_EXT}")
    }
}

/// Per-user cverb configuration directory.
///
/// Falls back to `./cverb` when the platform has no config directory.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Per-user preset directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join("presets")
}

/// Machine-wide preset directory.
pub fn system_presets_dir() -> PathBuf {
    let base = if cfg!(target_os = "linux") {
        PathBuf::from("/usr/share")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Application Support")
    } else {
        dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
    };
    base.join(APP_NAME).join("presets")
}

/// Finds a preset file: `name` itself if it is a file, otherwise
/// `<name>.toml` in the user or system directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let as_path = PathBuf::from(name);
    if as_path.is_file() {
        return Some(as_path);
    }
    PresetDirs::platform().find(name)
}

/// Resolves a preset by path, factory name, or user/system preset name.
pub fn load_preset(name: &str) -> Result<ReverbPreset, ConfigError> {
    PresetDirs::platform().load(name)
}

/// Creates the user preset directory if needed and returns it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::file(FileOp::CreateDir, &dir, e))?;
    Ok(dir)
}

/// Preset files in the user directory, sorted by path.
pub fn list_user_presets() -> Vec<PathBuf> {
    preset_files(&user_presets_dir())
}

/// Preset files in the system directory, sorted by path.
pub fn list_system_presets() -> Vec<PathBuf> {
    preset_files(&system_presets_dir())
}

/// User preset files followed by system preset files.
pub fn list_all_presets() -> Vec<PathBuf> {
    PresetDirs::platform()
        .search_order()
        .into_iter()
        .flat_map(preset_files)
        .collect()
}

fn preset_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == PRESET_EXT))
        .collect();
    files.sort();
    files
}

/// Preset name implied by a file path (its stem).
///
/// ```rust
/// use cverb_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(preset_name_from_path(Path::new("/x/plate.toml")), Some("plate".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()?.to_str().map(str::to_string)
}
