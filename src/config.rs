use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name
pub const APP_NAME: &str = "scriptlets";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings filename inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Directory scanned for filter lists when none are configured
pub const FILTERS_DIR: &str = "filters";

// ============================================================================
// Engines
// ============================================================================

/// Engine tag for hosts that call the returned function themselves
pub const CORELIBS_ENGINE: &str = "corelibs";

/// Engine tag used by test harnesses
pub const TEST_ENGINE: &str = "test";

/// Engine tag for code injected straight into the page
pub const DEFAULT_ENGINE: &str = "extension";

// ============================================================================
// Settings
// ============================================================================

/// Errors that can occur while reading or writing settings
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid settings: {}", e),
            ConfigError::Serialize(e) => write!(f, "Failed to serialize settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Runtime settings, persisted as TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Engine tag written into every generated source
    pub engine: String,
    /// Make scriptlets log their hits in the page console
    pub verbose: bool,
    /// Filter list files or directories to load
    pub filter_lists: Vec<PathBuf>,
    /// Prepend the built-in filter list
    pub bundled_filters: bool,
    /// Fixed injection identifier; a random one is generated when unset
    pub unique_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            verbose: false,
            filter_lists: Vec::new(),
            bundled_filters: true,
            unique_id: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let settings = toml::from_str(&contents)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        log::debug!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Default settings location (XDG config directory)
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Filter lists to load: the configured ones, or the default filters
    /// directory when nothing is configured
    pub fn resolved_filter_lists(&self) -> Vec<PathBuf> {
        if !self.filter_lists.is_empty() {
            return self.filter_lists.clone();
        }

        project_dirs()
            .map(|dirs| vec![dirs.data_dir().join(FILTERS_DIR)])
            .unwrap_or_default()
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "myyc", APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.engine, DEFAULT_ENGINE);
        assert!(settings.bundled_filters);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "verbose = true\nengine = \"corelibs\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(settings.verbose);
        assert_eq!(settings.engine, CORELIBS_ENGINE);
        assert!(settings.bundled_filters);
        assert!(settings.filter_lists.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            filter_lists: vec![PathBuf::from("/tmp/a.txt")],
            unique_id: Some("fixed".into()),
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "verbose = \"maybe\"").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_configured_lists_win() {
        let settings = Settings {
            filter_lists: vec![PathBuf::from("a.txt")],
            ..Settings::default()
        };
        assert_eq!(settings.resolved_filter_lists(), vec![PathBuf::from("a.txt")]);
    }
}
