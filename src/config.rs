//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [level]
//! max_width = 40
//! max_height = 35
//!
//! [navigation]
//! playable_only = true
//! ```
//!
//! Missing keys fall back to the defaults shown above.

use crate::error::ConfigError;
use crate::grid::Size;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bounding box every level is normalized into.
    pub maximal_size: Size,
    /// Whether level navigation skips levels that are not playable.
    pub playable_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            maximal_size: Size::new(default_max_width(), default_max_height()),
            playable_only: default_playable_only(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    level: TomlLevel,
    #[serde(default)]
    navigation: TomlNavigation,
}

#[derive(Deserialize, Debug)]
struct TomlLevel {
    #[serde(default = "default_max_width")]
    max_width: usize,
    #[serde(default = "default_max_height")]
    max_height: usize,
}

#[derive(Deserialize, Debug)]
struct TomlNavigation {
    #[serde(default = "default_playable_only")]
    playable_only: bool,
}

fn default_max_width() -> usize {
    40
}

fn default_max_height() -> usize {
    35
}

fn default_playable_only() -> bool {
    true
}

impl Default for TomlLevel {
    fn default() -> Self {
        TomlLevel {
            max_width: default_max_width(),
            max_height: default_max_height(),
        }
    }
}

impl Default for TomlNavigation {
    fn default() -> Self {
        TomlNavigation {
            playable_only: default_playable_only(),
        }
    }
}

// ── Loading ──

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg: TomlConfig = toml::from_str(text)?;
        let maximal_size = Size::new(toml_cfg.level.max_width, toml_cfg.level.max_height);
        if maximal_size.width == 0 || maximal_size.height == 0 {
            return Err(ConfigError::InvalidSize(maximal_size));
        }
        Ok(EngineConfig {
            maximal_size,
            playable_only: toml_cfg.navigation.playable_only,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "using default settings");
                EngineConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.maximal_size, Size::new(40, 35));
        assert!(cfg.playable_only);
    }

    #[test]
    fn test_partial_config() {
        let cfg = EngineConfig::from_toml_str("[level]\nmax_width = 20\n").unwrap();
        assert_eq!(cfg.maximal_size, Size::new(20, 35));

        let cfg = EngineConfig::from_toml_str("[navigation]\nplayable_only = false\n").unwrap();
        assert!(!cfg.playable_only);
        assert_eq!(cfg.maximal_size, Size::new(40, 35));
    }

    #[test]
    fn test_parse_error() {
        let result = EngineConfig::from_toml_str("[level]\nmax_width = \"wide\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = EngineConfig::from_toml_str("[level]\nmax_height = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidSize(_))));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("nonexistent_config.toml");
        assert!(matches!(
            EngineConfig::load(path),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(EngineConfig::load_or_default(path), EngineConfig::default());
    }
}
