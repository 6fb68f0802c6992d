//! Game configuration — a small TOML-backed settings file read once at
//! startup, in the ambient stack's `serde` + `toml` idiom.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_easy_mode")]
    pub easy_mode: bool,
    /// How often `updateEnvironment` runs, in ticks (spec §4.F step 4).
    #[serde(default = "default_environment_period")]
    pub environment_update_period: u32,
    /// Scroll/potion per-kind metered-item table knobs live in `dg-data`;
    /// this only toggles whether the protocol runs at all, for scenario
    /// tuning (e.g. a no-items debug run).
    #[serde(default = "default_true")]
    pub enable_item_population: bool,
    #[serde(default)]
    pub recording_path: Option<String>,
}

fn default_easy_mode() -> bool {
    false
}

fn default_environment_period() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            easy_mode: default_easy_mode(),
            environment_update_period: default_environment_period(),
            enable_item_population: default_true(),
            recording_path: None,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_item_population_enabled() {
        let cfg = GameConfig::default();
        assert!(cfg.enable_item_population);
        assert!(!cfg.easy_mode);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: GameConfig = toml::from_str("easy_mode = true\n").unwrap();
        assert!(cfg.easy_mode);
        assert_eq!(cfg.environment_update_period, 100);
    }

    #[test]
    fn load_missing_file_reports_read_error() {
        let err = GameConfig::load("/nonexistent/path/dg.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
