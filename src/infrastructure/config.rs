//! Configuration and lexicon files

use crate::domain::trend::{BUCKET_THRESHOLD, DEFAULT_RECENT_WINDOW, SHIFT_THRESHOLD};
use crate::domain::{Lexicon, NormalizationPolicy, TrendSettings};
use crate::error::{LoveScaleError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const LOVESCALE_DIR: &str = ".lovescale";
pub const CONFIG_FILE: &str = "config.toml";
pub const LEXICON_FILE: &str = "lexicon.toml";

/// User used when no --user is given and the config has none
pub const FALLBACK_USER: &str = "me";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub normalization: NormalizationPolicy,
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default = "default_shift_threshold")]
    pub shift_threshold: f64,
    #[serde(default = "default_bucket_threshold")]
    pub bucket_threshold: f64,
    #[serde(default = "default_user")]
    pub default_user: String,
    pub created: DateTime<Utc>,
}

fn default_recent_window() -> usize {
    DEFAULT_RECENT_WINDOW
}

fn default_shift_threshold() -> f64 {
    SHIFT_THRESHOLD
}

fn default_bucket_threshold() -> f64 {
    BUCKET_THRESHOLD
}

fn default_user() -> String {
    FALLBACK_USER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            normalization: NormalizationPolicy::default(),
            recent_window: DEFAULT_RECENT_WINDOW,
            shift_threshold: SHIFT_THRESHOLD,
            bucket_threshold: BUCKET_THRESHOLD,
            default_user: default_user(),
            created: Utc::now(),
        }
    }
}

impl Config {
    /// Load config from .lovescale/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(LOVESCALE_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoveScaleError::NotLoveScaleDirectory(path.to_path_buf())
            } else {
                LoveScaleError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            LoveScaleError::Configuration(format!("Failed to parse config.toml: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .lovescale/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let dir = path.join(LOVESCALE_DIR);

        if !dir.exists() {
            fs::create_dir(&dir)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            LoveScaleError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Reject windows below 1 and thresholds outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        if self.recent_window == 0 {
            return Err(LoveScaleError::Configuration(
                "recent_window must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("shift_threshold", self.shift_threshold),
            ("bucket_threshold", self.bucket_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LoveScaleError::Configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.default_user.trim().is_empty() {
            return Err(LoveScaleError::Configuration(
                "default_user must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn trend_settings(&self) -> TrendSettings {
        TrendSettings {
            recent_window: self.recent_window,
            shift_threshold: self.shift_threshold,
            bucket_threshold: self.bucket_threshold,
        }
    }
}

/// Load the lexicon document; any failure is fatal for scoring
pub fn load_lexicon(path: &Path) -> Result<Lexicon> {
    let contents = fs::read_to_string(path).map_err(|e| {
        LoveScaleError::Configuration(format!(
            "Cannot read lexicon file {}: {}",
            path.display(),
            e
        ))
    })?;

    let lexicon = Lexicon::from_toml_str(&contents)?;
    tracing::debug!(
        positive = lexicon.positive.len(),
        negative = lexicon.negative.len(),
        prefixes = lexicon.neg_prefix.len(),
        "lexicon loaded from {}",
        path.display()
    );
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.normalization, NormalizationPolicy::Thirds);
        assert_eq!(config.recent_window, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            normalization: NormalizationPolicy::Saturating,
            recent_window: 5,
            ..Config::default()
        };

        config.save_to_dir(temp.path()).unwrap();
        assert!(temp.path().join(".lovescale/config.toml").exists());

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(LOVESCALE_DIR)).unwrap();
        fs::write(
            temp.path().join(".lovescale/config.toml"),
            "created = \"2025-01-01T00:00:00Z\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.shift_threshold, SHIFT_THRESHOLD);
        assert_eq!(loaded.bucket_threshold, BUCKET_THRESHOLD);
        assert_eq!(loaded.default_user, "me");
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();

        match Config::load_from_dir(temp.path()).unwrap_err() {
            LoveScaleError::NotLoveScaleDirectory(_) => {}
            other => panic!("Expected NotLoveScaleDirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_window = Config {
            recent_window: 0,
            ..Config::default()
        };
        assert!(zero_window.validate().is_err());

        let big_threshold = Config {
            bucket_threshold: 1.5,
            ..Config::default()
        };
        assert!(big_threshold.validate().is_err());
    }

    #[test]
    fn test_load_lexicon_missing_file_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let result = load_lexicon(&temp.path().join("lexicon.toml"));
        assert!(matches!(result, Err(LoveScaleError::Configuration(_))));
    }

    #[test]
    fn test_load_lexicon_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lexicon.toml");
        fs::write(
            &path,
            "positive = [\"행복\"]\nnegative = [\"힘들\"]\nneg_prefix = [\"안 \"]\n",
        )
        .unwrap();

        let lexicon = load_lexicon(&path).unwrap();
        assert_eq!(lexicon.negative, vec!["힘들"]);
    }
}
