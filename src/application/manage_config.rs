//! Config management use case

use crate::domain::NormalizationPolicy;
use crate::error::{LoveScaleError, Result};
use crate::infrastructure::{Config, CsvEntryRepository};
use std::str::FromStr;

const KEYS: &str = "normalization, recent_window, shift_threshold, bucket_threshold, default_user";

/// Service for managing journal configuration
pub struct ConfigService {
    repository: CsvEntryRepository,
}

impl ConfigService {
    pub fn new(repository: CsvEntryRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;

        match key {
            "normalization" => Ok(config.normalization.to_string()),
            "recent_window" => Ok(config.recent_window.to_string()),
            "shift_threshold" => Ok(config.shift_threshold.to_string()),
            "bucket_threshold" => Ok(config.bucket_threshold.to_string()),
            "default_user" => Ok(config.default_user),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a config value; the result is validated before it is written
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "normalization" => {
                config.normalization =
                    NormalizationPolicy::from_str(value).map_err(LoveScaleError::Configuration)?;
            }
            "recent_window" => config.recent_window = parse(key, value)?,
            "shift_threshold" => config.shift_threshold = parse(key, value)?,
            "bucket_threshold" => config.bucket_threshold = parse(key, value)?,
            "default_user" => config.default_user = value.to_string(),
            "created" => {
                return Err(LoveScaleError::Configuration(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => return Err(unknown_key(key)),
        }

        config.validate()?;
        self.repository.save_config(&config)
    }

    pub fn list(&self) -> Result<Config> {
        self.repository.load_config()
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        LoveScaleError::Configuration(format!("Invalid value for {}: '{}'", key, value))
    })
}

fn unknown_key(key: &str) -> LoveScaleError {
    LoveScaleError::Configuration(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key, KEYS
    ))
}
