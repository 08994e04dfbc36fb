//! Error types for lovescale

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the lovescale application
#[derive(Debug, Error)]
pub enum LoveScaleError {
    #[error("Not a lovescale directory: {0}")]
    NotLoveScaleDirectory(PathBuf),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No entry found for {0}")]
    EntryNotFound(NaiveDate),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LoveScaleError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LoveScaleError::NotLoveScaleDirectory(_) => 2,
            LoveScaleError::Configuration(_) => 3,
            LoveScaleError::Validation(_) => 4,
            LoveScaleError::EntryNotFound(_) => 5,
            LoveScaleError::InvalidDate(_) => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            LoveScaleError::NotLoveScaleDirectory(path) => {
                format!(
                    "Not a lovescale directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'lovescale init' in this directory to create a new journal\n\
                    • Navigate to an existing lovescale directory\n\
                    • Set LOVESCALE_ROOT environment variable to your journal path",
                    path.display()
                )
            }
            LoveScaleError::Configuration(msg) => {
                if msg.contains("lexicon") {
                    format!(
                        "Configuration error: {}\n\n\
                        The lexicon file must define three lists:\n\
                        positive = [\"행복\", ...]\n\
                        negative = [\"힘들\", ...]\n\
                        neg_prefix = [\"안 \", ...]\n\n\
                        Run 'lovescale init' in a fresh directory to see a default lexicon.",
                        msg
                    )
                } else {
                    self.to_string()
                }
            }
            LoveScaleError::Validation(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Write at least one of the two fields\n\
                    • lovescale record --positive \"함께 웃었던 대화가 즐거웠어요\"",
                    msg
                )
            }
            LoveScaleError::EntryNotFound(date) => {
                format!(
                    "No entry found for {}\n\n\
                    Suggestions:\n\
                    • Use 'lovescale list' to see recorded days\n\
                    • Check that you are using the right --user",
                    date.format("%Y-%m-%d")
                )
            }
            LoveScaleError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Valid dates:\n\
                    • today, yesterday\n\
                    • N days ago (e.g., 3 days ago)\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2025-01-17)",
                    input
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using LoveScaleError
pub type Result<T> = std::result::Result<T, LoveScaleError>;
