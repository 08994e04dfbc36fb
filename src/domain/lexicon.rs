//! Sentiment lexicon
//!
//! Marker phrases are matched as plain substrings, so they work the same for
//! Korean stems ("힘들") as for whole words. A negation prefix is glued
//! directly onto a marker ("안 " + "행복" = "안 행복") to flip its polarity.

use crate::error::{LoveScaleError, Result};
use serde::{Deserialize, Serialize};

/// Sentinel phrases used when the lexicon document does not list its own.
pub const DEFAULT_EMPTY_MARKERS: &[&str] = &["잘 모르겠어요", "없음"];

/// Immutable set of marker phrases used for scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neg_prefix: Vec<String>,
    #[serde(default = "default_empty_markers")]
    pub empty_markers: Vec<String>,
}

fn default_empty_markers() -> Vec<String> {
    DEFAULT_EMPTY_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Lexicon {
    /// Build a validated lexicon
    pub fn new(positive: Vec<String>, negative: Vec<String>, neg_prefix: Vec<String>) -> Result<Self> {
        let lexicon = Lexicon {
            positive,
            negative,
            neg_prefix,
            empty_markers: default_empty_markers(),
        };
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Parse and validate a lexicon TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let lexicon: Lexicon = toml::from_str(contents)
            .map_err(|e| LoveScaleError::Configuration(format!("Failed to parse lexicon: {}", e)))?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Check that every phrase is non-empty and that at least one sentinel exists
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("positive", &self.positive),
            ("negative", &self.negative),
            ("neg_prefix", &self.neg_prefix),
            ("empty_markers", &self.empty_markers),
        ];

        for (name, list) in lists {
            if let Some(pos) = list.iter().position(|s| s.is_empty()) {
                return Err(LoveScaleError::Configuration(format!(
                    "lexicon field '{}' has an empty string at index {}",
                    name, pos
                )));
            }
        }

        if self.empty_markers.is_empty() {
            return Err(LoveScaleError::Configuration(
                "lexicon field 'empty_markers' must list at least one phrase".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the text is, or contains, a "none / not sure" sentinel
    pub fn is_declared_empty(&self, text: &str) -> bool {
        self.empty_markers.iter().any(|m| text.contains(m.as_str()))
    }

    /// The sentinel stored when a field is left unanswered
    pub fn empty_marker(&self) -> &str {
        // validate() guarantees at least one marker
        self.empty_markers
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_EMPTY_MARKERS[0])
    }

    /// Starter lexicon written by `lovescale init`
    pub fn starter() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Lexicon {
            positive: list(&[
                "행복", "좋았", "즐거", "고마", "감사", "웃", "사랑", "편안", "설레", "다정",
            ]),
            negative: list(&[
                "힘들", "싫", "슬프", "서운", "답답", "화가", "짜증", "외로", "불안", "지쳤",
            ]),
            neg_prefix: list(&["안 ", "못 ", "안", "못"]),
            empty_markers: default_empty_markers(),
        }
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
