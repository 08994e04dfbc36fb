//! Journal entry model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's record: what went well, what was difficult, and the derived score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    #[serde(rename = "positive")]
    pub positive_text: String,
    #[serde(rename = "negative")]
    pub negative_text: String,
    pub score: f64,
}

impl JournalEntry {
    /// Create an entry; the score is stored rounded to 3 decimals
    pub fn new(date: NaiveDate, positive_text: String, negative_text: String, score: f64) -> Self {
        JournalEntry {
            date,
            positive_text,
            negative_text,
            score: round_score(score),
        }
    }

    /// Finite and within [-1, 1]
    pub fn is_well_formed(&self) -> bool {
        self.score.is_finite() && (-1.0..=1.0).contains(&self.score)
    }
}

/// Round to the 3 decimals kept in storage
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
