//! Day reference parsing for entry dates

use crate::error::{LoveScaleError, Result};
use chrono::{Days, NaiveDate};

/// A day the user refers to on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayReference {
    Today,
    Yesterday,
    /// "N days ago"
    DaysAgo(u32),
    /// YYYY-MM-DD
    Date(NaiveDate),
}

impl DayReference {
    /// Parse "today", "yesterday", "N days ago" or an ISO date
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        match normalized.as_str() {
            "today" | "now" | "오늘" => Ok(DayReference::Today),
            "yesterday" | "어제" => Ok(DayReference::Yesterday),
            _ => {
                if let Some(count) = normalized
                    .strip_suffix(" days ago")
                    .or_else(|| normalized.strip_suffix(" day ago"))
                {
                    return count
                        .trim()
                        .parse::<u32>()
                        .map(DayReference::DaysAgo)
                        .map_err(|_| LoveScaleError::InvalidDate(input.to_string()));
                }

                NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                    .map(DayReference::Date)
                    .map_err(|_| LoveScaleError::InvalidDate(input.to_string()))
            }
        }
    }

    /// Resolve against the given "today"; fails when the day falls outside
    /// the representable calendar
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate> {
        let days_back = match self {
            DayReference::Today => return Ok(today),
            DayReference::Date(date) => return Ok(*date),
            DayReference::Yesterday => 1,
            DayReference::DaysAgo(n) => u64::from(*n),
        };

        today
            .checked_sub_days(Days::new(days_back))
            .ok_or_else(|| {
                LoveScaleError::InvalidDate(format!("{} days before {}", days_back, today))
            })
    }
}
