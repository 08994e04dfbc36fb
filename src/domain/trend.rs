//! Trend analysis over one user's journal history
//!
//! Every query is read-only and reports `Analysis::InsufficientData` when the
//! history is too short, so callers never see a division by zero. Entries with
//! a non-finite or out-of-range score are dropped up front and counted in
//! `Diagnostics`.

use crate::domain::{JournalEntry, Lexicon};
use chrono::Datelike;
use std::collections::HashMap;
use std::fmt;

/// Minimum |delta| for a recent shift to count as rising or falling
pub const SHIFT_THRESHOLD: f64 = 0.05;

/// Scores above +threshold are positive days, below -threshold negative days
pub const BUCKET_THRESHOLD: f64 = 0.3;

/// Number of latest entries compared against the rest
pub const DEFAULT_RECENT_WINDOW: usize = 3;

const MIN_SHIFT_ENTRIES: usize = 2;

/// Tunable thresholds for the analyzer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    pub recent_window: usize,
    pub shift_threshold: f64,
    pub bucket_threshold: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        TrendSettings {
            recent_window: DEFAULT_RECENT_WINDOW,
            shift_threshold: SHIFT_THRESHOLD,
            bucket_threshold: BUCKET_THRESHOLD,
        }
    }
}

/// Result of a query that needs a minimum amount of history
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis<T> {
    InsufficientData { required: usize, available: usize },
    Ready(T),
}

impl<T> Analysis<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Analysis::Ready(value) => Some(value),
            Analysis::InsufficientData { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Analysis::Ready(_))
    }
}

/// Direction of the recent shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
    Stable,
}

impl Direction {
    pub fn classify(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Direction::Rising
        } else if delta < -threshold {
            Direction::Falling
        } else {
            Direction::Stable
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rising => write!(f, "rising"),
            Direction::Falling => write!(f, "falling"),
            Direction::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentShift {
    /// Number of latest entries averaged
    pub window: usize,
    pub recent_mean: f64,
    pub past_mean: f64,
    pub delta: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyMean {
    /// ISO week-numbering year
    pub year: i32,
    pub week: u32,
    pub mean: f64,
    pub count: usize,
}

/// Sentiment bucket of a single score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBucket {
    pub fn classify(score: f64, threshold: f64) -> Self {
        if score > threshold {
            SentimentBucket::Positive
        } else if score < -threshold {
            SentimentBucket::Negative
        } else {
            SentimentBucket::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Most common text per field; `None` when a field only holds sentinels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequentText {
    pub positive: Option<String>,
    pub negative: Option<String>,
}

/// Five-step face for a single score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    VeryGood,
    Good,
    Neutral,
    Bad,
    Sad,
}

impl Mood {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Mood::VeryGood
        } else if score > 0.3 {
            Mood::Good
        } else if score > -0.3 {
            Mood::Neutral
        } else if score > -0.7 {
            Mood::Bad
        } else {
            Mood::Sad
        }
    }
}

/// Every non-sentinel text, in date order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectedNotes {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub total: usize,
    pub excluded: usize,
}

/// All queries at once
#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub recent_shift: Analysis<RecentShift>,
    pub weekly: Analysis<Vec<WeeklyMean>>,
    pub distribution: Analysis<Distribution>,
    pub frequent_text: Analysis<FrequentText>,
    pub latest_mood: Analysis<Mood>,
    pub collected_notes: Analysis<CollectedNotes>,
    pub diagnostics: Diagnostics,
}

/// Read-only view over a user's entries
pub struct TrendAnalyzer<'a> {
    entries: Vec<&'a JournalEntry>,
    excluded: usize,
    lexicon: &'a Lexicon,
    settings: TrendSettings,
}

impl<'a> TrendAnalyzer<'a> {
    pub fn new(entries: &'a [JournalEntry], lexicon: &'a Lexicon, settings: TrendSettings) -> Self {
        let mut kept: Vec<&JournalEntry> = entries.iter().filter(|e| e.is_well_formed()).collect();
        let excluded = entries.len() - kept.len();

        // Stable: same-day entries keep their insertion order
        kept.sort_by_key(|e| e.date);

        TrendAnalyzer {
            entries: kept,
            excluded,
            lexicon,
            settings,
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            total: self.entries.len() + self.excluded,
            excluded: self.excluded,
        }
    }

    fn insufficient<T>(&self, required: usize) -> Option<Analysis<T>> {
        if self.entries.len() < required {
            Some(Analysis::InsufficientData {
                required,
                available: self.entries.len(),
            })
        } else {
            None
        }
    }

    /// Mean of the latest entries minus the mean of everything before them.
    ///
    /// The window shrinks so that at least one earlier entry remains.
    pub fn recent_shift(&self) -> Analysis<RecentShift> {
        if let Some(insufficient) = self.insufficient(MIN_SHIFT_ENTRIES) {
            return insufficient;
        }

        let window = self
            .settings
            .recent_window
            .clamp(1, self.entries.len() - 1);
        let split = self.entries.len() - window;
        let (past, recent) = self.entries.split_at(split);

        let recent_mean = mean(recent);
        let past_mean = mean(past);
        let delta = recent_mean - past_mean;

        Analysis::Ready(RecentShift {
            window,
            recent_mean,
            past_mean,
            delta,
            direction: Direction::classify(delta, self.settings.shift_threshold),
        })
    }

    /// Mean score per ISO week, oldest week first
    pub fn weekly(&self) -> Analysis<Vec<WeeklyMean>> {
        if let Some(insufficient) = self.insufficient(1) {
            return insufficient;
        }

        let mut weeks: Vec<WeeklyMean> = Vec::new();
        for entry in &self.entries {
            let iso = entry.date.iso_week();
            match weeks.last_mut() {
                Some(last) if last.year == iso.year() && last.week == iso.week() => {
                    last.mean += entry.score;
                    last.count += 1;
                    continue;
                }
                _ => {}
            }
            weeks.push(WeeklyMean {
                year: iso.year(),
                week: iso.week(),
                mean: entry.score,
                count: 1,
            });
        }

        // `mean` holds the running sum until here
        for week in &mut weeks {
            week.mean /= week.count as f64;
        }

        Analysis::Ready(weeks)
    }

    pub fn distribution(&self) -> Analysis<Distribution> {
        if let Some(insufficient) = self.insufficient(1) {
            return insufficient;
        }

        let mut dist = Distribution::default();
        for entry in &self.entries {
            match SentimentBucket::classify(entry.score, self.settings.bucket_threshold) {
                SentimentBucket::Positive => dist.positive += 1,
                SentimentBucket::Neutral => dist.neutral += 1,
                SentimentBucket::Negative => dist.negative += 1,
            }
        }

        Analysis::Ready(dist)
    }

    /// Mode of each text field, ties going to the value seen first
    pub fn frequent_text(&self) -> Analysis<FrequentText> {
        if let Some(insufficient) = self.insufficient(1) {
            return insufficient;
        }

        Analysis::Ready(FrequentText {
            positive: self.mode_of(|e| &e.positive_text),
            negative: self.mode_of(|e| &e.negative_text),
        })
    }

    pub fn latest_mood(&self) -> Analysis<Mood> {
        match self.entries.last() {
            Some(entry) => Analysis::Ready(Mood::from_score(entry.score)),
            None => Analysis::InsufficientData {
                required: 1,
                available: 0,
            },
        }
    }

    pub fn collected_notes(&self) -> Analysis<CollectedNotes> {
        if let Some(insufficient) = self.insufficient(1) {
            return insufficient;
        }

        Analysis::Ready(CollectedNotes {
            positive: self.contents(|e| &e.positive_text).map(str::to_string).collect(),
            negative: self.contents(|e| &e.negative_text).map(str::to_string).collect(),
        })
    }

    pub fn report(&self) -> TrendReport {
        TrendReport {
            recent_shift: self.recent_shift(),
            weekly: self.weekly(),
            distribution: self.distribution(),
            frequent_text: self.frequent_text(),
            latest_mood: self.latest_mood(),
            collected_notes: self.collected_notes(),
            diagnostics: self.diagnostics(),
        }
    }

    /// Trimmed texts that carry real content
    fn contents<F>(&self, field: F) -> impl Iterator<Item = &'a str> + '_
    where
        F: Fn(&'a JournalEntry) -> &'a String + 'a,
    {
        self.entries
            .iter()
            .map(move |e| field(*e).trim())
            .filter(move |text| !text.is_empty() && !self.lexicon.is_declared_empty(text))
    }

    fn mode_of<F>(&self, field: F) -> Option<String>
    where
        F: Fn(&'a JournalEntry) -> &'a String + 'a,
    {
        // text -> (count, first seen index)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (idx, text) in self.contents(field).enumerate() {
            counts.entry(text).or_insert((0, idx)).0 += 1;
        }

        counts
            .into_iter()
            .max_by(|(_, (ca, ia)), (_, (cb, ib))| ca.cmp(cb).then(ib.cmp(ia)))
            .map(|(text, _)| text.to_string())
    }
}

fn mean(entries: &[&JournalEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|e| e.score).sum::<f64>() / entries.len() as f64
}
