//! Domain layer - Scoring and trend analysis

pub mod combiner;
pub mod day_ref;
pub mod entry;
pub mod lexicon;
pub mod scorer;
pub mod trend;

pub use combiner::{combine, combine_fields};
pub use day_ref::DayReference;
pub use entry::JournalEntry;
pub use lexicon::Lexicon;
pub use scorer::{
    score, FieldScore, FieldScorer, LexiconScorer, NormalizationPolicy, Polarity, PolarityScorer,
};
pub use trend::{
    Analysis, Direction, Distribution, Mood, SentimentBucket, TrendAnalyzer, TrendReport,
    TrendSettings,
};
