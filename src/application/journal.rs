//! Record, edit, delete and list journal entries

use crate::domain::{combine_fields, FieldScore, FieldScorer, JournalEntry};
use crate::error::{LoveScaleError, Result};
use crate::infrastructure::EntryRepository;
use chrono::NaiveDate;

/// Field scores and combined score for one pair of texts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub positive: FieldScore,
    pub negative: FieldScore,
    pub score: f64,
}

impl Evaluation {
    pub fn is_empty(&self) -> bool {
        self.positive.declared_empty && self.negative.declared_empty
    }
}

/// Service scoring texts and persisting entries for one journal
pub struct JournalService<R, S> {
    repository: R,
    scorer: S,
}

impl<R: EntryRepository, S: FieldScorer> JournalService<R, S> {
    pub fn new(repository: R, scorer: S) -> Self {
        JournalService { repository, scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score both fields and combine them; never fails
    pub fn evaluate(&self, positive: &str, negative: &str) -> Evaluation {
        let positive = self.scorer.score_field(positive);
        let negative = self.scorer.score_field(negative);
        Evaluation {
            positive,
            negative,
            score: combine_fields(&positive, &negative),
        }
    }

    fn build_entry(&self, date: NaiveDate, positive: &str, negative: &str) -> Result<JournalEntry> {
        let evaluation = self.evaluate(positive, negative);
        if evaluation.is_empty() {
            return Err(LoveScaleError::Validation(
                "Nothing to record: both fields are empty".to_string(),
            ));
        }

        Ok(JournalEntry::new(
            date,
            positive.trim().to_string(),
            negative.trim().to_string(),
            evaluation.score,
        ))
    }

    /// Score and append a new entry. Both fields empty is rejected.
    pub fn record(
        &self,
        user: &str,
        date: NaiveDate,
        positive: &str,
        negative: &str,
    ) -> Result<JournalEntry> {
        let entry = self.build_entry(date, positive, negative)?;
        self.repository.append_entry(user, entry.clone())?;
        tracing::info!(user, %date, score = entry.score, "entry recorded");
        Ok(entry)
    }

    /// Replace both texts of an existing entry and re-derive its score
    pub fn edit(
        &self,
        user: &str,
        date: NaiveDate,
        positive: &str,
        negative: &str,
    ) -> Result<JournalEntry> {
        let entry = self.build_entry(date, positive, negative)?;
        let previous = self.repository.update_entry(user, entry.clone())?;
        tracing::info!(
            user,
            %date,
            old_score = previous.score,
            score = entry.score,
            "entry edited"
        );
        Ok(entry)
    }

    pub fn delete(&self, user: &str, date: NaiveDate) -> Result<JournalEntry> {
        let removed = self.repository.delete_entry(user, date)?;
        tracing::info!(user, %date, "entry deleted");
        Ok(removed)
    }

    /// Entries ordered by date; same-day entries keep insertion order
    pub fn list(&self, user: &str) -> Result<Vec<JournalEntry>> {
        let mut entries = self.repository.load_entries(user)?;
        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }
}
