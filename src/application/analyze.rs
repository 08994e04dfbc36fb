//! Trend report use case

use crate::domain::{Lexicon, TrendAnalyzer, TrendReport, TrendSettings};
use crate::error::Result;
use crate::infrastructure::EntryRepository;

/// Load a user's history and run every trend query over it
pub fn analyze<R: EntryRepository>(
    repository: &R,
    user: &str,
    lexicon: &Lexicon,
    settings: TrendSettings,
) -> Result<TrendReport> {
    let entries = repository.load_entries(user)?;
    let report = TrendAnalyzer::new(&entries, lexicon, settings).report();

    if report.diagnostics.excluded > 0 {
        tracing::warn!(
            user,
            excluded = report.diagnostics.excluded,
            total = report.diagnostics.total,
            "entries with invalid scores were left out of the analysis"
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, JournalEntry};
    use crate::infrastructure::MemoryRepository;
    use chrono::NaiveDate;

    #[test]
    fn test_analyze_reads_only_the_requested_user() {
        let repo = MemoryRepository::new();
        let lexicon = Lexicon::starter();
        for (i, score) in [0.2, -0.1, 0.5, 0.6, 0.4].into_iter().enumerate() {
            let date = NaiveDate::from_ymd_opt(2025, 6, 1 + i as u32).unwrap();
            repo.append_entry("a", JournalEntry::new(date, "산책".into(), "없음".into(), score))
                .unwrap();
            repo.append_entry("b", JournalEntry::new(date, "x".into(), "y".into(), -score))
                .unwrap();
        }

        let report = analyze(&repo, "a", &lexicon, TrendSettings::default()).unwrap();
        let shift = report.recent_shift.ready().unwrap();
        assert_eq!(shift.direction, Direction::Rising);
        assert!((shift.delta - 0.45).abs() < 1e-9);
        assert_eq!(report.diagnostics.total, 5);
    }

    #[test]
    fn test_analyze_unknown_user_has_no_data() {
        let repo = MemoryRepository::new();
        let report = analyze(&repo, "ghost", &Lexicon::starter(), TrendSettings::default()).unwrap();
        assert!(!report.distribution.is_ready());
    }
}
