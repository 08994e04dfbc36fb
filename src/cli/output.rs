//! Output formatting utilities

use crate::application::Evaluation;
use crate::domain::trend::{Diagnostics, FrequentText, RecentShift, WeeklyMean};
use crate::domain::{Analysis, Direction, Distribution, JournalEntry, Mood, SentimentBucket, TrendReport};

const NOTE_SEPARATOR: &str = " / ";

/// Format a list of entries for display
pub fn format_entry_list(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No entries found".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{}  {:>6.2}  + {}\n            - {}\n",
            entry.date.format("%Y-%m-%d"),
            entry.score,
            entry.positive_text,
            entry.negative_text
        ));
    }
    output
}

pub fn verdict(bucket: SentimentBucket) -> &'static str {
    match bucket {
        SentimentBucket::Positive => "The relationship is moving in a positive direction",
        SentimentBucket::Neutral => "A balanced day",
        SentimentBucket::Negative => "It feels emotionally distant",
    }
}

pub fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::VeryGood => "😊 very good",
        Mood::Good => "🙂 good",
        Mood::Neutral => "😐 neutral",
        Mood::Bad => "☹️ not great",
        Mood::Sad => "😭 sad",
    }
}

/// Field and combined scores, followed by the day's verdict
pub fn format_evaluation(evaluation: &Evaluation, bucket_threshold: f64) -> String {
    let field = |label: &str, score: &crate::domain::FieldScore| {
        if score.declared_empty {
            format!("{}: (none)\n", label)
        } else {
            format!("{}: {:.2} (raw {})\n", label, score.score, score.raw)
        }
    };

    let mut output = String::new();
    output.push_str(&field("Went well", &evaluation.positive));
    output.push_str(&field("Difficult", &evaluation.negative));
    output.push_str(&format!("Score: {:.2}\n", evaluation.score));
    output.push_str(verdict(SentimentBucket::classify(
        evaluation.score,
        bucket_threshold,
    )));
    output.push('\n');
    output
}

fn section<T>(title: &str, analysis: &Analysis<T>, render: impl Fn(&T) -> String) -> String {
    let body = match analysis {
        Analysis::Ready(value) => render(value),
        Analysis::InsufficientData {
            required,
            available,
        } => format!(
            "  Not enough data (need {}, have {})\n",
            required, available
        ),
    };
    format!("{}\n{}", title, body)
}

fn render_shift(shift: &RecentShift) -> String {
    let summary = match shift.direction {
        Direction::Rising => "Recent feelings are rising",
        Direction::Falling => "Recent feelings are falling",
        Direction::Stable => "No big change, keep writing",
    };
    format!(
        "  {} ({:+.2}): last {} avg {:.2} vs earlier avg {:.2}\n",
        summary, shift.delta, shift.window, shift.recent_mean, shift.past_mean
    )
}

fn render_weekly(weeks: &[WeeklyMean]) -> String {
    weeks
        .iter()
        .map(|w| {
            format!(
                "  {}-W{:02}  {:>6.2}  ({} entries)\n",
                w.year, w.week, w.mean, w.count
            )
        })
        .collect()
}

fn render_distribution(dist: &Distribution) -> String {
    format!(
        "  positive {}  neutral {}  negative {}\n",
        dist.positive, dist.neutral, dist.negative
    )
}

fn render_frequent(frequent: &FrequentText) -> String {
    format!(
        "  went well: {}\n  difficult: {}\n",
        frequent.positive.as_deref().unwrap_or("no data"),
        frequent.negative.as_deref().unwrap_or("no data")
    )
}

fn render_diagnostics(diagnostics: &Diagnostics) -> String {
    if diagnostics.excluded == 0 {
        String::new()
    } else {
        format!(
            "\n{} of {} entries were skipped (invalid score)\n",
            diagnostics.excluded, diagnostics.total
        )
    }
}

/// Render every section of a trend report
pub fn format_trend_report(report: &TrendReport) -> String {
    if report.diagnostics.total == 0 {
        return "No entries yet".to_string();
    }

    let mut output = String::new();
    output.push_str(&section("Recent shift", &report.recent_shift, render_shift));
    output.push_str(&section("Weekly average", &report.weekly, |weeks| {
        render_weekly(weeks)
    }));
    output.push_str(&section("Distribution", &report.distribution, render_distribution));
    output.push_str(&section("Most frequent", &report.frequent_text, render_frequent));
    output.push_str(&section("Latest mood", &report.latest_mood, |mood| {
        format!("  {}\n", mood_label(*mood))
    }));
    output.push_str(&section("Collected notes", &report.collected_notes, |notes| {
        let join = |items: &[String]| {
            if items.is_empty() {
                "no data".to_string()
            } else {
                items.join(NOTE_SEPARATOR)
            }
        };
        format!(
            "  went well: {}\n  difficult: {}\n",
            join(&notes.positive),
            join(&notes.negative)
        )
    }));
    output.push_str(&render_diagnostics(&report.diagnostics));
    output
}

/// Format a list of profiles for display
pub fn format_user_list(users: &[String]) -> String {
    if users.is_empty() {
        return "No users found\n".to_string();
    }

    users.iter().map(|u| format!("{}\n", u)).collect()
}
