//! Entry-level score from the two field scores

use crate::domain::FieldScore;

/// Merge the "went well" and "was difficult" field scores.
///
/// A difficult field can only pull the day down: its magnitude is subtracted
/// regardless of the sign the lexicon gave it.
pub fn combine(pos: f64, pos_empty: bool, neg: f64, neg_empty: bool) -> f64 {
    match (pos_empty, neg_empty) {
        (true, true) => 0.0,
        (false, true) => pos,
        (true, false) => -neg.abs(),
        (false, false) => (pos - neg.abs()).clamp(-1.0, 1.0),
    }
}

/// `combine` over two `FieldScore`s
pub fn combine_fields(positive: &FieldScore, negative: &FieldScore) -> f64 {
    combine(
        positive.score,
        positive.declared_empty,
        negative.score,
        negative.declared_empty,
    )
}
