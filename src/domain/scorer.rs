//! Phrase scoring and field normalization

use crate::domain::Lexicon;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Count marker hits in `text`.
///
/// Each marker contributes at most once. A negated positive marker counts as
/// -1, a negated negative marker as +1, plain hits keep their sign. Markers are
/// checked independently, so overlapping phrases each add to the total.
/// Text carrying a sentinel phrase scores 0 without scanning.
pub fn score(text: &str, lexicon: &Lexicon) -> i32 {
    if lexicon.is_declared_empty(text) {
        return 0;
    }

    let negated = |marker: &str| {
        lexicon
            .neg_prefix
            .iter()
            .any(|prefix| text.contains(&format!("{}{}", prefix, marker)))
    };

    let mut total = 0;
    for marker in &lexicon.positive {
        if negated(marker) {
            total -= 1;
        } else if text.contains(marker.as_str()) {
            total += 1;
        }
    }
    for marker in &lexicon.negative {
        if negated(marker) {
            total += 1;
        } else if text.contains(marker.as_str()) {
            total -= 1;
        }
    }
    total
}

/// How a raw marker count maps onto [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationPolicy {
    /// raw / 3, clamped
    #[default]
    Thirds,
    /// raw itself, clamped: one hit saturates the field
    Saturating,
}

impl NormalizationPolicy {
    pub fn normalize(&self, raw: i32) -> f64 {
        let scaled = match self {
            NormalizationPolicy::Thirds => raw as f64 / 3.0,
            NormalizationPolicy::Saturating => raw as f64,
        };
        scaled.clamp(-1.0, 1.0)
    }
}

impl fmt::Display for NormalizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationPolicy::Thirds => write!(f, "thirds"),
            NormalizationPolicy::Saturating => write!(f, "saturating"),
        }
    }
}

impl FromStr for NormalizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thirds" => Ok(NormalizationPolicy::Thirds),
            "saturating" => Ok(NormalizationPolicy::Saturating),
            _ => Err(format!(
                "Invalid normalization: '{}'. Valid policies are: thirds, saturating",
                s
            )),
        }
    }
}

/// Score of one free-text field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScore {
    pub raw: i32,
    /// Bounded to [-1, 1]
    pub score: f64,
    /// The user opted out of this field (sentinel or blank text)
    pub declared_empty: bool,
}

impl FieldScore {
    pub fn empty() -> Self {
        FieldScore {
            raw: 0,
            score: 0.0,
            declared_empty: true,
        }
    }
}

/// Anything that can turn one journal field into a `FieldScore`
pub trait FieldScorer {
    fn score_field(&self, text: &str) -> FieldScore;
}

/// Lexicon matching plus a normalization policy
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Lexicon,
    policy: NormalizationPolicy,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon, policy: NormalizationPolicy) -> Self {
        LexiconScorer { lexicon, policy }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }
}

impl FieldScorer for LexiconScorer {
    fn score_field(&self, text: &str) -> FieldScore {
        if text.trim().is_empty() || self.lexicon.is_declared_empty(text) {
            return FieldScore::empty();
        }

        let raw = score(text, &self.lexicon);
        FieldScore {
            raw,
            score: self.policy.normalize(raw),
            declared_empty: false,
        }
    }
}

/// External general-purpose sentiment model returning a polarity in [-1, 1]
pub trait Polarity {
    fn polarity(&self, text: &str) -> f64;
}

/// Use a `Polarity` model as a field scorer.
///
/// Sentinel detection still comes from the lexicon; the model only sees real
/// content. A non-finite polarity counts as neutral.
pub struct PolarityScorer<P> {
    model: P,
    lexicon: Lexicon,
}

impl<P: Polarity> PolarityScorer<P> {
    pub fn new(model: P, lexicon: Lexicon) -> Self {
        PolarityScorer { model, lexicon }
    }
}

impl<P: Polarity> FieldScorer for PolarityScorer<P> {
    fn score_field(&self, text: &str) -> FieldScore {
        if text.trim().is_empty() || self.lexicon.is_declared_empty(text) {
            return FieldScore::empty();
        }

        let polarity = self.model.polarity(text);
        let score = if polarity.is_finite() {
            polarity.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        FieldScore {
            raw: 0,
            score,
            declared_empty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::new(
            vec!["행복".to_string()],
            vec!["힘들".to_string()],
            vec!["안 ".to_string()],
        )
        .unwrap()
    }

    fn rich_lexicon() -> Lexicon {
        Lexicon::new(
            vec!["happy".to_string(), "grateful".to_string(), "calm".to_string()],
            vec!["sad".to_string(), "tired".to_string()],
            vec!["not ".to_string(), "never ".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_no_markers_scores_zero() {
        let lex = rich_lexicon();
        assert_eq!(score("", &lex), 0);
        assert_eq!(score("we went for a walk", &lex), 0);
    }

    #[test]
    fn test_single_marker_scores_its_sign() {
        let lex = rich_lexicon();
        for m in &lex.positive {
            assert_eq!(score(m, &lex), 1, "positive marker {}", m);
        }
        for m in &lex.negative {
            assert_eq!(score(m, &lex), -1, "negative marker {}", m);
        }
    }

    #[test]
    fn test_negated_positive_is_negative() {
        let lex = rich_lexicon();
        for p in &lex.neg_prefix {
            for m in &lex.positive {
                assert_eq!(score(&format!("{}{}", p, m), &lex), -1);
            }
        }
    }

    #[test]
    fn test_negated_negative_is_positive() {
        let lex = lexicon();
        assert_eq!(score("오늘은 안 힘들었어", &lex), 1);
    }

    #[test]
    fn test_prefix_needs_direct_concatenation() {
        let lex = rich_lexicon();
        // "not really happy" has no "not happy" substring
        assert_eq!(score("not really happy", &lex), 1);
    }

    #[test]
    fn test_contributions_accumulate() {
        let lex = rich_lexicon();
        assert_eq!(score("happy, grateful and calm", &lex), 3);
        assert_eq!(score("happy but tired and sad", &lex), -1);
    }

    #[test]
    fn test_repeated_marker_counts_once() {
        let lex = lexicon();
        assert_eq!(score("행복 행복 행복", &lex), 1);
    }

    #[test]
    fn test_sentinel_short_circuits() {
        let lex = lexicon();
        assert_eq!(score("행복 없음", &lex), 0);
        assert_eq!(score("잘 모르겠어요.", &lex), 0);
    }

    #[test]
    fn test_thirds_policy() {
        let policy = NormalizationPolicy::Thirds;
        assert_eq!(policy.normalize(0), 0.0);
        assert!((policy.normalize(1) - 1.0 / 3.0).abs() < 1e-9);
        assert!((policy.normalize(-2) + 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(policy.normalize(3), 1.0);
        assert_eq!(policy.normalize(9), 1.0);
        assert_eq!(policy.normalize(-7), -1.0);
    }

    #[test]
    fn test_saturating_policy() {
        let policy = NormalizationPolicy::Saturating;
        assert_eq!(policy.normalize(1), 1.0);
        assert_eq!(policy.normalize(-4), -1.0);
        assert_eq!(policy.normalize(0), 0.0);
    }

    #[test]
    fn test_normalize_is_monotonic() {
        for policy in [NormalizationPolicy::Thirds, NormalizationPolicy::Saturating] {
            for raw in -10..10 {
                assert!(policy.normalize(raw) <= policy.normalize(raw + 1));
            }
        }
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "Thirds".parse::<NormalizationPolicy>().unwrap(),
            NormalizationPolicy::Thirds
        );
        assert_eq!(
            "saturating".parse::<NormalizationPolicy>().unwrap(),
            NormalizationPolicy::Saturating
        );
        assert!("doubled".parse::<NormalizationPolicy>().is_err());
    }

    #[test]
    fn test_lexicon_scorer_single_positive_marker() {
        let scorer = LexiconScorer::new(lexicon(), NormalizationPolicy::Thirds);
        let field = scorer.score_field("행복");
        assert_eq!(field.raw, 1);
        assert!((field.score - 0.33).abs() < 0.01);
        assert!(!field.declared_empty);
    }

    #[test]
    fn test_blank_and_sentinel_fields_are_declared_empty() {
        let scorer = LexiconScorer::new(lexicon(), NormalizationPolicy::Thirds);
        assert!(scorer.score_field("").declared_empty);
        assert!(scorer.score_field("   \n").declared_empty);
        assert!(scorer.score_field("없음").declared_empty);
    }

    #[test]
    fn test_neutral_text_is_not_declared_empty() {
        let scorer = LexiconScorer::new(lexicon(), NormalizationPolicy::Thirds);
        let field = scorer.score_field("그냥 평범한 하루");
        assert_eq!(field.score, 0.0);
        assert!(!field.declared_empty);
    }

    struct Fixed(f64);

    impl Polarity for Fixed {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_polarity_scorer_clamps_and_respects_sentinel() {
        let scorer = PolarityScorer::new(Fixed(1.7), lexicon());
        assert_eq!(scorer.score_field("아무 말").score, 1.0);
        assert!(scorer.score_field("없음").declared_empty);

        let broken = PolarityScorer::new(Fixed(f64::NAN), lexicon());
        assert_eq!(broken.score_field("아무 말").score, 0.0);
    }
}
