use serde::Serialize;

/// Which normalized name form produced a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityVariant {
    Combined,
    Reversed,
    Initials,
}

impl SimilarityVariant {
    pub fn label(self) -> &'static str {
        match self {
            SimilarityVariant::Combined => "combined",
            SimilarityVariant::Reversed => "reversed",
            SimilarityVariant::Initials => "initials",
        }
    }
}

/// Dice coefficient over character bigram multisets, in `[0, 1]`.
///
/// Equal strings score 1. Otherwise a string shorter than two characters
/// scores 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b)
}
