use serde::Serialize;
use tracing::debug;

use super::candidate::Candidate;
use super::locator::StorageLocation;
use super::normalizer::NormalizedName;
use super::similarity::{similarity, SimilarityVariant};

/// Minimum score a candidate needs before its URL is written back.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Deployment-specific inputs to the acceptance decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSettings {
    pub threshold: f64,
    pub location: StorageLocation,
}

/// A candidate together with its best score across the name variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub id: String,
    pub key: String,
    pub score: f64,
    pub variant: SimilarityVariant,
}

/// Outcome of a best-match scan.
///
/// `candidate_id` and `locator` are only present when the best score cleared
/// the threshold; `score` always reports the best score seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub score: f64,
    pub candidate_id: Option<String>,
    pub locator: Option<String>,
}

impl MatchResult {
    pub fn no_match(score: f64) -> Self {
        Self {
            score,
            candidate_id: None,
            locator: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.candidate_id.is_some()
    }
}

/// Scores one candidate against the combined, reversed, and initials forms and
/// keeps the highest. Earlier variants win ties.
pub fn score_candidate(name: &NormalizedName, candidate: &Candidate) -> ScoredCandidate {
    let variants = [
        (SimilarityVariant::Combined, name.combined()),
        (SimilarityVariant::Reversed, name.reversed()),
        (SimilarityVariant::Initials, name.initials()),
    ];

    let mut best_variant = SimilarityVariant::Combined;
    let mut best_score = f64::MIN;
    for (variant, form) in variants {
        let score = similarity(form, &candidate.key);
        if score > best_score {
            best_variant = variant;
            best_score = score;
        }
    }

    ScoredCandidate {
        id: candidate.id.clone(),
        key: candidate.key.clone(),
        score: best_score,
        variant: best_variant,
    }
}

/// Scores every candidate in scan order.
pub fn score_candidates(name: &NormalizedName, candidates: &[Candidate]) -> Vec<ScoredCandidate> {
    candidates
        .iter()
        .map(|candidate| score_candidate(name, candidate))
        .collect()
}

/// Running-maximum scan. A candidate replaces the current best only on a
/// strictly greater score, so the earliest candidate wins ties and a candidate
/// scoring 0 is never selected.
pub fn best_candidate(name: &NormalizedName, candidates: &[Candidate]) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;

    for candidate in candidates {
        let scored = score_candidate(name, candidate);
        debug!(
            candidate = %scored.id,
            score = scored.score,
            variant = scored.variant.label(),
            "scored photo candidate"
        );

        let current = best.as_ref().map_or(0.0, |entry| entry.score);
        if scored.score > current {
            best = Some(scored);
        }
    }

    best
}

/// Picks the best candidate and applies the acceptance threshold.
pub fn best_match(
    name: &NormalizedName,
    candidates: &[Candidate],
    settings: &MatchSettings,
) -> MatchResult {
    match best_candidate(name, candidates) {
        Some(best) if best.score >= settings.threshold => MatchResult {
            score: best.score,
            locator: Some(settings.location.photo_url(&best.id)),
            candidate_id: Some(best.id),
        },
        Some(best) => MatchResult::no_match(best.score),
        None => MatchResult::no_match(0.0),
    }
}
