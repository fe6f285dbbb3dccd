//! Display-name to photo-file matching.
//!
//! A display name is normalized into a handful of comparison strings, every
//! candidate object name is reduced to a letters-only key, and the candidate
//! whose key is most similar to any of the name forms wins, provided it clears
//! the acceptance threshold.

mod candidate;
mod locator;
mod normalizer;
mod scorer;
mod similarity;

pub use candidate::{candidate_key, Candidate};
pub use locator::{encode_uri_component, StorageLocation};
pub use normalizer::{normalize, NormalizedName};
pub use scorer::{
    best_candidate, best_match, score_candidate, score_candidates, MatchResult, MatchSettings,
    ScoredCandidate, DEFAULT_THRESHOLD,
};
pub use similarity::{similarity, SimilarityVariant};
