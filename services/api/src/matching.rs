use clap::Args;
use photo_match::config::{parse_threshold, AppConfig};
use photo_match::error::AppError;
use photo_match::matching::{
    best_match, normalize, score_candidates, Candidate, MatchResult, NormalizedName,
    ScoredCandidate,
};
use photo_match::telemetry;
use photo_match::workflows::child_photo::{CandidateSource, CloudStorageClient};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Display name to match, e.g. "Jane Doe"
    #[arg(long)]
    pub(crate) name: String,
    /// Candidate object name (repeatable)
    #[arg(long = "candidate")]
    pub(crate) candidates: Vec<String>,
    /// File with one candidate object name per line
    #[arg(long)]
    pub(crate) candidates_file: Option<PathBuf>,
    /// Override the acceptance threshold, in (0, 1]
    #[arg(long)]
    pub(crate) threshold: Option<String>,
}

/// Scores a name against explicit candidates, or against the configured bucket
/// when none are given, and prints the decision. Never writes to the record
/// store.
pub(crate) async fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        name,
        mut candidates,
        candidates_file,
        threshold,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(raw) = threshold {
        config.matcher.threshold = parse_threshold(&raw)?;
    }
    telemetry::init(&config.telemetry)?;

    if let Some(path) = candidates_file {
        let contents = std::fs::read_to_string(path)?;
        candidates.extend(read_candidate_lines(&contents));
    }

    if candidates.is_empty() {
        let source = CloudStorageClient::from_config(&config.firebase, &config.matcher)?;
        candidates = source
            .list_candidates(&config.matcher.candidate_prefix)
            .await?;
    }
    candidates.sort();

    let settings = config.matcher.settings();
    let normalized = normalize(&name);
    let pool: Vec<Candidate> = candidates
        .iter()
        .filter_map(|id| Candidate::new(id.as_str()))
        .collect();
    let scores = score_candidates(&normalized, &pool);
    let result = best_match(&normalized, &pool, &settings);

    print!(
        "{}",
        render_match_report(&name, &normalized, &scores, &result, settings.threshold)
    );
    Ok(())
}

fn read_candidate_lines(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

pub(crate) fn render_match_report(
    name: &str,
    normalized: &NormalizedName,
    scores: &[ScoredCandidate],
    result: &MatchResult,
    threshold: f64,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Photo match for \"{}\"", name);
    let _ = writeln!(
        out,
        "  Forms: combined={} reversed={} initials={}",
        normalized.combined(),
        normalized.reversed(),
        normalized.initials()
    );

    if scores.is_empty() {
        let _ = writeln!(out, "  No candidates with letters to compare");
    } else {
        let _ = writeln!(out, "\nCandidates");
        for scored in scores {
            let _ = writeln!(
                out,
                "  {} -> {:.3} ({})",
                scored.id,
                scored.score,
                scored.variant.label()
            );
        }
    }

    let _ = writeln!(out);
    match (&result.candidate_id, &result.locator) {
        (Some(candidate), Some(locator)) => {
            let _ = writeln!(
                out,
                "Matched \"{}\" -> \"{}\" ({:.2})",
                name, candidate, result.score
            );
            let _ = writeln!(out, "  photoUrl: {}", locator);
        }
        _ => {
            let _ = writeln!(
                out,
                "No good match for \"{}\" (best {:.2}, threshold {:.2})",
                name, result.score, threshold
            );
        }
    }

    out
}
