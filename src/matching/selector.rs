// Best-match selection over a list of generic candidates.
//
// The branded label is normalized once, then every candidate with a
// generic name is scored against it. The highest score wins; on a tie the
// candidate that appears first in the input wins. The acceptance threshold
// is a caller decision: selection always returns the best candidate found,
// however weak, and `MatchResult::is_confident` lets the caller judge it.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::normalize::{normalize, NormalizedLabel};
use super::similarity::{score_labels, SimilarityWeights};
use crate::catalog::models::GenericCandidate;

/// Default acceptance threshold for calling a match confident.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Outcome of one matching run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    /// Best candidate, with `similarity_score` filled in
    pub candidate: Option<GenericCandidate>,
    pub score: f64,
}

impl MatchResult {
    /// Whether the match clears `threshold`. An empty result never does.
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.candidate.is_some() && self.score >= threshold
    }
}

/// Pick the best generic candidate for a branded label.
pub fn select_best(branded_raw: &str, candidates: &[GenericCandidate]) -> MatchResult {
    select_best_with(branded_raw, candidates, &SimilarityWeights::default())
}

/// [`select_best`] with explicit weights.
pub fn select_best_with(
    branded_raw: &str,
    candidates: &[GenericCandidate],
    weights: &SimilarityWeights,
) -> MatchResult {
    let branded = normalize(branded_raw);
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let Some(score) = candidate_score(&branded, candidate, weights) else {
            continue;
        };
        // Strictly greater: the first candidate keeps a tie.
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    into_result(best, candidates)
}

/// Same result as [`select_best`], with candidates scored across the rayon
/// thread pool. Ties go to the lowest index, so the answer does not depend
/// on how the work is split.
pub fn select_best_parallel(branded_raw: &str, candidates: &[GenericCandidate]) -> MatchResult {
    let branded = normalize(branded_raw);
    let weights = SimilarityWeights::default();

    let best = candidates
        .par_iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            candidate_score(&branded, candidate, &weights).map(|score| (index, score))
        })
        .reduce_with(|a, b| {
            if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                b
            } else {
                a
            }
        });

    into_result(best, candidates)
}

/// Score every named candidate and sort best-first. Equal scores keep
/// their input order. `limit` caps the number returned.
pub fn rank_candidates(
    branded_raw: &str,
    candidates: &[GenericCandidate],
    limit: Option<usize>,
) -> Vec<GenericCandidate> {
    let branded = normalize(branded_raw);
    let weights = SimilarityWeights::default();

    let mut ranked: Vec<GenericCandidate> = candidates
        .iter()
        .filter_map(|candidate| {
            candidate_score(&branded, candidate, &weights).map(|score| GenericCandidate {
                similarity_score: Some(score),
                ..candidate.clone()
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.similarity_score.unwrap_or(0.0);
        let b = b.similarity_score.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Score one candidate, or `None` if it has no usable generic name.
fn candidate_score(
    branded: &NormalizedLabel,
    candidate: &GenericCandidate,
    weights: &SimilarityWeights,
) -> Option<f64> {
    let name = candidate.label()?;
    let breakdown = score_labels(branded, &normalize(name), weights);
    debug!(generic = name, score = breakdown.score, "Scored candidate");
    Some(breakdown.score)
}

fn into_result(best: Option<(usize, f64)>, candidates: &[GenericCandidate]) -> MatchResult {
    match best {
        Some((index, score)) => MatchResult {
            candidate: Some(GenericCandidate {
                similarity_score: Some(score),
                ..candidates[index].clone()
            }),
            score,
        },
        None => MatchResult::default(),
    }
}
