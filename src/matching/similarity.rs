// Label similarity: how well a generic label substitutes for a branded one.
//
// Two signals feed the score:
//   - name similarity: Jaccard index of the two token sets
//   - ingredient similarity: which active compounds are shared (coverage)
//     and how close their doses are (dosage score)
//
// When the labels share at least one ingredient, ingredients dominate:
//
//   score = 0.3 * name + 0.7 * (0.7 * coverage + 0.3 * dosage)
//
// Otherwise the score falls back to name similarity alone. Every term is in
// [0, 1] and the weights sum to 1, so the score is too.

use std::collections::{BTreeMap, BTreeSet};

use super::normalize::{normalize, NormalizedLabel};

/// Weights for the composite similarity formula.
#[derive(Debug, Clone)]
pub struct SimilarityWeights {
    /// Share of the name signal when ingredients overlap (default 0.3)
    pub name_weight: f64,
    /// Share of the ingredient signal when ingredients overlap (default 0.7)
    pub ingredient_weight: f64,
    /// Share of coverage inside the ingredient signal (default 0.7)
    pub coverage_weight: f64,
    /// Share of dose closeness inside the ingredient signal (default 0.3)
    pub dosage_weight: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            name_weight: 0.3,
            ingredient_weight: 0.7,
            coverage_weight: 0.7,
            dosage_weight: 0.3,
        }
    }
}

/// Ingredient-side terms, present only when the labels share a compound.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientSimilarity {
    /// Names present in both labels
    pub common: Vec<String>,
    /// |common| / |union|
    pub coverage: f64,
    /// Mean dose closeness over common names
    pub dosage_score: f64,
    /// coverage_weight * coverage + dosage_weight * dosage_score
    pub combined: f64,
}

/// Every intermediate term of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub name_similarity: f64,
    pub ingredient: Option<IngredientSimilarity>,
    pub score: f64,
}

/// Score a branded label against a generic label with default weights.
pub fn score(branded_raw: &str, generic_raw: &str) -> f64 {
    score_breakdown(branded_raw, generic_raw, &SimilarityWeights::default()).score
}

/// Score two raw labels and keep the intermediate terms.
pub fn score_breakdown(
    branded_raw: &str,
    generic_raw: &str,
    weights: &SimilarityWeights,
) -> ScoreBreakdown {
    let branded = normalize(branded_raw);
    let generic = normalize(generic_raw);
    score_labels(&branded, &generic, weights)
}

/// Score two already-normalized labels.
pub fn score_labels(
    branded: &NormalizedLabel,
    generic: &NormalizedLabel,
    weights: &SimilarityWeights,
) -> ScoreBreakdown {
    let name_similarity = jaccard(branded.tokens(), generic.tokens());
    let ingredient = ingredient_similarity(branded.ingredients(), generic.ingredients(), weights);

    let score = match &ingredient {
        Some(ing) => weights.name_weight * name_similarity + weights.ingredient_weight * ing.combined,
        None => name_similarity,
    };

    ScoreBreakdown {
        name_similarity,
        ingredient,
        score,
    }
}

/// Jaccard index of two token sets. Zero when both are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Closeness of two doses: 1 minus the relative difference, floored at 0.
/// Two zero doses are identical.
pub fn dose_closeness(dose_a: f64, dose_b: f64) -> f64 {
    let max_dose = dose_a.max(dose_b);
    if max_dose <= 0.0 {
        return 1.0;
    }
    let relative_diff = (dose_a - dose_b).abs() / max_dose;
    1.0 - relative_diff.min(1.0)
}

/// Ingredient terms, or `None` when the labels share no ingredient name.
fn ingredient_similarity(
    a: &BTreeMap<String, f64>,
    b: &BTreeMap<String, f64>,
    weights: &SimilarityWeights,
) -> Option<IngredientSimilarity> {
    let common: Vec<String> = a.keys().filter(|k| b.contains_key(*k)).cloned().collect();
    if common.is_empty() {
        return None;
    }

    let union = a.keys().chain(b.keys()).collect::<BTreeSet<_>>().len();
    let coverage = common.len() as f64 / union as f64;

    let closeness_sum: f64 = common.iter().map(|k| dose_closeness(a[k], b[k])).sum();
    let dosage_score = closeness_sum / common.len() as f64;

    let combined = weights.coverage_weight * coverage + weights.dosage_weight * dosage_score;

    Some(IngredientSimilarity {
        common,
        coverage,
        dosage_score,
        combined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_labels() {
        let s = score("Paracetamol 500mg", "Paracetamol 500mg");
        assert!((s - 1.0).abs() < 1e-9, "Identical labels should score 1.0, got {s}");
    }

    #[test]
    fn test_dose_closeness() {
        assert!((dose_closeness(500.0, 400.0) - 0.8).abs() < 1e-9);
        assert!((dose_closeness(0.0, 0.0) - 1.0).abs() < 1e-9);
        assert!(dose_closeness(500.0, 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_dose_difference() {
        // name: {paracetamol, 500mg} vs {paracetamol, 400mg} -> 1/3
        // ingredient: 0.7 * 1.0 + 0.3 * 0.8 = 0.94
        // score: 0.3 * 1/3 + 0.7 * 0.94 = 0.758
        let s = score("Paracetamol 500mg", "Paracetamol 400mg");
        assert!((s - 0.758).abs() < 1e-9, "Expected 0.758, got {s}");
    }

    #[test]
    fn test_no_overlap_falls_back_to_names() {
        let b = score_breakdown(
            "Paracetamol 500mg",
            "Acetaminophen 500mg",
            &SimilarityWeights::default(),
        );
        assert!(b.ingredient.is_none());
        // tokens {paracetamol, 500mg} vs {acetaminophen, 500mg} -> 1/3
        assert!((b.score - 1.0 / 3.0).abs() < 1e-9, "got {}", b.score);
    }

    #[test]
    fn test_empty_labels_score_zero() {
        assert_eq!(score("", ""), 0.0);
        assert_eq!(score("Paracetamol 500mg", ""), 0.0);
    }
}
