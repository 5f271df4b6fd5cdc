//! Selection bias from aggregate category statistics
//!
//! Turns population-level `(category, average score, count)` tuples into
//! priority multipliers that boost under-represented angles for variety.

use serde::{Deserialize, Serialize};

use crate::selector::{AngleCandidate, SEED_MODULUS};

/// Multiplier applied to the seed-selected bias signal
const SEED_BOOST: f64 = 1.3;

/// Aggregate statistics for one anonymized signal category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub average_score: f64,
    pub count: u64,
}

impl CategoryStat {
    pub fn new(category: impl Into<String>, average_score: f64, count: u64) -> Self {
        Self {
            category: category.into(),
            average_score,
            count,
        }
    }
}

/// Priority multiplier for one angle key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasSignal {
    pub angle_key: String,
    pub bias_weight: f64,
}

/// Angle key a signal category feeds, if any
fn angle_for_category(category: &str) -> Option<&'static str> {
    match category {
        "سوال" => Some("angle-clarification"),
        "کمک" => Some("angle-steps"),
        "احساسی" => Some("angle-empathetic"),
        "مدنی" => Some("civic"),
        "اجتماعی" => Some("angle-reframe"),
        _ => None,
    }
}

/// Inverse-frequency weight for a category's share of all signals
fn weight_for_proportion(proportion: f64) -> f64 {
    if proportion < 0.1 {
        2.0
    } else if proportion < 0.2 {
        1.5
    } else if proportion < 0.3 {
        1.0
    } else {
        0.5
    }
}

/// Sum of all counts, saturating at `u64::MAX`
fn total_count(aggregate_stats: &[CategoryStat]) -> u64 {
    aggregate_stats
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.count))
}

/// Calculate bias weights for angle selection.
///
/// Returns an empty list when there are no stats or the total count is
/// zero. With a seed, the signal at `seed mod signal_count` is boosted by 1.3.
pub fn calculate_angle_bias(
    aggregate_stats: &[CategoryStat],
    aggregate_seed: Option<u64>,
) -> Vec<BiasSignal> {
    let total = total_count(aggregate_stats);
    if total == 0 {
        return Vec::new();
    }

    let mut signals: Vec<BiasSignal> = aggregate_stats
        .iter()
        .filter_map(|stat| {
            let angle_key = angle_for_category(&stat.category)?;
            let proportion = stat.count as f64 / total as f64;
            Some(BiasSignal {
                angle_key: angle_key.to_string(),
                bias_weight: weight_for_proportion(proportion),
            })
        })
        .collect();

    if let Some(seed) = aggregate_seed {
        if !signals.is_empty() {
            let index = (seed % signals.len() as u64) as usize;
            signals[index].bias_weight *= SEED_BOOST;
        }
    }

    signals
}

/// Multiply each candidate's priority by its matching bias weight.
///
/// Candidates without a matching signal keep their priority. Order is
/// preserved; callers re-rank if they need to.
pub fn apply_bias_to_angles(
    candidates: &[AngleCandidate],
    bias_signals: &[BiasSignal],
) -> Vec<AngleCandidate> {
    candidates
        .iter()
        .map(|candidate| {
            let mut biased = candidate.clone();
            if let Some(bias) = bias_signals.iter().find(|b| b.angle_key == candidate.key) {
                biased.priority *= bias.bias_weight;
            }
            biased
        })
        .collect()
}

/// Aggregate seed from population statistics: `Σcount mod 10000`.
///
/// `None` when there are no stats or every count is zero.
pub fn derive_aggregate_seed(aggregate_stats: &[CategoryStat]) -> Option<u64> {
    let total = total_count(aggregate_stats);
    if total == 0 {
        None
    } else {
        Some(total % SEED_MODULUS)
    }
}
