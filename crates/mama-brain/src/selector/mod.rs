//! Deterministic template selection
//!
//! Hash-based choosers for the literal response banks and the coarser
//! angle-candidate selector. Given the same message, seed and previous
//! template key they always return the same result.

pub mod angles;
pub mod bank;

pub use angles::{
    AngleCandidate, AngleSelection, DepthResponse, MessageFeatures, compose_depth_response,
    derive_angle_candidates, select_primary_angle,
};
pub use bank::{
    TemplateSelection, select_civic_response, select_empathetic_response, select_from_bank,
};

/// Modulus applied when folding an aggregate seed into a selection hash
pub const SEED_MODULUS: u64 = 10_000;

/// Fold an optional aggregate seed into a hash: `(hash + seed) mod 10000`
pub fn fold_seed(hash: u64, aggregate_seed: Option<u64>) -> u64 {
    match aggregate_seed {
        Some(seed) => (hash % SEED_MODULUS + seed % SEED_MODULUS) % SEED_MODULUS,
        None => hash,
    }
}
