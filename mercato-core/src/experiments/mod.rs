//! A/B experiment assignment
//!
//! A signed-in user always lands in the same variant of an experiment: the
//! bucket is derived from SHA-256 of `"{experiment_id}:{user_id}"` (first 8
//! bytes, big-endian) modulo the total weight, then mapped onto the
//! cumulative weight ranges in declaration order. Anonymous visitors get a
//! weighted random draw.

use rand::Rng;
use sha2::{Digest, Sha256};
use shared::models::{Experiment, Variant};
use tracing::debug;

/// Deterministic bucket in `0..total_weight` for a user
pub fn bucket(experiment_id: &str, user_id: &str, total_weight: u64) -> u64 {
    let digest = Sha256::digest(format!("{}:{}", experiment_id, user_id).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % total_weight
}

/// Variant whose cumulative weight range contains `point`
fn variant_at(variants: &[Variant], point: u64) -> Option<&Variant> {
    let mut upper = 0u64;
    for variant in variants {
        upper += u64::from(variant.weight);
        if point < upper {
            return Some(variant);
        }
    }
    None
}

/// Pick a variant for `user_id` (`None` = anonymous)
///
/// Returns `None` for inactive experiments, experiments without variants,
/// and experiments whose weights sum to zero.
pub fn assign_variant<'a>(experiment: &'a Experiment, user_id: Option<&str>) -> Option<&'a Variant> {
    assign_variant_with_rng(experiment, user_id, &mut rand::thread_rng())
}

/// [`assign_variant`] with a caller supplied RNG for anonymous draws
pub fn assign_variant_with_rng<'a, R: Rng + ?Sized>(
    experiment: &'a Experiment,
    user_id: Option<&str>,
    rng: &mut R,
) -> Option<&'a Variant> {
    if !experiment.is_active {
        return None;
    }

    let total = experiment.total_weight();
    if total == 0 {
        return None;
    }

    let point = match user_id.filter(|id| !id.is_empty()) {
        Some(user_id) => bucket(&experiment.id, user_id, total),
        None => rng.gen_range(0..total),
    };

    let variant = variant_at(&experiment.variants, point);
    if let Some(v) = variant {
        debug!(experiment = %experiment.id, variant = %v.name, point, "Variant assigned");
    }
    variant
}
