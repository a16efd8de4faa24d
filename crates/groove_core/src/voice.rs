//! Voice relationship: COMPLEMENT, with optional SHADOW coupling.

use crate::hash::{hash, slot};
use crate::mask::StepMask;
use crate::params::MAX_PATTERN_LENGTH;
use crate::selector;

/// Blend weight given to the inverse metric weight when deriving shimmer
/// weights; pulls shimmer candidates toward off-the-beat positions.
const OFFBEAT_BIAS: f32 = 0.3;

/// Derive the shimmer mask from an already-selected anchor mask.
///
/// `voice_coupling >= 0.5` switches to SHADOW mode, mirroring the anchor
/// mask with a seed-derived one-step offset instead of running the
/// selector. Either path guarantees `anchorMask ∩ shimmerMask == ∅`.
#[allow(clippy::too_many_arguments)]
pub fn derive_shimmer(
    anchor_mask: StepMask,
    effective_shimmer: &[f32],
    metric_weights: &[f32],
    pattern_length: u8,
    shimmer_target: u32,
    min_spacing: u8,
    seed: u32,
    voice_coupling: Option<f32>,
) -> StepMask {
    if let Some(coupling) = voice_coupling {
        if coupling >= 0.5 {
            return shadow_mask(anchor_mask, pattern_length, seed);
        }
    }

    let eligibility = StepMask::full(pattern_length).difference(anchor_mask);
    if shimmer_target == 0 {
        return StepMask::EMPTY;
    }

    let mut weights = [0.0f32; MAX_PATTERN_LENGTH];
    for i in 0..pattern_length as usize {
        let inverse_metric = 1.0 - metric_weights[i];
        weights[i] = (1.0 - OFFBEAT_BIAS) * effective_shimmer[i] + OFFBEAT_BIAS * inverse_metric;
    }

    let shimmer_spacing = (min_spacing / 2).max(1);
    let shimmer = selector::select(
        &weights,
        pattern_length,
        eligibility,
        shimmer_target,
        shimmer_spacing,
        seed,
        slot::GUMBEL_SHIMMER,
    );
    // Selector already restricts to eligibility, but keep the invariant
    // explicit rather than implicit in selector behavior.
    shimmer.difference(anchor_mask)
}

fn shadow_mask(anchor_mask: StepMask, pattern_length: u8, seed: u32) -> StepMask {
    let delta: i32 = if hash(seed, slot::SHADOW_DIRECTION) % 2 == 0 {
        1
    } else {
        -1
    };
    let shifted = anchor_mask.cyclic_shift(delta, pattern_length);
    shifted.difference(anchor_mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_mode_is_disjoint_from_anchor() {
        let mut anchor = StepMask::EMPTY;
        anchor.set(0);
        anchor.set(8);
        anchor.set(16);
        anchor.set(24);
        let weights = [0.5f32; MAX_PATTERN_LENGTH];
        let metric = [0.3f32; MAX_PATTERN_LENGTH];
        let shimmer = derive_shimmer(anchor, &weights, &metric, 32, 4, 2, 7, None);
        assert!(!shimmer.intersects(anchor));
    }

    #[test]
    fn zero_target_yields_empty_shimmer() {
        let mut anchor = StepMask::EMPTY;
        anchor.set(0);
        let weights = [0.5f32; MAX_PATTERN_LENGTH];
        let metric = [0.3f32; MAX_PATTERN_LENGTH];
        let shimmer = derive_shimmer(anchor, &weights, &metric, 32, 0, 2, 7, None);
        assert!(shimmer.is_empty());
    }

    #[test]
    fn shadow_mode_is_disjoint_from_anchor() {
        let mut anchor = StepMask::EMPTY;
        anchor.set(0);
        anchor.set(1);
        anchor.set(2);
        let weights = [0.5f32; MAX_PATTERN_LENGTH];
        let metric = [0.3f32; MAX_PATTERN_LENGTH];
        let shimmer = derive_shimmer(anchor, &weights, &metric, 16, 3, 2, 7, Some(0.9));
        assert!(!shimmer.intersects(anchor));
    }

    #[test]
    fn shadow_mode_deterministic() {
        let mut anchor = StepMask::EMPTY;
        anchor.set(0);
        anchor.set(4);
        let weights = [0.5f32; MAX_PATTERN_LENGTH];
        let metric = [0.3f32; MAX_PATTERN_LENGTH];
        let a = derive_shimmer(anchor, &weights, &metric, 16, 2, 2, 99, Some(1.0));
        let b = derive_shimmer(anchor, &weights, &metric, 16, 2, 2, 99, Some(1.0));
        assert_eq!(a, b);
    }
}
