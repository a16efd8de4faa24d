//! Gumbel Top-K selector.
//!
//! Seed-deterministic weighted sampling without replacement, under a hard
//! minimum-spacing constraint. Every buffer is fixed-capacity so selection
//! never allocates.

use arrayvec::ArrayVec;

use crate::hash::{hash_to_unit, slot_for_step};
use crate::mask::StepMask;
use crate::params::MAX_PATTERN_LENGTH;

const EPSILON: f32 = 1e-6;

/// Gumbel(0,1) sample derived from `hashToUnit(seed, slot ^ step)`.
fn gumbel_sample(seed: u32, gumbel_slot: u32, step: u8) -> f32 {
    let u = hash_to_unit(seed, slot_for_step(gumbel_slot, step)).clamp(EPSILON, 1.0 - EPSILON);
    -(-(u.ln())).ln()
}

/// Select up to `k` step positions from `weights[..pattern_length]`,
/// restricted to `eligibility`, with cyclic spacing `>= min_spacing`
/// between any two accepted steps.
///
/// Returns fewer than `k` positions when spacing/eligibility constraints
/// cannot be satisfied; the caller's guard-rail stage is responsible for
/// any further repair.
pub fn select(
    weights: &[f32],
    pattern_length: u8,
    eligibility: StepMask,
    k: u32,
    min_spacing: u8,
    seed: u32,
    gumbel_slot: u32,
) -> StepMask {
    if k == 0 || pattern_length == 0 {
        return StepMask::EMPTY;
    }

    let mut scored: ArrayVec<(f32, u8), MAX_PATTERN_LENGTH> = ArrayVec::new();
    for i in 0..pattern_length {
        let w = weights[i as usize].max(0.0);
        let score = (w + EPSILON).ln() + gumbel_sample(seed, gumbel_slot, i);
        scored.push((score, i));
    }

    // Descending by score, ties broken by ascending step index via the
    // insertion comparator below (stable on equal scores since indices
    // are already ascending on insert).
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap().then(a.1.cmp(&b.1)));

    let mut accepted: ArrayVec<u8, MAX_PATTERN_LENGTH> = ArrayVec::new();
    let mut mask = StepMask::EMPTY;
    for &(_, step) in scored.iter() {
        if accepted.len() as u32 >= k {
            break;
        }
        if !eligibility.is_set(step) {
            continue;
        }
        let far_enough = accepted
            .iter()
            .all(|&other| StepMask::cyclic_distance(step, other, pattern_length) >= min_spacing);
        if far_enough {
            accepted.push(step);
            mask.set(step);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::slot;

    #[test]
    fn selects_exactly_k_when_feasible() {
        let weights = [1.0f32; 16];
        let mask = select(
            &weights,
            16,
            StepMask::full(16),
            4,
            1,
            42,
            slot::GUMBEL_ANCHOR,
        );
        assert_eq!(mask.popcount(), 4);
    }

    #[test]
    fn respects_eligibility() {
        let weights = [1.0f32; 16];
        let mut eligibility = StepMask::EMPTY;
        eligibility.set(0);
        eligibility.set(1);
        let mask = select(&weights, 16, eligibility, 4, 1, 7, slot::GUMBEL_SHIMMER);
        assert!(mask.difference(eligibility).is_empty());
    }

    #[test]
    fn respects_min_spacing() {
        let weights = [1.0f32; 16];
        let mask = select(
            &weights,
            16,
            StepMask::full(16),
            8,
            4,
            3,
            slot::GUMBEL_ANCHOR,
        );
        let steps: Vec<u8> = mask.iter_ones(16).collect();
        for i in 0..steps.len() {
            for j in (i + 1)..steps.len() {
                assert!(StepMask::cyclic_distance(steps[i], steps[j], 16) >= 4);
            }
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let weights = [0.5f32; 32];
        let a = select(
            &weights,
            32,
            StepMask::full(32),
            6,
            2,
            123,
            slot::GUMBEL_AUX,
        );
        let b = select(
            &weights,
            32,
            StepMask::full(32),
            6,
            2,
            123,
            slot::GUMBEL_AUX,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn zero_k_yields_empty() {
        let weights = [1.0f32; 16];
        let mask = select(&weights, 16, StepMask::full(16), 0, 1, 1, slot::GUMBEL_AUX);
        assert!(mask.is_empty());
    }
}
