//! Guard rails: beat-1 enforcement and max-gap repair.
//!
//! Applied in order, after selection and before velocity assignment.
//! Neither rail backtracks past the other; max-gap repair only ever adds
//! hits, never removes one the selector placed.

use arrayvec::ArrayVec;

use crate::hash::{hash_to_unit, slot};
use crate::mask::StepMask;
use crate::params::MAX_PATTERN_LENGTH;

/// Enforce or probabilistically skip the beat-1 hit, per `shape`.
pub fn enforce_beat1(mut anchor_mask: StepMask, shape: f32, seed: u32) -> StepMask {
    if shape < 0.7 {
        anchor_mask.set(0);
        return anchor_mask;
    }
    let skip_prob = ((shape - 0.7) / 0.3) * 0.4;
    let roll = hash_to_unit(seed, slot::BEAT1_SKIP);
    if roll >= skip_prob {
        anchor_mask.set(0);
    }
    anchor_mask
}

/// Repair runs of anchor rests longer than `max_gap`, inserting one hit at
/// each over-long gap's midpoint, snapped to the nearest position within
/// `eligibility`. Leaves a gap unrepaired if no eligible step exists in it.
///
/// `max_gap == None` (MINIMAL zone) disables the rail entirely.
pub fn repair_max_gap(
    mut anchor_mask: StepMask,
    pattern_length: u8,
    max_gap: Option<u8>,
    eligibility: StepMask,
) -> StepMask {
    let Some(max_gap) = max_gap else {
        return anchor_mask;
    };
    if anchor_mask.is_empty() || pattern_length == 0 {
        return anchor_mask;
    }

    for _ in 0..pattern_length {
        let hits: ArrayVec<u8, MAX_PATTERN_LENGTH> =
            anchor_mask.iter_ones(pattern_length).collect();
        if hits.len() < 2 {
            break;
        }

        let mut worst: Option<(u8, u8, u8)> = None; // (gap_len, from, to)
        for w in 0..hits.len() {
            let from = hits[w];
            let to = hits[(w + 1) % hits.len()];
            let gap_len = ((to as i32 - from as i32 - 1).rem_euclid(pattern_length as i32)) as u8;
            if worst.map(|(best, _, _)| gap_len > best).unwrap_or(true) {
                worst = Some((gap_len, from, to));
            }
        }

        let Some((gap_len, from, to)) = worst else {
            break;
        };
        if gap_len <= max_gap {
            break;
        }

        match nearest_eligible_midpoint(from, to, pattern_length, eligibility) {
            Some(step) => anchor_mask.set(step),
            None => break,
        }
    }

    anchor_mask
}

fn nearest_eligible_midpoint(
    from: u8,
    to: u8,
    pattern_length: u8,
    eligibility: StepMask,
) -> Option<u8> {
    let len = pattern_length as i32;
    let gap_len = (to as i32 - from as i32 - 1).rem_euclid(len);
    if gap_len <= 0 {
        return None;
    }
    let midpoint_offset = (gap_len + 1) / 2;
    let midpoint = ((from as i32 + midpoint_offset).rem_euclid(len)) as u8;

    if eligibility.is_set(midpoint) {
        return Some(midpoint);
    }
    // Search outward from the midpoint within the gap for the nearest
    // eligible step.
    for radius in 1..gap_len {
        let before = ((midpoint as i32 - radius).rem_euclid(len)) as u8;
        let after = ((midpoint as i32 + radius).rem_euclid(len)) as u8;
        let before_in_gap = is_within_open_gap(before, from, to, pattern_length);
        let after_in_gap = is_within_open_gap(after, from, to, pattern_length);
        if before_in_gap && eligibility.is_set(before) {
            return Some(before);
        }
        if after_in_gap && eligibility.is_set(after) {
            return Some(after);
        }
    }
    None
}

fn is_within_open_gap(step: u8, from: u8, to: u8, pattern_length: u8) -> bool {
    let len = pattern_length as i32;
    let rel = (step as i32 - from as i32).rem_euclid(len);
    let gap_len = (to as i32 - from as i32).rem_euclid(len);
    rel > 0 && rel < gap_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat1_forced_below_wild_threshold() {
        let m = enforce_beat1(StepMask::EMPTY, 0.5, 1);
        assert!(m.is_set(0));
    }

    #[test]
    fn beat1_sometimes_skipped_at_max_shape() {
        let mut skipped = 0;
        for seed in 0..200u32 {
            let m = enforce_beat1(StepMask::EMPTY, 1.0, seed);
            if !m.is_set(0) {
                skipped += 1;
            }
        }
        let freq = skipped as f32 / 200.0;
        assert!(freq > 0.1 && freq < 0.7, "freq={freq}");
    }

    #[test]
    fn max_gap_repair_fills_long_rest() {
        let mut mask = StepMask::EMPTY;
        mask.set(0);
        mask.set(31);
        let repaired = repair_max_gap(mask, 32, Some(4), StepMask::full(32));
        // Gap between 0 and 31 spans steps 1..=30, length 30 > 4.
        assert!(repaired.popcount() > mask.popcount());
    }

    #[test]
    fn max_gap_none_disables_repair() {
        let mut mask = StepMask::EMPTY;
        mask.set(0);
        let repaired = repair_max_gap(mask, 32, None, StepMask::full(32));
        assert_eq!(repaired, mask);
    }

    #[test]
    fn repair_respects_eligibility() {
        let mut mask = StepMask::EMPTY;
        mask.set(0);
        mask.set(20);
        // Nothing eligible inside the gap: repair should leave it alone.
        let mut eligibility = StepMask::full(32);
        for i in 1..20 {
            eligibility.clear(i);
        }
        let repaired = repair_max_gap(mask, 32, Some(4), eligibility);
        assert_eq!(repaired, mask);
    }

    #[test]
    fn single_hit_mask_is_untouched() {
        let mut mask = StepMask::EMPTY;
        mask.set(5);
        let repaired = repair_max_gap(mask, 32, Some(4), StepMask::full(32));
        assert_eq!(repaired, mask);
    }
}
