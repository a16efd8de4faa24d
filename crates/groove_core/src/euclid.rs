//! Euclidean rhythm generator.
//!
//! Bjorklund's algorithm distributes `k` hits as evenly as possible across
//! `n` steps, using the bucket-accumulator formulation, generalized to
//! return a [`StepMask`] instead of a `Vec<bool>`.

use crate::hash::{hash, slot};
use crate::mask::StepMask;

/// Build the `n`-step mask with `k` evenly distributed hits, `k <= n`.
/// `k == 0` or `n == 0` yields an empty mask.
pub fn bjorklund(k: u8, n: u8) -> StepMask {
    if n == 0 || k == 0 {
        return StepMask::EMPTY;
    }
    let k = k.min(n);

    // Bucket accumulator: step i is a hit iff floor(i*k/n) != floor((i-1)*k/n).
    let mut mask = StepMask::EMPTY;
    let mut prev_bucket = -1i32;
    for i in 0..n {
        let bucket = (i as u32 * k as u32 / n as u32) as i32;
        if bucket != prev_bucket {
            mask.set(i);
        }
        prev_bucket = bucket;
    }
    mask
}

/// Rotate a Euclidean mask right by `r` positions over `n` steps.
pub fn rotate(mask: StepMask, r: u32, n: u8) -> StepMask {
    mask.rotate_right(r, n)
}

/// Deterministic rotation amount for `(seed, n)`: `hash(seed,
/// kRotationSlot) mod n`.
pub fn seed_rotation(seed: u32, n: u8) -> u32 {
    if n == 0 {
        return 0;
    }
    hash(seed, slot::ROTATION) % n as u32
}

/// Base Euclidean blend ratio at `axisX = 0`, before the per-genre zone
/// gate and the axisX falloff are applied.
pub fn base_ratio(genre: crate::params::Genre) -> f32 {
    use crate::params::Genre;
    match genre {
        Genre::Techno => 0.70,
        Genre::Tribal => 0.40,
        Genre::Idm => 0.00,
    }
}

/// Effective Euclidean blend ratio after the zone gate and axisX falloff.
pub fn effective_ratio(genre: crate::params::Genre, zone_active: bool, axis_x: f32) -> f32 {
    if !zone_active {
        return 0.0;
    }
    let base = base_ratio(genre);
    base * (1.0 - 0.7 * axis_x.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Genre;

    #[test]
    fn three_against_eight_matches_tresillo() {
        let m = bjorklund(3, 8);
        assert_eq!(m.popcount(), 3);
        assert!(m.is_set(0));
        assert!(m.is_set(3));
        assert!(m.is_set(6));
    }

    #[test]
    fn k_equals_n_is_full() {
        assert_eq!(bjorklund(5, 5), StepMask::full(5));
    }

    #[test]
    fn k_zero_is_empty() {
        assert_eq!(bjorklund(0, 8), StepMask::EMPTY);
    }

    #[test]
    fn rotation_is_deterministic_and_bounded() {
        let r1 = seed_rotation(42, 16);
        let r2 = seed_rotation(42, 16);
        assert_eq!(r1, r2);
        assert!(r1 < 16);
    }

    #[test]
    fn idm_ratio_always_zero() {
        assert_eq!(effective_ratio(Genre::Idm, true, 0.0), 0.0);
    }

    #[test]
    fn axis_x_reduces_ratio() {
        let at_zero = effective_ratio(Genre::Techno, true, 0.0);
        let at_one = effective_ratio(Genre::Techno, true, 1.0);
        assert!((at_zero - 0.70).abs() < 1e-6);
        assert!((at_one - 0.70 * 0.3).abs() < 1e-6);
    }

    #[test]
    fn inactive_zone_forces_zero() {
        assert_eq!(effective_ratio(Genre::Techno, false, 0.0), 0.0);
    }
}
