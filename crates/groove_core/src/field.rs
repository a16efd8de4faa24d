//! Pattern field.
//!
//! Bilinear blend of the four archetype corners by `(axisX, axisY)`,
//! plus a small seed-deterministic per-step noise term whose amplitude
//! grows with `shape`.

use crate::archetype::{tables_for, Archetype};
use crate::hash::{hash_to_unit, slot, slot_for_step};
use crate::params::{Genre, MAX_PATTERN_LENGTH};

/// Effective per-step weights and swing for one bar, after blending the
/// four archetype corners and adding field noise.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveWeights {
    pub anchor: [f32; MAX_PATTERN_LENGTH],
    pub shimmer: [f32; MAX_PATTERN_LENGTH],
    pub swing_amount: f32,
}

/// Three-segment piecewise-linear noise amplitude keyed off `shape`.
/// Breakpoints intentionally match the ShapeZone boundaries (0.30/0.70)
/// uniformly; do not reintroduce a mismatched pair of breakpoints here.
pub fn compute_noise_scale(shape: f32) -> f32 {
    let shape = shape.clamp(0.0, 1.0);
    if shape <= 0.30 {
        lerp(0.0, 0.10, shape / 0.30)
    } else if shape <= 0.70 {
        lerp(0.10, 0.25, (shape - 0.30) / 0.40)
    } else {
        lerp(0.25, 0.40, (shape - 0.70) / 0.30)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn bilinear_coefficients(axis_x: f32, axis_y: f32) -> (f32, f32, f32, f32) {
    let x = axis_x.clamp(0.0, 1.0);
    let y = axis_y.clamp(0.0, 1.0);
    let c00 = (1.0 - x) * (1.0 - y);
    let c10 = x * (1.0 - y);
    let c01 = (1.0 - x) * y;
    let c11 = x * y;
    (c00, c10, c01, c11)
}

/// Blend the four archetype corners for `genre` at `(axisX, axisY)` and add
/// seed-deterministic noise scaled by `shape`.
pub fn compute(
    genre: Genre,
    axis_x: f32,
    axis_y: f32,
    shape: f32,
    pattern_length: u8,
    seed: u32,
) -> EffectiveWeights {
    let (c00, c10, c01, c11) = bilinear_coefficients(axis_x, axis_y);
    let minimal = tables_for(genre, Archetype::Minimal);
    let groovy = tables_for(genre, Archetype::Groovy);
    let shimmery = tables_for(genre, Archetype::Shimmery);
    let chaos = tables_for(genre, Archetype::Chaos);

    let swing_amount = c00 * minimal.swing_amount
        + c10 * groovy.swing_amount
        + c01 * shimmery.swing_amount
        + c11 * chaos.swing_amount;

    let noise_scale = compute_noise_scale(shape);
    let mut anchor = [0.0f32; MAX_PATTERN_LENGTH];
    let mut shimmer = [0.0f32; MAX_PATTERN_LENGTH];

    for i in 0..pattern_length as usize {
        let blended_anchor = c00 * minimal.anchor[i]
            + c10 * groovy.anchor[i]
            + c01 * shimmery.anchor[i]
            + c11 * chaos.anchor[i];
        let blended_shimmer = c00 * minimal.shimmer[i]
            + c10 * groovy.shimmer[i]
            + c01 * shimmery.shimmer[i]
            + c11 * chaos.shimmer[i];

        let anchor_noise =
            (hash_to_unit(seed, slot_for_step(slot::FIELD_NOISE, i as u8)) - 0.5) * 2.0
                * noise_scale;
        let shimmer_noise = (hash_to_unit(
            seed,
            slot_for_step(slot::FIELD_NOISE, (i as u8).wrapping_add(64)),
        ) - 0.5)
            * 2.0
            * noise_scale;

        anchor[i] = (blended_anchor + anchor_noise).max(0.0);
        shimmer[i] = (blended_shimmer + shimmer_noise).max(0.0);
    }

    EffectiveWeights {
        anchor,
        shimmer,
        swing_amount,
    }
}
