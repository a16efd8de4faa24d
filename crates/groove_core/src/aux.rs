//! Aux generator.
//!
//! A third, independent voice whose style is chosen by `axisY` rather than
//! selected through the archetype field. Aux density is independent of the
//! anchor/shimmer targets.

use crate::hash::{hash_to_unit, slot};
use crate::mask::StepMask;
use crate::params::MAX_PATTERN_LENGTH;
use crate::selector;

/// Aux hit density relative to `energy · patternLength`, independent of
/// zone (the aux voice has no zone-derived floor/ceiling of its own).
const AUX_DENSITY_FACTOR: f32 = 0.5;

/// Collision attenuation applied where aux would land on an anchor or
/// shimmer hit: discouraged, not forbidden.
const COLLISION_ATTENUATION: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxStyle {
    Offbeat8ths,
    Syncopated16ths,
    Polyrhythmic,
    Displaced,
    InverseMetric,
}

fn choose_seed_varied_substyle(seed: u32) -> AuxStyle {
    let u = hash_to_unit(seed, slot::AUX_SUBSTYLE);
    if u < 1.0 / 3.0 {
        AuxStyle::Polyrhythmic
    } else if u < 2.0 / 3.0 {
        AuxStyle::Displaced
    } else {
        AuxStyle::InverseMetric
    }
}

pub fn choose_style(axis_y: f32, seed: u32) -> AuxStyle {
    if axis_y < 0.33 {
        AuxStyle::Offbeat8ths
    } else if axis_y < 0.66 {
        AuxStyle::Syncopated16ths
    } else {
        choose_seed_varied_substyle(seed)
    }
}

fn style_weights(
    style: AuxStyle,
    metric_weights: &[f32],
    pattern_length: u8,
) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for i in 0..pattern_length as usize {
        w[i] = match style {
            AuxStyle::Offbeat8ths => {
                if i % 2 == 1 {
                    0.8
                } else {
                    0.2
                }
            }
            AuxStyle::Syncopated16ths => {
                if i % 4 == 1 || i % 4 == 3 {
                    0.7
                } else {
                    0.35
                }
            }
            AuxStyle::Polyrhythmic => {
                if i % 3 == 0 {
                    0.8
                } else {
                    0.2
                }
            }
            AuxStyle::Displaced => {
                if i % 4 == 2 || i % 8 == 5 {
                    0.75
                } else {
                    0.2
                }
            }
            AuxStyle::InverseMetric => 1.0 - 0.5 * metric_weights[i],
        };
    }
    w
}

/// Select the aux mask for this bar.
pub fn generate_aux(
    axis_y: f32,
    energy: f32,
    pattern_length: u8,
    metric_weights: &[f32],
    anchor_mask: StepMask,
    shimmer_mask: StepMask,
    seed: u32,
) -> StepMask {
    let style = choose_style(axis_y, seed);
    let mut weights = style_weights(style, metric_weights, pattern_length);

    let collision = anchor_mask.union(shimmer_mask);
    for i in 0..pattern_length as usize {
        if collision.is_set(i as u8) {
            weights[i] *= COLLISION_ATTENUATION;
        }
    }

    let k = (energy * pattern_length as f32 * AUX_DENSITY_FACTOR).round() as u32;
    selector::select(
        &weights,
        pattern_length,
        StepMask::full(pattern_length),
        k,
        1,
        seed,
        slot::GUMBEL_AUX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_selection_by_axis_y() {
        assert_eq!(choose_style(0.1, 1), AuxStyle::Offbeat8ths);
        assert_eq!(choose_style(0.5, 1), AuxStyle::Syncopated16ths);
        assert!(matches!(
            choose_style(0.9, 1),
            AuxStyle::Polyrhythmic | AuxStyle::Displaced | AuxStyle::InverseMetric
        ));
    }

    #[test]
    fn zero_energy_yields_empty_aux() {
        let metric = [0.5f32; MAX_PATTERN_LENGTH];
        let mask = generate_aux(
            0.5,
            0.0,
            32,
            &metric,
            StepMask::EMPTY,
            StepMask::EMPTY,
            11,
        );
        assert!(mask.is_empty());
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let metric = [0.4f32; MAX_PATTERN_LENGTH];
        let a = generate_aux(0.8, 0.6, 32, &metric, StepMask::EMPTY, StepMask::EMPTY, 55);
        let b = generate_aux(0.8, 0.6, 32, &metric, StepMask::EMPTY, StepMask::EMPTY, 55);
        assert_eq!(a, b);
    }
}
