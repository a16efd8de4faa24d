//! Top-level generation pipeline.
//!
//! Wires every stage into the single real-time entry point: zones, then
//! field, then budget, then selection, then voice derivation, then guard
//! rails, then aux, then velocity. No step reaches back into an earlier
//! one.

use crate::build_arc;
use crate::budget;
use crate::euclid;
use crate::field;
use crate::guard;
use crate::hash::slot;
use crate::mask::StepMask;
use crate::metric::MetricTable;
use crate::params::{PatternParams, PatternResult, MAX_PATTERN_LENGTH};
use crate::selector;
use crate::velocity;
use crate::voice;
use crate::zone::EnergyZone;

/// Fixed additive boost applied to anchor weights at Euclidean-on
/// positions before selection, scaled by the effective ratio.
const EUCLID_BOOST: f32 = 0.5;

/// Generate one bar's pattern from `params`. Pure, total, allocation-free:
/// every buffer here is stack-resident and fixed-capacity.
pub fn generate(params: PatternParams) -> PatternResult {
    profiling::scope!("groove_core::generate");

    let params = params.sanitized();
    let energy_zone = EnergyZone::classify(params.energy);
    let metric_table = MetricTable::for_length(params.pattern_length);

    let effective = field::compute(
        params.genre,
        params.axis_x,
        params.axis_y,
        params.shape,
        params.pattern_length,
        params.seed,
    );

    let swing_amount = (effective.swing_amount * params.swing).min(energy_zone.swing_ceiling());

    if params.energy <= 0.0 {
        return PatternResult::silent(params.pattern_length, swing_amount);
    }

    let build_mods = build_arc::compute(params.build, params.phrase_progress);

    let anchor_target = budget::anchor_target(
        params.energy,
        params.pattern_length,
        energy_zone,
        build_mods.density_multiplier,
    );
    let shimmer_target = budget::shimmer_target(anchor_target, params.balance, energy_zone);

    let anchor_mask = select_anchor(&effective, &params, energy_zone, anchor_target);

    let anchor_mask = guard::enforce_beat1(anchor_mask, params.shape, params.seed);
    let anchor_mask = guard::repair_max_gap(
        anchor_mask,
        params.pattern_length,
        energy_zone.max_gap_for_length(params.pattern_length),
        StepMask::full(params.pattern_length),
    );

    let shimmer_mask = voice::derive_shimmer(
        anchor_mask,
        &effective.shimmer,
        metric_table.as_slice(),
        params.pattern_length,
        shimmer_target,
        energy_zone.min_spacing(),
        params.seed,
        None,
    );

    let aux_mask = crate::aux::generate_aux(
        params.axis_y,
        params.energy,
        params.pattern_length,
        metric_table.as_slice(),
        anchor_mask,
        shimmer_mask,
        params.seed,
    );

    let anchor_vel = velocity::assign_anchor(
        anchor_mask,
        metric_table.as_slice(),
        params.accent,
        build_mods,
        params.seed,
        params.pattern_length,
    );
    let shimmer_vel = velocity::assign_shimmer(
        shimmer_mask,
        metric_table.as_slice(),
        params.accent,
        build_mods,
        params.seed,
        params.pattern_length,
    );
    let aux_vel = velocity::assign_aux(
        aux_mask,
        metric_table.as_slice(),
        params.energy,
        build_mods,
        params.seed,
        params.pattern_length,
    );

    PatternResult {
        anchor_mask,
        shimmer_mask,
        aux_mask,
        anchor_vel,
        shimmer_vel,
        aux_vel,
        pattern_length: params.pattern_length,
        swing_amount,
    }
}

fn select_anchor(
    effective: &field::EffectiveWeights,
    params: &PatternParams,
    energy_zone: EnergyZone,
    anchor_target: u32,
) -> StepMask {
    let mut weights = [0.0f32; MAX_PATTERN_LENGTH];
    weights[..params.pattern_length as usize]
        .copy_from_slice(&effective.anchor[..params.pattern_length as usize]);

    let ratio = euclid::effective_ratio(params.genre, energy_zone.euclidean_active(), params.axis_x);
    if ratio > 0.0 && anchor_target > 0 {
        let euclid_mask = euclid::bjorklund(anchor_target.min(params.pattern_length as u32) as u8, params.pattern_length);
        let rotation = euclid::seed_rotation(params.seed, params.pattern_length);
        let euclid_mask = euclid::rotate(euclid_mask, rotation, params.pattern_length);
        for step in euclid_mask.iter_ones(params.pattern_length) {
            weights[step as usize] += ratio * EUCLID_BOOST;
        }
    }

    selector::select(
        &weights,
        params.pattern_length,
        StepMask::full(params.pattern_length),
        anchor_target,
        energy_zone.min_spacing(),
        params.seed,
        slot::GUMBEL_ANCHOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Genre;

    fn sample_params() -> PatternParams {
        PatternParams {
            energy: 0.5,
            shape: 0.3,
            axis_x: 0.5,
            axis_y: 0.5,
            drift: 0.0,
            accent: 0.5,
            balance: 0.5,
            build: 0.5,
            swing: 0.5,
            phrase_progress: 0.0,
            genre: Genre::Techno,
            pattern_length: 32,
            seed: 0xDEAD_BEEF,
        }
    }

    #[test]
    fn determinism() {
        let p = sample_params();
        let a = generate(p);
        let b = generate(p);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_energy_is_silent() {
        let mut p = sample_params();
        p.energy = 0.0;
        let result = generate(p);
        assert!(result.anchor_mask.is_empty());
        assert!(result.shimmer_mask.is_empty());
        assert!(result.aux_mask.is_empty());
        assert!(result.anchor_vel.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn voice_disjointness() {
        let p = sample_params();
        let result = generate(p);
        assert!(!result.anchor_mask.intersects(result.shimmer_mask));
    }

    #[test]
    fn velocity_mask_consistency() {
        let p = sample_params();
        let result = generate(p);
        for i in 0..p.pattern_length {
            assert_eq!(
                result.anchor_vel[i as usize] > 0.0,
                result.anchor_mask.is_set(i)
            );
        }
    }

    #[test]
    fn budget_bound_respected() {
        let mut p = sample_params();
        p.energy = 1.0;
        let result = generate(p);
        assert!(result.anchor_mask.popcount() <= p.pattern_length as u32 / 3);
    }

    #[test]
    fn beat1_stable_below_wild_shape() {
        let mut p = sample_params();
        p.shape = 0.2;
        let result = generate(p);
        assert!(result.anchor_mask.is_set(0));
    }

    #[test]
    fn four_on_floor_scenario() {
        let p = PatternParams {
            energy: 0.23,
            shape: 0.0,
            axis_x: 0.0,
            axis_y: 0.3,
            drift: 0.0,
            accent: 0.5,
            balance: 0.5,
            build: 0.5,
            swing: 0.0,
            phrase_progress: 0.0,
            genre: Genre::Techno,
            pattern_length: 32,
            seed: 0xDEAD_BEEF,
        };
        let result = generate(p);
        for step in [0u8, 8, 16, 24] {
            assert!(result.anchor_mask.is_set(step), "missing step {step}");
        }
        assert!(result.anchor_mask.popcount() <= 10);
    }
}
