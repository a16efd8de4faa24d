//! Velocity engine.
//!
//! Per-hit velocity as a deterministic function of metric weight, accent
//! (or energy, for aux), build modifiers, and seed. Ghost injection and
//! micro-variation are folded in before the final clamp.

use crate::build_arc::BuildModifiers;
use crate::hash::{hash_to_unit, slot_for_step};
use crate::mask::StepMask;
use crate::params::MAX_PATTERN_LENGTH;

struct VoiceSlots {
    ghost_gate: u32,
    ghost_vel: u32,
    vel_var: u32,
}

const ANCHOR_SLOTS: VoiceSlots = VoiceSlots {
    ghost_gate: crate::hash::slot::GHOST_GATE_ANCHOR,
    ghost_vel: crate::hash::slot::GHOST_VEL_ANCHOR,
    vel_var: crate::hash::slot::VEL_VAR_ANCHOR,
};
const SHIMMER_SLOTS: VoiceSlots = VoiceSlots {
    ghost_gate: crate::hash::slot::GHOST_GATE_SHIMMER,
    ghost_vel: crate::hash::slot::GHOST_VEL_SHIMMER,
    vel_var: crate::hash::slot::VEL_VAR_SHIMMER,
};
const AUX_SLOTS: VoiceSlots = VoiceSlots {
    ghost_gate: crate::hash::slot::GHOST_GATE_AUX,
    ghost_vel: crate::hash::slot::GHOST_VEL_AUX,
    vel_var: crate::hash::slot::VEL_VAR_AUX,
};

/// `accent_like` is `accent` for anchor/shimmer voices or `energy` for aux.
fn velocity_for_step(
    metric_weight: f32,
    accent_like: f32,
    build: BuildModifiers,
    seed: u32,
    step: u8,
    slots: &VoiceSlots,
) -> f32 {
    let floor = (0.85 - accent_like * 0.65).clamp(0.20, 0.85);
    let ceiling = 0.88 + accent_like * 0.12;
    let mut velocity = floor + metric_weight * (ceiling - floor);

    if metric_weight < 0.5 && accent_like > 0.5 {
        let ghost_prob = (accent_like - 0.5) * 0.4;
        let roll = hash_to_unit(seed, slot_for_step(slots.ghost_gate, step));
        if roll < ghost_prob {
            let ghost_roll = hash_to_unit(seed, slot_for_step(slots.ghost_vel, step));
            velocity = 0.15 + ghost_roll * 0.15;
        }
    }

    velocity += build.velocity_boost;
    if build.force_accents && metric_weight > 0.3 {
        velocity = velocity.max(ceiling - 0.1);
    }

    let micro_amplitude = 0.02 + accent_like * 0.06;
    velocity += (hash_to_unit(seed, slot_for_step(slots.vel_var, step)) - 0.5) * micro_amplitude;

    velocity.clamp(0.10, 1.0)
}

fn assign(
    mask: StepMask,
    metric_weights: &[f32],
    accent_like: f32,
    build: BuildModifiers,
    seed: u32,
    pattern_length: u8,
    slots: &VoiceSlots,
) -> [f32; MAX_PATTERN_LENGTH] {
    let mut vel = [0.0f32; MAX_PATTERN_LENGTH];
    for step in mask.iter_ones(pattern_length) {
        vel[step as usize] = velocity_for_step(
            metric_weights[step as usize],
            accent_like,
            build,
            seed,
            step,
            slots,
        );
    }
    vel
}

pub fn assign_anchor(
    mask: StepMask,
    metric_weights: &[f32],
    accent: f32,
    build: BuildModifiers,
    seed: u32,
    pattern_length: u8,
) -> [f32; MAX_PATTERN_LENGTH] {
    assign(
        mask,
        metric_weights,
        accent,
        build,
        seed,
        pattern_length,
        &ANCHOR_SLOTS,
    )
}

pub fn assign_shimmer(
    mask: StepMask,
    metric_weights: &[f32],
    accent: f32,
    build: BuildModifiers,
    seed: u32,
    pattern_length: u8,
) -> [f32; MAX_PATTERN_LENGTH] {
    assign(
        mask,
        metric_weights,
        accent * 0.7,
        build,
        seed,
        pattern_length,
        &SHIMMER_SLOTS,
    )
}

pub fn assign_aux(
    mask: StepMask,
    metric_weights: &[f32],
    energy: f32,
    build: BuildModifiers,
    seed: u32,
    pattern_length: u8,
) -> [f32; MAX_PATTERN_LENGTH] {
    assign(
        mask,
        metric_weights,
        energy,
        build,
        seed,
        pattern_length,
        &AUX_SLOTS,
    )
}
