//! Input/output value types.

use serde::{Deserialize, Serialize};

use crate::mask::StepMask;

/// Upper bound on `patternLength`; every fixed-capacity buffer in this
/// crate is sized to this constant.
pub const MAX_PATTERN_LENGTH: usize = 64;

/// The set of pattern lengths the generator accepts. Any other value is
/// coerced to the nearest member of this set.
pub const VALID_PATTERN_LENGTHS: [u8; 4] = [16, 24, 32, 64];

/// Style family; selects the archetype bank's weight tables and the
/// Euclidean-blend policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Genre {
    Techno,
    Tribal,
    Idm,
}

/// Continuous performance parameters for one bar.
///
/// All `f32` fields are nominally in `[0.0, 1.0]`; out-of-range values are
/// clamped rather than rejected. `generate` never errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatternParams {
    pub energy: f32,
    pub shape: f32,
    pub axis_x: f32,
    pub axis_y: f32,
    pub drift: f32,
    pub accent: f32,
    pub balance: f32,
    pub build: f32,
    pub swing: f32,
    pub phrase_progress: f32,
    pub genre: Genre,
    pub pattern_length: u8,
    pub seed: u32,
}

impl Default for PatternParams {
    fn default() -> Self {
        PatternParams {
            energy: 0.5,
            shape: 0.3,
            axis_x: 0.5,
            axis_y: 0.5,
            drift: 0.0,
            accent: 0.5,
            balance: 0.5,
            build: 0.5,
            swing: 0.0,
            phrase_progress: 0.0,
            genre: Genre::Techno,
            pattern_length: 32,
            seed: 0,
        }
    }
}

impl PatternParams {
    /// Clamp every continuous field to `[0, 1]` and coerce `pattern_length`
    /// to the nearest legal value. `generate` applies this first so the
    /// rest of the pipeline can assume legal input.
    pub fn sanitized(&self) -> PatternParams {
        let clamp01 = |v: f32| v.clamp(0.0, 1.0);
        PatternParams {
            energy: clamp01(self.energy),
            shape: clamp01(self.shape),
            axis_x: clamp01(self.axis_x),
            axis_y: clamp01(self.axis_y),
            drift: clamp01(self.drift),
            accent: clamp01(self.accent),
            balance: clamp01(self.balance),
            build: clamp01(self.build),
            swing: clamp01(self.swing),
            phrase_progress: clamp01(self.phrase_progress),
            genre: self.genre,
            pattern_length: nearest_valid_length(self.pattern_length),
            seed: self.seed,
        }
    }
}

fn nearest_valid_length(len: u8) -> u8 {
    *VALID_PATTERN_LENGTHS
        .iter()
        .min_by_key(|&&v| (v as i16 - len as i16).abs())
        .unwrap()
}

/// Output of one `generate` call.
///
/// Single-owner, produced fresh per call. `vel[i] > 0 ⇔` the corresponding
/// mask bit `i` is set (invariant checked by property tests in
/// `tests/invariants.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternResult {
    pub anchor_mask: StepMask,
    pub shimmer_mask: StepMask,
    pub aux_mask: StepMask,
    pub anchor_vel: [f32; MAX_PATTERN_LENGTH],
    pub shimmer_vel: [f32; MAX_PATTERN_LENGTH],
    pub aux_vel: [f32; MAX_PATTERN_LENGTH],
    pub pattern_length: u8,
    pub swing_amount: f32,
}

impl PatternResult {
    pub fn silent(pattern_length: u8, swing_amount: f32) -> PatternResult {
        PatternResult {
            anchor_mask: StepMask::EMPTY,
            shimmer_mask: StepMask::EMPTY,
            aux_mask: StepMask::EMPTY,
            anchor_vel: [0.0; MAX_PATTERN_LENGTH],
            shimmer_vel: [0.0; MAX_PATTERN_LENGTH],
            aux_vel: [0.0; MAX_PATTERN_LENGTH],
            pattern_length,
            swing_amount,
        }
    }
}

/// Opaque caller-owned drift state.
///
/// The generator never reads or writes this directly; it is the caller's
/// mechanism for evolving `seed` across phrases. Provided here as a small
/// convenience so callers don't have to invent their own mixing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftState {
    pub phrase_counter: u32,
    pub drift_seed: u32,
}

impl DriftState {
    /// Advance to the next phrase, folding `drift` into the next seed. A
    /// `drift` of 0 leaves `drift_seed` untouched, so the anchor pattern
    /// stays stable across phrases when the caller chooses not to advance
    /// the counter either.
    pub fn advance(&mut self, base_seed: u32, drift: f32) -> u32 {
        self.phrase_counter = self.phrase_counter.wrapping_add(1);
        if drift <= 0.0 {
            return base_seed;
        }
        let step = (drift * u32::MAX as f32) as u32;
        self.drift_seed = self
            .drift_seed
            .wrapping_add(step)
            .wrapping_add(self.phrase_counter);
        base_seed ^ self.drift_seed
    }
}
