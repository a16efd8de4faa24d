//! Metric weight tables.
//!
//! Canonical per-step "strength" for each supported `patternLength`,
//! pre-tabulated once and indexed by step. These are the spine every other
//! weight table (archetype, aux, velocity) is blended against.

use crate::params::MAX_PATTERN_LENGTH;

/// 16-step base pattern: downbeat, backbeat, offbeat, "e"/"a" weighting.
const BASE_16: [f32; 16] = [
    1.0, 0.1, 0.4, 0.1, 0.8, 0.1, 0.4, 0.1, 0.9, 0.1, 0.4, 0.1, 0.8, 0.1, 0.4, 0.1,
];

/// Eighth-note group strengths for the 24-step (6/8) variant: two main
/// beats of three eighths each.
const GROUPS_24: [f32; 6] = [1.0, 0.3, 0.5, 0.85, 0.3, 0.5];

/// A pre-tabulated metric weight vector for one `patternLength`.
#[derive(Debug, Clone, Copy)]
pub struct MetricTable {
    weights: [f32; MAX_PATTERN_LENGTH],
    len: u8,
}

impl MetricTable {
    pub fn for_length(pattern_length: u8) -> MetricTable {
        let mut weights = [0.0f32; MAX_PATTERN_LENGTH];
        match pattern_length {
            16 => weights[..16].copy_from_slice(&BASE_16),
            32 => {
                weights[..16].copy_from_slice(&BASE_16);
                weights[16..32].copy_from_slice(&BASE_16);
                weights[16] = 0.95;
            }
            64 => {
                let mut table32 = [0.0f32; 32];
                table32[..16].copy_from_slice(&BASE_16);
                table32[16..32].copy_from_slice(&BASE_16);
                table32[16] = 0.95;
                weights[..32].copy_from_slice(&table32);
                weights[32..64].copy_from_slice(&table32);
            }
            24 => {
                for (g, &strength) in GROUPS_24.iter().enumerate() {
                    let base = g * 4;
                    weights[base] = strength;
                    weights[base + 1] = 0.1;
                    weights[base + 2] = 0.25;
                    weights[base + 3] = 0.1;
                }
            }
            other => {
                // Unsupported length reached via sanitized() bypass; fall back
                // to a flat table rather than index out of bounds.
                for w in weights.iter_mut().take(other as usize) {
                    *w = 0.5;
                }
            }
        }
        MetricTable {
            weights,
            len: pattern_length,
        }
    }

    #[inline]
    pub fn get(&self, step: u8) -> f32 {
        self.weights[step as usize]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.weights[..self.len as usize]
    }
}
