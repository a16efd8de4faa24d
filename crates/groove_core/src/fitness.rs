//! Fitness evaluator.
//!
//! Host-side only; never called from the per-bar real-time path. Scores
//! a [`PatternResult`] against zone-dependent target ranges.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mask::StepMask;
use crate::metric::MetricTable;
use crate::params::{PatternParams, PatternResult};
use crate::zone::{EnergyZone, ShapeZone};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TargetRange {
    pub lo: f32,
    pub hi: f32,
}

impl TargetRange {
    fn validate(self, metric: &'static str) -> Result<Self, ConfigError> {
        if self.lo > self.hi {
            return Err(ConfigError::InvertedRange {
                metric,
                lo: self.lo,
                hi: self.hi,
            });
        }
        if !(0.0..=1.0).contains(&self.lo) || !(0.0..=1.0).contains(&self.hi) {
            return Err(ConfigError::OutOfBounds {
                metric,
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(self)
    }

    fn center(self) -> f32 {
        (self.lo + self.hi) / 2.0
    }

    fn width(self) -> f32 {
        ((self.hi - self.lo) / 2.0).max(1e-6)
    }

    fn score(self, raw: f32) -> f32 {
        let distance = (raw - self.center()).abs();
        (1.0 - (distance / self.width()).powi(2)).max(0.0)
    }
}

/// Target ranges for the three ShapeZones, plus density bucketed by
/// EnergyZone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TargetTable {
    pub syncopation: [TargetRange; 3],
    pub velocity_range: [TargetRange; 3],
    pub voice_separation: [TargetRange; 3],
    pub regularity: [TargetRange; 3],
    pub density: [TargetRange; 4],
}

fn shape_zone_index(zone: ShapeZone) -> usize {
    match zone {
        ShapeZone::Stable => 0,
        ShapeZone::Syncopated => 1,
        ShapeZone::Wild => 2,
    }
}

fn energy_zone_index(zone: EnergyZone) -> usize {
    match zone {
        EnergyZone::Minimal => 0,
        EnergyZone::Groove => 1,
        EnergyZone::Build => 2,
        EnergyZone::Peak => 3,
    }
}

/// Default target table, used in testing and as the out-of-the-box
/// configuration.
pub const DEFAULT_TARGETS: TargetTable = TargetTable {
    syncopation: [
        TargetRange { lo: 0.00, hi: 0.20 },
        TargetRange { lo: 0.55, hi: 0.85 },
        TargetRange { lo: 0.60, hi: 1.00 },
    ],
    velocity_range: [
        TargetRange { lo: 0.12, hi: 0.38 },
        TargetRange { lo: 0.32, hi: 0.58 },
        TargetRange { lo: 0.25, hi: 0.72 },
    ],
    voice_separation: [
        TargetRange { lo: 0.75, hi: 0.95 },
        TargetRange { lo: 0.70, hi: 0.95 },
        TargetRange { lo: 0.65, hi: 0.95 },
    ],
    regularity: [
        TargetRange { lo: 0.72, hi: 1.00 },
        TargetRange { lo: 0.42, hi: 0.68 },
        TargetRange { lo: 0.55, hi: 0.85 },
    ],
    density: [
        TargetRange { lo: 0.05, hi: 0.20 },
        TargetRange { lo: 0.20, hi: 0.40 },
        TargetRange { lo: 0.40, hi: 0.60 },
        TargetRange { lo: 0.55, hi: 0.85 },
    ],
};

impl TargetTable {
    /// Parse and validate an override table from JSON.
    pub fn from_json(text: &str) -> Result<TargetTable, ConfigError> {
        let table: TargetTable = serde_json::from_str(text)?;
        for (name, ranges) in [
            ("syncopation", table.syncopation.as_slice()),
            ("velocityRange", table.velocity_range.as_slice()),
            ("voiceSeparation", table.voice_separation.as_slice()),
            ("regularity", table.regularity.as_slice()),
            ("density", table.density.as_slice()),
        ] {
            for r in ranges {
                r.validate(name)?;
            }
        }
        Ok(table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub syncopation: f32,
    pub density: f32,
    pub velocity_range: f32,
    pub voice_separation: f32,
    pub regularity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub raw: RawMetrics,
    pub scores: RawMetrics,
    pub composite: f32,
    pub zone: ShapeZone,
}

fn syncopation(mask: StepMask, pattern_length: u8, weights: &[f32]) -> f32 {
    let mut num = 0.0f32;
    let mut den = 0.0f32;
    for i in 0..pattern_length {
        if !mask.is_set(i) {
            continue;
        }
        let next = (i + 1) % pattern_length;
        if !mask.is_set(next) {
            let contribution = (weights[next as usize] - weights[i as usize]).max(0.0);
            num += contribution;
            den += contribution;
        }
    }
    if den <= 0.0 {
        0.0
    } else {
        (num / den).clamp(0.0, 1.0)
    }
}

fn density(
    anchor: StepMask,
    shimmer: StepMask,
    aux: StepMask,
    pattern_length: u8,
) -> f32 {
    let any = anchor.union(shimmer).union(aux);
    any.popcount() as f32 / pattern_length as f32
}

fn velocity_range(result: &PatternResult) -> f32 {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    let mut any = false;
    for i in 0..result.pattern_length as usize {
        for &v in &[
            result.anchor_vel[i],
            result.shimmer_vel[i],
            result.aux_vel[i],
        ] {
            if v > 0.0 {
                any = true;
                min = min.min(v);
                max = max.max(v);
            }
        }
    }
    if !any {
        0.0
    } else {
        max - min
    }
}

fn voice_separation(
    anchor: StepMask,
    shimmer: StepMask,
    aux: StepMask,
    pattern_length: u8,
) -> f32 {
    let any = anchor.union(shimmer).union(aux);
    let active = any.popcount();
    if active == 0 {
        return 1.0;
    }
    let mut overlap = 0u32;
    for i in 0..pattern_length {
        let count = [anchor, shimmer, aux]
            .iter()
            .filter(|m| m.is_set(i))
            .count();
        if count >= 2 {
            overlap += 1;
        }
    }
    1.0 - overlap as f32 / active as f32
}

fn regularity(anchor: StepMask, pattern_length: u8) -> f32 {
    let hits: Vec<u8> = anchor.iter_ones(pattern_length).collect();
    if hits.len() < 2 {
        return 0.5;
    }
    let mut gaps = Vec::with_capacity(hits.len());
    for w in 0..hits.len() {
        let from = hits[w];
        let to = hits[(w + 1) % hits.len()];
        let gap = (to as i32 - from as i32).rem_euclid(pattern_length as i32) as f32;
        gaps.push(gap);
    }
    let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
    if mean <= 0.0 {
        return 0.5;
    }
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f32>() / gaps.len() as f32;
    let cv = variance.sqrt() / mean;
    1.0 - cv.min(1.0)
}

/// Compute raw Pentagon metrics for `result`.
pub fn compute_raw(result: &PatternResult) -> RawMetrics {
    let metric = MetricTable::for_length(result.pattern_length);
    RawMetrics {
        syncopation: syncopation(result.anchor_mask, result.pattern_length, metric.as_slice()),
        density: density(
            result.anchor_mask,
            result.shimmer_mask,
            result.aux_mask,
            result.pattern_length,
        ),
        velocity_range: velocity_range(result),
        voice_separation: voice_separation(
            result.anchor_mask,
            result.shimmer_mask,
            result.aux_mask,
            result.pattern_length,
        ),
        regularity: regularity(result.anchor_mask, result.pattern_length),
    }
}

/// Score `result` against `targets`, zoned by `params.shape`/`params.energy`.
pub fn evaluate(result: &PatternResult, params: &PatternParams, targets: &TargetTable) -> FitnessReport {
    let shape_zone = ShapeZone::classify(params.shape);
    let energy_zone = EnergyZone::classify(params.energy);
    let raw = compute_raw(result);

    let sz = shape_zone_index(shape_zone);
    let ez = energy_zone_index(energy_zone);

    let scores = RawMetrics {
        syncopation: targets.syncopation[sz].score(raw.syncopation),
        density: targets.density[ez].score(raw.density),
        velocity_range: targets.velocity_range[sz].score(raw.velocity_range),
        voice_separation: targets.voice_separation[sz].score(raw.voice_separation),
        regularity: targets.regularity[sz].score(raw.regularity),
    };

    let composite = 0.30 * scores.syncopation
        + 0.25 * scores.velocity_range
        + 0.25 * scores.voice_separation
        + 0.20 * scores.regularity;

    FitnessReport {
        raw,
        scores,
        composite,
        zone: shape_zone,
    }
}
