//! Zone classification.
//!
//! Coarse bucketing of the continuous `energy` / `shape` parameters used
//! for policy thresholds (min-spacing, budget caps, max-gap, Euclidean
//! activation). EnergyZone boundaries are hard; ShapeZone boundaries
//! crossfade within a small window so weight blends don't discontinue.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum EnergyZone {
    Minimal,
    Groove,
    Build,
    Peak,
}

impl EnergyZone {
    pub fn classify(energy: f32) -> EnergyZone {
        if energy < 0.20 {
            EnergyZone::Minimal
        } else if energy < 0.45 {
            EnergyZone::Groove
        } else if energy < 0.75 {
            EnergyZone::Build
        } else {
            EnergyZone::Peak
        }
    }

    /// Zone-derived selector min-spacing.
    pub fn min_spacing(self) -> u8 {
        match self {
            EnergyZone::Minimal => 4,
            EnergyZone::Groove => 2,
            EnergyZone::Build => 1,
            EnergyZone::Peak => 1,
        }
    }

    /// Zone-derived minimum anchor hit count.
    pub fn min_anchor_hits(self) -> u32 {
        match self {
            EnergyZone::Minimal => 1,
            EnergyZone::Groove => 3,
            EnergyZone::Build => 4,
            EnergyZone::Peak => 6,
        }
    }

    /// Zone-dependent anchor density factor.
    pub fn density_factor(self) -> f32 {
        match self {
            EnergyZone::Minimal => 0.6,
            EnergyZone::Groove => 0.8,
            EnergyZone::Build => 0.95,
            EnergyZone::Peak => 1.1,
        }
    }

    /// Shimmer-ratio cap relative to the anchor target.
    pub fn shimmer_ratio_cap(self) -> f32 {
        match self {
            EnergyZone::Minimal | EnergyZone::Groove => 1.0,
            EnergyZone::Build | EnergyZone::Peak => 1.5,
        }
    }

    /// Max permissible run of anchor rests before guard-rail repair,
    /// expressed for a 32-step pattern; scaled proportionally elsewhere.
    pub fn max_gap_at_32(self) -> Option<u8> {
        match self {
            EnergyZone::Minimal => None,
            EnergyZone::Groove => Some(8),
            EnergyZone::Build => Some(6),
            EnergyZone::Peak => Some(4),
        }
    }

    pub fn max_gap_for_length(self, pattern_length: u8) -> Option<u8> {
        self.max_gap_at_32().map(|gap_at_32| {
            let scaled = (gap_at_32 as u32 * pattern_length as u32) / 32;
            scaled.max(1) as u8
        })
    }

    /// Euclidean blend active only in MINIMAL/GROOVE.
    pub fn euclidean_active(self) -> bool {
        matches!(self, EnergyZone::Minimal | EnergyZone::Groove)
    }

    /// Upper bound on the final swing amount, within the archetype bank's
    /// `[0.5, 0.7]` range.
    pub fn swing_ceiling(self) -> f32 {
        match self {
            EnergyZone::Minimal => 0.55,
            EnergyZone::Groove => 0.65,
            EnergyZone::Build | EnergyZone::Peak => 0.70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum ShapeZone {
    Stable,
    Syncopated,
    Wild,
}

impl ShapeZone {
    pub fn classify(shape: f32) -> ShapeZone {
        if shape < 0.30 {
            ShapeZone::Stable
        } else if shape < 0.70 {
            ShapeZone::Syncopated
        } else {
            ShapeZone::Wild
        }
    }
}

/// Crossfade window half-width around each ShapeZone boundary.
const CROSSFADE_WINDOW: f32 = 0.05;

/// Linear crossfade weights for the two ShapeZones adjacent to `shape`.
///
/// Returns `(zone, blend)` where `blend` is the weight of the zone *beyond*
/// the boundary in `[0, 1]` when `shape` falls inside a crossfade window,
/// or `(classify(shape), 0.0)` elsewhere. Used only where a continuous
/// coefficient is needed (e.g. `ComputeNoiseScale`); policy decisions use
/// the hard hard `classify` above.
pub fn shape_zone_crossfade(shape: f32) -> (ShapeZone, f32) {
    let zone = ShapeZone::classify(shape);
    let boundary = match zone {
        ShapeZone::Stable => 0.30,
        ShapeZone::Syncopated => {
            if shape < 0.30 + CROSSFADE_WINDOW {
                0.30
            } else {
                0.70
            }
        }
        ShapeZone::Wild => 0.70,
    };
    let dist = (shape - boundary).abs();
    if dist < CROSSFADE_WINDOW {
        let blend = 0.5 + (shape - boundary) / (2.0 * CROSSFADE_WINDOW);
        (zone, blend.clamp(0.0, 1.0))
    } else {
        (zone, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_zone_boundaries() {
        assert_eq!(EnergyZone::classify(0.0), EnergyZone::Minimal);
        assert_eq!(EnergyZone::classify(0.19), EnergyZone::Minimal);
        assert_eq!(EnergyZone::classify(0.20), EnergyZone::Groove);
        assert_eq!(EnergyZone::classify(0.44), EnergyZone::Groove);
        assert_eq!(EnergyZone::classify(0.45), EnergyZone::Build);
        assert_eq!(EnergyZone::classify(0.74), EnergyZone::Build);
        assert_eq!(EnergyZone::classify(0.75), EnergyZone::Peak);
        assert_eq!(EnergyZone::classify(1.0), EnergyZone::Peak);
    }

    #[test]
    fn shape_zone_boundaries() {
        assert_eq!(ShapeZone::classify(0.0), ShapeZone::Stable);
        assert_eq!(ShapeZone::classify(0.29), ShapeZone::Stable);
        assert_eq!(ShapeZone::classify(0.30), ShapeZone::Syncopated);
        assert_eq!(ShapeZone::classify(0.69), ShapeZone::Syncopated);
        assert_eq!(ShapeZone::classify(0.70), ShapeZone::Wild);
    }

    #[test]
    fn max_gap_scales_with_length() {
        assert_eq!(EnergyZone::Peak.max_gap_for_length(32), Some(4));
        assert_eq!(EnergyZone::Peak.max_gap_for_length(16), Some(2));
        assert_eq!(EnergyZone::Peak.max_gap_for_length(64), Some(8));
        assert_eq!(EnergyZone::Minimal.max_gap_for_length(64), None);
    }

    #[test]
    fn swing_ceiling_within_archetype_range() {
        for zone in [
            EnergyZone::Minimal,
            EnergyZone::Groove,
            EnergyZone::Build,
            EnergyZone::Peak,
        ] {
            assert!((0.5..=0.7).contains(&zone.swing_ceiling()));
        }
    }

    #[test]
    fn euclidean_only_active_minimal_groove() {
        assert!(EnergyZone::Minimal.euclidean_active());
        assert!(EnergyZone::Groove.euclidean_active());
        assert!(!EnergyZone::Build.euclidean_active());
        assert!(!EnergyZone::Peak.euclidean_active());
    }
}
