//! Hit budget.
//!
//! Converts continuous energy/balance parameters into integer target hit
//! counts per voice, bounded by zone-derived floors and a shared ceiling.

use crate::zone::EnergyZone;

/// Target hit count for the anchor voice.
///
/// `energy == 0` is a hard special case returning 0 regardless of the
/// zone floor; the floor only applies once energy is non-zero.
pub fn anchor_target(
    energy: f32,
    pattern_length: u8,
    zone: EnergyZone,
    build_density_multiplier: f32,
) -> u32 {
    if energy <= 0.0 {
        return 0;
    }
    let max_hits = (pattern_length as f32 / 3.0).floor().max(1.0);
    let min_hits = zone.min_anchor_hits() as f32;
    let raw =
        energy * pattern_length as f32 * zone.density_factor() * build_density_multiplier;
    raw.clamp(min_hits, max_hits).round() as u32
}

/// Target hit count for the shimmer voice, derived from the anchor target.
///
/// `balance == 0` forces 0 regardless of the anchor target.
pub fn shimmer_target(anchor_target: u32, balance: f32, zone: EnergyZone) -> u32 {
    if balance <= 0.0 || anchor_target == 0 {
        return 0;
    }
    let cap = zone.shimmer_ratio_cap();
    let ratio = (balance * 1.5).min(cap);
    (anchor_target as f32 * ratio).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_energy_gives_zero_target() {
        assert_eq!(anchor_target(0.0, 32, EnergyZone::Peak, 1.0), 0);
    }

    #[test]
    fn target_respects_max_hits_cap() {
        let t = anchor_target(1.0, 32, EnergyZone::Peak, 2.0);
        assert!(t <= 32 / 3);
    }

    #[test]
    fn target_respects_min_hits_floor() {
        let t = anchor_target(0.01, 32, EnergyZone::Peak, 1.0);
        assert!(t >= EnergyZone::Peak.min_anchor_hits());
    }

    #[test]
    fn zero_balance_gives_zero_shimmer() {
        assert_eq!(shimmer_target(10, 0.0, EnergyZone::Peak), 0);
    }

    #[test]
    fn peak_zone_allows_larger_shimmer_ratio() {
        let s = shimmer_target(4, 1.0, EnergyZone::Peak);
        assert_eq!(s, (4.0f32 * 1.5).round() as u32);
    }

    #[test]
    fn minimal_groove_cap_shimmer_ratio_at_one() {
        let s = shimmer_target(4, 1.0, EnergyZone::Groove);
        assert_eq!(s, 4);
    }
}
