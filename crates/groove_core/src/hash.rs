//! Deterministic scalar hashing.
//!
//! Every source of pseudo-randomness in this crate (Gumbel perturbation,
//! beat-1 skip decisions, ghost injection, micro-variation, rotation offsets)
//! flows through [`hash`] / [`hash_to_unit`], keyed by `(seed, slot)`.
//! There is no runtime PRNG state: the same `(seed, slot)` pair always
//! produces the same value, and the mixer is a fixed bit-shift/multiply-xor
//! chain rather than a hashmap-oriented hasher, so results are stable across
//! builds and architectures, unlike `std::hash::DefaultHasher`, which carries
//! no cross-version stability guarantee.
//!
//! A documented, version-stable avalanche mix rather than a
//! `DefaultHasher`-based implementation, so bit-for-bit output stays fixed
//! across toolchain upgrades.

/// A 32-bit magic constant identifying a statistically independent hash
/// stream. Slot collisions are a bug; each constant below must be unique.
pub mod slot {
    pub const GUMBEL_ANCHOR: u32 = 0x9E37_79B1;
    pub const GUMBEL_SHIMMER: u32 = 0x85EB_CA6B;
    pub const GUMBEL_AUX: u32 = 0xC2B2_AE35;
    pub const ROTATION: u32 = 0x27D4_EB2F;
    pub const BEAT1_SKIP: u32 = 0x1656_67B1;
    pub const FIELD_NOISE: u32 = 0x7FEB_352D;
    pub const GHOST_GATE_ANCHOR: u32 = 0x846C_A68B;
    pub const GHOST_GATE_SHIMMER: u32 = 0xD168_AAAD;
    pub const GHOST_GATE_AUX: u32 = 0xB58C_23A1;
    pub const GHOST_VEL_ANCHOR: u32 = 0x4CD6_133D;
    pub const GHOST_VEL_SHIMMER: u32 = 0xA4CE_2DE5;
    pub const GHOST_VEL_AUX: u32 = 0x3F2D_8A21;
    pub const VEL_VAR_ANCHOR: u32 = 0x9F65_C2F3;
    pub const VEL_VAR_SHIMMER: u32 = 0x5F35_8E47;
    pub const VEL_VAR_AUX: u32 = 0xE403_9B15;
    pub const AUX_SUBSTYLE: u32 = 0xD6E8_FEB8;
    pub const SHADOW_DIRECTION: u32 = 0x1F83_D9AB;

    /// Debug-only collision check over the registry above. Assertion-class
    /// failure: a programmer error, never triggered by user input.
    #[cfg(debug_assertions)]
    pub fn debug_assert_no_collisions() {
        let all = [
            GUMBEL_ANCHOR,
            GUMBEL_SHIMMER,
            GUMBEL_AUX,
            ROTATION,
            BEAT1_SKIP,
            FIELD_NOISE,
            GHOST_GATE_ANCHOR,
            GHOST_GATE_SHIMMER,
            GHOST_GATE_AUX,
            GHOST_VEL_ANCHOR,
            GHOST_VEL_SHIMMER,
            GHOST_VEL_AUX,
            VEL_VAR_ANCHOR,
            VEL_VAR_SHIMMER,
            VEL_VAR_AUX,
            AUX_SUBSTYLE,
            SHADOW_DIRECTION,
        ];
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                debug_assert_ne!(all[i], all[j], "hash slot registry collision");
            }
        }
    }
}

/// Mix `(seed, slot)` into a well-avalanched 32-bit value.
///
/// A 64-bit splitmix-style finalizer applied to `seed` and `slot` packed
/// into a single 64-bit key. Deterministic and architecture-independent.
#[inline]
pub fn hash(seed: u32, slot: u32) -> u32 {
    let mut x = ((seed as u64) << 32) | (slot as u64);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    (x >> 32) as u32 ^ (x as u32)
}

/// Mix `(seed, slot)` into `[0, 1)`.
#[inline]
pub fn hash_to_unit(seed: u32, slot: u32) -> f32 {
    (hash(seed, slot) as f64 / (u32::MAX as u64 + 1) as f64) as f32
}

/// Combine a slot with a per-step index so independent streams can be
/// derived per step (e.g. `slot::GUMBEL_ANCHOR ^ step as u32`).
#[inline]
pub fn slot_for_step(slot: u32, step: u8) -> u32 {
    slot ^ (step as u32).wrapping_mul(0x0100_0193)
}
