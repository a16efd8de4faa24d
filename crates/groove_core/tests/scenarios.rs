//! End-to-end scenario tests through the public `generate`/`evaluate` API
//! only, at the fixed seed and parameter sets used as concrete examples.

use groove_core::fitness::{evaluate, DEFAULT_TARGETS};
use groove_core::{generate, Genre, PatternParams};

const SEED: u32 = 0xDEAD_BEEF;

fn base_params() -> PatternParams {
    PatternParams {
        energy: 0.0,
        shape: 0.5,
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
        seed: SEED,
    }
}

#[test]
fn silence_scenario() {
    let params = base_params();
    let result = generate(params);
    assert!(result.anchor_mask.is_empty());
    assert!(result.shimmer_mask.is_empty());
    assert!(result.aux_mask.is_empty());
    assert!(result.anchor_vel.iter().all(|&v| v == 0.0));
    assert!(result.shimmer_vel.iter().all(|&v| v == 0.0));
    assert!(result.aux_vel.iter().all(|&v| v == 0.0));
}

#[test]
fn four_on_floor_scenario() {
    let mut params = base_params();
    params.energy = 0.23;
    params.shape = 0.0;
    params.axis_x = 0.0;
    params.axis_y = 0.3;

    let result = generate(params);
    for step in [0u8, 8, 16, 24] {
        assert!(result.anchor_mask.is_set(step));
    }
    assert!(result.anchor_mask.popcount() <= 10);

    let report = evaluate(&result, &params, &DEFAULT_TARGETS);
    assert!(report.raw.regularity >= 0.85, "{}", report.raw.regularity);
    assert!(report.raw.syncopation <= 0.15, "{}", report.raw.syncopation);
}

#[test]
fn wild_zone_beat1_skip_frequency() {
    let mut skipped = 0;
    for seed in 0..100u32 {
        let mut params = base_params();
        params.energy = 0.6;
        params.shape = 1.0;
        params.accent = 0.7;
        params.seed = seed;
        let result = generate(params);
        if !result.anchor_mask.is_set(0) {
            skipped += 1;
        }
    }
    let freq = skipped as f32 / 100.0;
    assert!((0.15..=0.65).contains(&freq), "freq={freq}");
}

#[test]
fn stable_seed_invariance() {
    let mut a = base_params();
    a.energy = 0.5;
    a.shape = 0.15;
    a.seed = 0xAAAA_0000;
    let mut b = a;
    b.seed = 0xBBBB_0000;

    let result_a = generate(a);
    let result_b = generate(b);

    assert!(result_a.anchor_mask.is_set(0));
    assert!(result_b.anchor_mask.is_set(0));

    let report_a = evaluate(&result_a, &a, &DEFAULT_TARGETS);
    let report_b = evaluate(&result_b, &b, &DEFAULT_TARGETS);
    assert!(report_a.raw.regularity >= 0.70);
    assert!(report_b.raw.regularity >= 0.70);

    let hamming = (result_a.anchor_mask.0 ^ result_b.anchor_mask.0).count_ones();
    assert!(hamming <= 8, "hamming={hamming}");
}

#[test]
fn ghost_injection_at_high_accent() {
    let mut hits = 0;
    for seed in 0..50u32 {
        let mut params = base_params();
        params.energy = 0.6;
        params.shape = 0.4;
        params.accent = 1.0;
        params.seed = seed;
        let result = generate(params);
        let found = (0..params.pattern_length).any(|step| {
            result.anchor_mask.is_set(step)
                && (0.15..=0.30).contains(&result.anchor_vel[step as usize])
        });
        if found {
            hits += 1;
        }
    }
    let freq = hits as f32 / 50.0;
    assert!(freq >= 0.80, "freq={freq}");
}

#[test]
fn complement_disjointness_holds_when_balance_positive() {
    let mut params = base_params();
    params.energy = 0.5;
    params.balance = 0.8;
    let result = generate(params);
    assert!(!result.anchor_mask.intersects(result.shimmer_mask));
}

#[test]
fn all_supported_lengths_produce_valid_output() {
    for &len in &groove_core::VALID_PATTERN_LENGTHS {
        let mut params = base_params();
        params.energy = 0.6;
        params.pattern_length = len;
        let result = generate(params);
        assert_eq!(result.pattern_length, len);
        assert!(!result.anchor_mask.intersects(result.shimmer_mask));
        for i in 0..len {
            assert_eq!(
                result.anchor_vel[i as usize] > 0.0,
                result.anchor_mask.is_set(i)
            );
        }
    }
}
