//! Property-based invariant tests for field generation.
//!
//! 1. sample() returns exactly `count` points, all inside the disk.
//! 2. convert_range hits both endpoints and is monotonic.
//! 3. Every blade has 5 vertices and 9 indices within its own range.
//! 4. Vertex colors follow the base/mid/tip gradient.
//! 5. Tip rise is within [height, height + variation].
//! 6. Buffer lengths scale exactly with the blade count.

use meadow_field::{
    build_blade, convert_range, sample, Blade, BladeParams, FieldConfig, FieldGenerator,
    INDICES_PER_BLADE, VERTICES_PER_BLADE,
};
use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ─────────────────────────────────────────────────────────────

fn blade_params() -> impl Strategy<Value = BladeParams> {
    (0.0f32..1.0, 0.0f32..3.0, 0.0f32..2.0).prop_map(|(width, height, height_variation)| {
        BladeParams { width, height, height_variation }
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Sampler count and disk bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sample_count_and_bounds(count in 0usize..500, size in 0.01f32..500.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = sample(count, size, &mut rng);
        prop_assert_eq!(points.len(), count);

        let max_sq = (size * 0.5) * (size * 0.5) * (1.0 + 1e-4);
        for p in &points {
            let r_sq = p.position.x * p.position.x + p.position.z * p.position.z;
            prop_assert!(r_sq <= max_sq, "point {:?} outside disk of size {}", p.position, size);
            prop_assert_eq!(p.position.y, 0.0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. convert_range endpoints and monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn convert_range_endpoints(lo in -1000.0f32..1000.0, span in 0.01f32..1000.0) {
        let hi = lo + span;
        prop_assert_eq!(convert_range(lo, lo, hi, 0.0, 1.0), 0.0);
        prop_assert!((convert_range(hi, lo, hi, 0.0, 1.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn convert_range_is_monotonic(a in -15.0f32..15.0, b in -15.0f32..15.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(convert_range(lo, -15.0, 15.0, 0.0, 1.0) <= convert_range(hi, -15.0, 15.0, 0.0, 1.0));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–5. Per-blade structure, colors, height
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn blade_structure(
        params in blade_params(),
        base in 0u32..1_000_000,
        x in -50.0f32..50.0,
        z in -50.0f32..50.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let center = Vec3::new(x, 0.0, z);
        let blade = build_blade(center, base * VERTICES_PER_BLADE, Vec2::new(0.3, 0.6), &params, &mut rng);
        let first = base * VERTICES_PER_BLADE;

        prop_assert_eq!(blade.vertices.len(), VERTICES_PER_BLADE as usize);
        prop_assert_eq!(blade.indices.len(), INDICES_PER_BLADE);
        for &i in &blade.indices {
            prop_assert!(i >= first && i <= first + 4);
        }

        let v = &blade.vertices;
        prop_assert_eq!(v[Blade::BOTTOM_LEFT].color, Vec3::ZERO);
        prop_assert_eq!(v[Blade::BOTTOM_RIGHT].color, Vec3::ZERO);
        prop_assert_eq!(v[Blade::MID_LEFT].color, Vec3::splat(0.5));
        prop_assert_eq!(v[Blade::MID_RIGHT].color, Vec3::splat(0.5));
        prop_assert_eq!(v[Blade::TIP].color, Vec3::ONE);

        let rise = blade.tip().position.y - center.y;
        prop_assert!(rise >= params.height);
        prop_assert!(rise <= params.height + params.height_variation);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Buffer lengths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn buffer_lengths_scale_with_blade_count(blades in 0u32..2_000, seed in any::<u64>()) {
        let config = FieldConfig::new().with_blade_count(blades).with_seed(seed);
        let mesh = FieldGenerator::new(config).unwrap().generate_from_config();
        let n = blades as usize;

        prop_assert_eq!(mesh.positions.len(), n * 15);
        prop_assert_eq!(mesh.colors.len(), n * 15);
        prop_assert_eq!(mesh.uvs.len(), n * 10);
        prop_assert_eq!(mesh.indices.len(), n * 9);
        prop_assert!(mesh.indices.iter().all(|&i| (i as usize) < n * 5));
    }
}
