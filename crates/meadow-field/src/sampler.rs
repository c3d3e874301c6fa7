//! Field sampler: uniform points on a disk, each with a field-space UV.

use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// A point on the ground plane (`y == 0`) plus its UV in the field's
/// bounding square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    pub position: Vec3,
    pub uv: Vec2,
}

/// Linearly remap `value` from `[old_min, old_max]` to `[new_min, new_max]`.
///
/// Precondition: `old_max != old_min`. A degenerate source range yields NaN
/// or infinity; callers validate their ranges up front.
#[inline]
pub fn convert_range(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    debug_assert!(old_max != old_min, "convert_range: empty source range");
    ((value - old_min) / (old_max - old_min)) * (new_max - new_min) + new_min
}

/// Draw one point uniformly distributed over a disk of diameter `field_size`
/// centered on the origin.
///
/// Consumes exactly two draws from `rng`: radius then angle. The square
/// root on the radius keeps the density uniform per unit area instead of
/// piling points up near the center.
pub fn sample_point<R: Rng + ?Sized>(field_size: f32, rng: &mut R) -> SampledPoint {
    debug_assert!(field_size > 0.0, "sample_point: field_size must be positive");

    let half = field_size * 0.5;
    let r = half * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * TAU;
    let (sin, cos) = theta.sin_cos();

    let position = Vec3::new(r * cos, 0.0, r * sin);
    let uv = Vec2::new(
        convert_range(position.x, -half, half, 0.0, 1.0),
        convert_range(position.z, -half, half, 0.0, 1.0),
    );

    SampledPoint { position, uv }
}

/// Draw `count` points over the disk. See [`sample_point`].
pub fn sample<R: Rng + ?Sized>(count: usize, field_size: f32, rng: &mut R) -> Vec<SampledPoint> {
    (0..count).map(|_| sample_point(field_size, rng)).collect()
}
