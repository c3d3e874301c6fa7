//! Blade builder: one five-vertex grass blade around a ground point.
//!
//! ```text
//!          tc            tip, bent sideways by TIP_OFFSET
//!         /  \
//!       tl----tr         mid section, half the base width, at height/2
//!       |  \   |
//!       bl----br         base, full width, on the ground
//! ```
//!
//! Triangles: (bl, br, tr), (tr, tc, tl), (tl, bl, tr). The width axis is
//! randomly yawed per blade and the tip bends along an independent random
//! direction, so the fan is slightly twisted rather than a flat card.

use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::FieldConfig;

pub const VERTICES_PER_BLADE: u32 = 5;
pub const INDICES_PER_BLADE: usize = 9;

/// Lateral distance from the blade axis to the tip vertex.
pub const TIP_OFFSET: f32 = 0.1;

/// Vertex color gradient: dark at the base, light at the tip.
pub const BASE_COLOR: Vec3 = Vec3::ZERO;
pub const MID_COLOR: Vec3 = Vec3::splat(0.5);
pub const TIP_COLOR: Vec3 = Vec3::ONE;

/// Triangle list relative to the blade's first vertex.
pub const BLADE_INDICES: [u32; INDICES_PER_BLADE] = [0, 1, 2, 2, 4, 3, 3, 0, 2];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub color: Vec3,
}

/// Blade dimensions shared by every blade of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeParams {
    pub width: f32,
    pub height: f32,
    pub height_variation: f32,
}

impl From<&FieldConfig> for BladeParams {
    fn from(config: &FieldConfig) -> Self {
        Self {
            width: config.blade_width,
            height: config.blade_height,
            height_variation: config.blade_height_variation,
        }
    }
}

/// A single blade: its own five vertices and three triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Blade {
    pub vertices: [Vertex; VERTICES_PER_BLADE as usize],
    /// Absolute indices, already offset by the blade's base index.
    pub indices: [u32; INDICES_PER_BLADE],
}

impl Blade {
    pub const BOTTOM_LEFT: usize = 0;
    pub const BOTTOM_RIGHT: usize = 1;
    pub const MID_RIGHT: usize = 2;
    pub const MID_LEFT: usize = 3;
    pub const TIP: usize = 4;

    pub fn tip(&self) -> &Vertex {
        &self.vertices[Self::TIP]
    }
}

/// Unit vector in the ground plane for an angle measured from -Z towards +X.
#[inline]
fn ground_dir(angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(sin, 0.0, -cos)
}

/// Build the blade rooted at `center`.
///
/// Consumes exactly three draws from `rng`, in order: height jitter, yaw,
/// tip bend. `base_index` is the position of the blade's first vertex in the
/// shared vertex buffer.
pub fn build_blade<R: Rng + ?Sized>(
    center: Vec3,
    base_index: u32,
    uv: Vec2,
    params: &BladeParams,
    rng: &mut R,
) -> Blade {
    let height = params.height + rng.gen::<f32>() * params.height_variation;
    let yaw_dir = ground_dir(rng.gen::<f32>() * TAU);
    let tip_dir = ground_dir(rng.gen::<f32>() * TAU);

    let half_base = yaw_dir * (params.width * 0.5);
    let half_mid = yaw_dir * (params.width * 0.25);
    let mid_lift = Vec3::new(0.0, height * 0.5, 0.0);

    let bl = center + half_base;
    let br = center - half_base;
    let tr = center - half_mid + mid_lift;
    let tl = center + half_mid + mid_lift;
    let tc = center + tip_dir * TIP_OFFSET + Vec3::new(0.0, height, 0.0);

    let vertex = |position, color| Vertex { position, uv, color };

    Blade {
        vertices: [
            vertex(bl, BASE_COLOR),
            vertex(br, BASE_COLOR),
            vertex(tr, MID_COLOR),
            vertex(tl, MID_COLOR),
            vertex(tc, TIP_COLOR),
        ],
        indices: BLADE_INDICES.map(|i| base_index + i),
    }
}
