//! Camera utilities

use glam::{Mat4, Vec3};

/// Film gauge used to turn a focal length into a field of view (35 mm film).
pub const FILM_GAUGE_MM: f32 = 35.0;

/// Camera data for rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Camera {
    /// Combined view-projection matrix
    pub view_proj: Mat4,
    /// Camera position in world space
    pub position: Vec3,
    /// Milliseconds since the animation clock started (drives the wind)
    pub time: f32,
}

impl Camera {
    /// Create a perspective camera
    pub fn perspective(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
        time: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(position, target, up);
        let proj = Mat4::perspective_rh(fov_y, aspect, near, far);
        let view_proj = proj * view;

        Self {
            view_proj,
            position,
            time,
        }
    }
}

/// Vertical field of view (radians) for a lens of `focal_length_mm` on
/// 35 mm film. Wide viewports keep the horizontal film extent fixed, so the
/// film height shrinks as `aspect` grows past 1.
pub fn fov_from_focal_length(focal_length_mm: f32, aspect: f32) -> f32 {
    let film_height = FILM_GAUGE_MM / aspect.max(1.0);
    2.0 * (0.5 * film_height / focal_length_mm).atan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_wgsl() {
        // mat4x4<f32> + vec3<f32> + f32
        assert_eq!(std::mem::size_of::<Camera>(), 80);
    }

    #[test]
    fn focal_length_fov_square_viewport() {
        let fov = fov_from_focal_length(15.0, 1.0);
        assert!((fov - 2.0 * (17.5f32 / 15.0).atan()).abs() < 1e-6);
    }

    #[test]
    fn focal_length_fov_narrows_for_wide_viewports() {
        let square = fov_from_focal_length(15.0, 1.0);
        let wide = fov_from_focal_length(15.0, 16.0 / 9.0);
        let tall = fov_from_focal_length(15.0, 0.5);
        assert!(wide < square);
        assert_eq!(tall, square);
    }

    #[test]
    fn perspective_projects_target_to_center() {
        let cam = Camera::perspective(
            Vec3::new(-7.0, 3.0, 7.0),
            Vec3::ZERO,
            Vec3::Y,
            1.0,
            1.5,
            0.1,
            1000.0,
            0.0,
        );
        let clip = cam.view_proj * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
