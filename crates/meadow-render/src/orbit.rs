//! Orbit camera controls: rotate around a fixed target on a sphere of fixed
//! radius, with polar limits and optional damping. Pan and zoom are not
//! supported.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::ViewConfig;

const POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    /// Azimuth around +Y, zero along +Z
    theta: f32,
    /// Polar angle down from +Y
    phi: f32,

    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,

    pending_theta: f32,
    pending_phi: f32,
}

impl OrbitControls {
    /// Orbit `target` starting from `eye`. Limits are wide open and
    /// damping is off until configured.
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let (theta, phi) = if radius == 0.0 {
            (0.0, PI * 0.5)
        } else {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        };

        Self {
            target,
            radius,
            theta,
            phi,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        let mut controls = Self::new(config.camera_position.into(), config.camera_target.into());
        controls.min_polar_angle = config.min_polar_angle;
        controls.max_polar_angle = config.max_polar_angle;
        controls.enable_damping = config.enable_damping;
        controls.damping_factor = config.damping_factor;
        controls.rotate_speed = config.rotate_speed;
        controls
    }

    /// Queue a rotation from a pointer drag of (`dx`, `dy`) pixels. A drag
    /// across the full viewport height turns the camera a full circle.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.pending_theta -= TAU * dx / height * self.rotate_speed;
        self.pending_phi -= TAU * dy / height * self.rotate_speed;
    }

    /// Advance one frame and return the new eye position.
    ///
    /// With damping on, only `damping_factor` of the queued rotation is
    /// applied and the rest decays, so motion eases out over later frames.
    pub fn update(&mut self) -> Vec3 {
        if self.enable_damping {
            self.theta += self.pending_theta * self.damping_factor;
            self.phi += self.pending_phi * self.damping_factor;
        } else {
            self.theta += self.pending_theta;
            self.phi += self.pending_phi;
        }

        self.theta = wrap_angle(self.theta);
        self.phi = self
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        if self.enable_damping {
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }

        self.eye()
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + Vec3::new(
                self.radius * sin_phi * sin_theta,
                self.radius * cos_phi,
                self.radius * sin_phi * cos_theta,
            )
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// Keep the azimuth in (-pi, pi] so it does not drift without bound.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_controls() -> OrbitControls {
        OrbitControls::from_config(&ViewConfig::default())
    }

    #[test]
    fn starts_at_configured_eye() {
        let controls = default_controls();
        assert!(controls.eye().abs_diff_eq(Vec3::new(-7.0, 3.0, 7.0), 1e-4));
        assert!((controls.radius() - 107f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn first_update_keeps_eye_inside_limits() {
        let mut controls = default_controls();
        let eye = controls.update();
        assert!(eye.abs_diff_eq(Vec3::new(-7.0, 3.0, 7.0), 1e-4));
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut controls = default_controls();
        controls.enable_damping = false;
        controls.rotate(0.0, -10_000.0, 720.0);
        controls.update();
        assert!((controls.polar_angle() - 1.45).abs() < 1e-6);

        controls.rotate(0.0, 10_000.0, 720.0);
        controls.update();
        assert!((controls.polar_angle() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn radius_never_changes() {
        let mut controls = default_controls();
        for i in 0..50 {
            controls.rotate(i as f32 * 3.0, -(i as f32), 720.0);
            let eye = controls.update();
            assert!((eye.distance(controls.target) - controls.radius()).abs() < 1e-3);
        }
    }

    #[test]
    fn damping_eases_rotation_over_frames() {
        let mut controls = default_controls();
        controls.min_polar_angle = 0.0;
        controls.max_polar_angle = PI;
        let start = controls.azimuth();

        controls.rotate(-72.0, 0.0, 720.0);
        controls.update();
        let first_step = controls.azimuth() - start;
        let expected_total = TAU * 72.0 / 720.0;
        assert!((first_step - expected_total * 0.1).abs() < 1e-5);

        let before = controls.azimuth();
        controls.update();
        let second_step = controls.azimuth() - before;
        assert!((second_step - expected_total * 0.09).abs() < 1e-5);

        for _ in 0..500 {
            controls.update();
        }
        assert!((controls.azimuth() - start - expected_total).abs() < 1e-3);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut controls = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        controls.rotate(-180.0, 0.0, 720.0);
        let eye = controls.update();
        // quarter turn from +Z towards +X
        assert!(eye.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
        assert!(controls.update().abs_diff_eq(eye, 1e-6));
    }

    #[test]
    fn wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert!(wrap_angle(PI + 0.5) < 0.0);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }
}
