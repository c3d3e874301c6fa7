//! Camera, orbit and material settings for the grass view.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial eye position
    pub camera_position: [f32; 3],
    /// Orbit pivot
    pub camera_target: [f32; 3],
    /// Lens focal length in millimetres (35 mm film)
    pub focal_length: f32,
    pub near: f32,
    pub far: f32,

    /// Polar angle limits in radians, measured down from +Y
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,

    /// Clear color (linear RGB)
    pub sky_color: [f32; 3],
    /// Samples per pixel, 1 (off) or 4
    pub msaa_samples: u32,
    /// Sampled by blade UV for the field's color
    pub ground_texture: PathBuf,
    /// Scrolled over the field to drive wind gusts
    pub cloud_texture: PathBuf,
}

impl ViewConfig {
    pub fn new() -> Self {
        Self {
            camera_position: [-7.0, 3.0, 7.0],
            camera_target: [0.0, 0.0, 0.0],
            focal_length: 15.0,
            near: 0.1,
            far: 1000.0,
            min_polar_angle: 1.1,
            max_polar_angle: 1.45,
            enable_damping: true,
            damping_factor: 0.1,
            rotate_speed: 1.0,
            sky_color: [0.55, 0.75, 0.95],
            msaa_samples: 4,
            ground_texture: PathBuf::from("grass.jpg"),
            cloud_texture: PathBuf::from("cloud.jpg"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.focal_length > 0.0) {
            return Err(Error::Config(format!("focal_length must be positive, got {}", self.focal_length)));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(Error::Config(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.min_polar_angle >= 0.0
            && self.min_polar_angle <= self.max_polar_angle
            && self.max_polar_angle <= std::f32::consts::PI)
        {
            return Err(Error::Config(format!(
                "polar limits must satisfy 0 <= min <= max <= pi, got [{}, {}]",
                self.min_polar_angle, self.max_polar_angle
            )));
        }
        if self.enable_damping && !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(Error::Config(format!(
                "damping_factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        // The only counts every WebGPU adapter supports for render targets
        if !matches!(self.msaa_samples, 1 | 4) {
            return Err(Error::Config(format!("msaa_samples must be 1 or 4, got {}", self.msaa_samples)));
        }
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new()
    }
}
