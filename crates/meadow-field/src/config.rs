use serde::{Deserialize, Serialize};

use crate::{Error, Result, VERTICES_PER_BLADE};

/// Parameters of a generated grass field.
///
/// Set once before generation; the generator never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Diameter of the circular field, in world units.
    pub plane_size: f32,
    pub blade_count: u32,
    /// Width of a blade at its base. The mid section is half as wide.
    pub blade_width: f32,
    /// Minimum blade height.
    pub blade_height: f32,
    /// Upper bound of the random height added on top of `blade_height`.
    pub blade_height_variation: f32,
    /// Fixed RNG seed. `None` draws a fresh field every run.
    pub seed: Option<u64>,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self {
            plane_size: 30.0,
            blade_count: 100_000,
            blade_width: 0.1,
            blade_height: 0.8,
            blade_height_variation: 0.6,
            seed: None,
        }
    }

    pub fn with_plane_size(mut self, plane_size: f32) -> Self {
        self.plane_size = plane_size;
        self
    }

    pub fn with_blade_count(mut self, blade_count: u32) -> Self {
        self.blade_count = blade_count;
        self
    }

    pub fn with_blade_width(mut self, blade_width: f32) -> Self {
        self.blade_width = blade_width;
        self
    }

    pub fn with_blade_height(mut self, blade_height: f32, variation: f32) -> Self {
        self.blade_height = blade_height;
        self.blade_height_variation = variation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Field radius (half the plane size).
    pub fn radius(&self) -> f32 {
        self.plane_size * 0.5
    }

    /// Reject configurations the generator cannot honor.
    ///
    /// A zero-sized field would divide by zero in the UV mapping, and a
    /// blade count past `u32::MAX / 5` would overflow the index buffer.
    pub fn validate(&self) -> Result<()> {
        if !self.plane_size.is_finite() || self.plane_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "plane_size must be a positive finite number, got {}",
                self.plane_size
            )));
        }

        let lengths = [
            ("blade_width", self.blade_width),
            ("blade_height", self.blade_height),
            ("blade_height_variation", self.blade_height_variation),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )));
            }
        }

        if self.blade_count > u32::MAX / VERTICES_PER_BLADE {
            return Err(Error::InvalidConfig(format!(
                "blade_count {} overflows 32-bit vertex indices",
                self.blade_count
            )));
        }

        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_field() {
        let config = FieldConfig::default();
        assert_eq!(config.plane_size, 30.0);
        assert_eq!(config.blade_count, 100_000);
        assert_eq!(config.blade_width, 0.1);
        assert_eq!(config.blade_height, 0.8);
        assert_eq!(config.blade_height_variation, 0.6);
        assert_eq!(config.seed, None);
        assert_eq!(config.radius(), 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_plane_size_is_rejected() {
        let err = FieldConfig::new().with_plane_size(0.0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("plane_size")));
    }

    #[test]
    fn non_finite_plane_size_is_rejected() {
        assert!(FieldConfig::new().with_plane_size(f32::NAN).validate().is_err());
        assert!(FieldConfig::new().with_plane_size(f32::INFINITY).validate().is_err());
    }

    #[test]
    fn negative_blade_dimensions_are_rejected() {
        assert!(FieldConfig::new().with_blade_width(-0.1).validate().is_err());
        assert!(FieldConfig::new().with_blade_height(-1.0, 0.0).validate().is_err());
        assert!(FieldConfig::new().with_blade_height(1.0, -0.5).validate().is_err());
    }

    #[test]
    fn index_overflow_is_rejected() {
        let config = FieldConfig::new().with_blade_count(u32::MAX / 5 + 1);
        assert!(config.validate().is_err());
        let config = FieldConfig::new().with_blade_count(u32::MAX / 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_blades_is_valid() {
        assert!(FieldConfig::new().with_blade_count(0).validate().is_ok());
    }
}
