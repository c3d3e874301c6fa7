//! Meadow field generation
//!
//! Procedural grass geometry on the CPU. A field is a disk of independent
//! five-vertex blades, flattened into position / UV / color / index buffers
//! ready for upload:
//!
//! - [`sampler`] draws uniformly distributed ground points on the disk
//! - [`blade`] turns one ground point into a randomized blade
//! - [`field`] runs both for every blade and owns the output buffers
//!
//! All randomness comes from a caller-supplied [`rand::Rng`], so a seeded
//! generator reproduces the same field.

pub mod blade;
pub mod config;
pub mod error;
pub mod field;
pub mod sampler;

pub use blade::{build_blade, Blade, BladeParams, Vertex, INDICES_PER_BLADE, TIP_OFFSET, VERTICES_PER_BLADE};
pub use config::FieldConfig;
pub use error::{Error, Result};
pub use field::{generate_field, FieldGenerator, MeshBuffers};
pub use sampler::{convert_range, sample, sample_point, SampledPoint};
