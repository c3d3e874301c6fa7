//! Meadow Render - wgpu renderer for procedural grass fields
//!
//! Uploads a [`meadow_field::MeshBuffers`] once as static geometry and draws
//! it every frame with the grass wind material:
//!
//! - [`GpuMesh`] packs the field buffers into one interleaved vertex buffer
//! - [`GrassMaterial`] owns the wind shader, ground texture and cloud texture
//! - [`Camera`] is the per-frame uniform (view-projection, eye, time)
//! - [`OrbitControls`] drives the eye position around a fixed target
//! - [`AnimationClock`] supplies the shader's time value

pub mod clock;
pub mod config;
pub mod material;
pub mod mesh;
pub mod orbit;
pub mod texture;

mod camera;
mod renderer;

pub use camera::{fov_from_focal_length, Camera, FILM_GAUGE_MM};
pub use clock::AnimationClock;
pub use config::ViewConfig;
pub use material::GrassMaterial;
pub use mesh::{GpuMesh, GrassVertex};
pub use orbit::OrbitControls;
pub use renderer::{Renderer, RendererConfig};
pub use texture::GpuTexture;

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running the renderer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Texture error: {0}")]
    Texture(String),

    #[error("Invalid view configuration: {0}")]
    Config(String),

    #[error("Field error: {0}")]
    Field(#[from] meadow_field::Error),

    #[error("WGPU error: {0}")]
    Wgpu(String),
}
