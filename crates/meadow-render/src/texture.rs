//! Ground and cloud textures for the grass material.
//!
//! Textures load from disk through `image`. A missing or unreadable file is
//! not fatal: the material falls back to a generated texture so the field
//! still renders.

use std::path::Path;

use crate::{Error, Result};

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub size: (u32, u32),
}

/// Which generated texture to use when a file cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Mottled green ground color
    Ground,
    /// Soft grayscale noise for wind gusts
    Cloud,
}

impl GpuTexture {
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        srgb: bool,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture, mip_level: 0,
                origin: wgpu::Origin3d::ZERO, aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::ImageDataLayout {
                offset: 0, bytes_per_row: Some(4 * width), rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, size: (width, height) }
    }

    /// Decode an image file and upload it.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path, srgb: bool) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| Error::Texture(format!("Failed to open {}: {}", path.display(), e)))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        log::info!("Loaded texture {} ({}x{})", path.display(), w, h);
        let label = path.to_string_lossy();
        Ok(Self::from_rgba8(device, queue, &img, w, h, srgb, Some(label.as_ref())))
    }

    /// Load `path`, or generate the `fallback` texture if that fails.
    pub fn load_or_generate(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        srgb: bool,
        fallback: Fallback,
    ) -> Self {
        match Self::load(device, queue, path, srgb) {
            Ok(tex) => tex,
            Err(e) => {
                log::warn!("{}; using generated {:?} texture", e, fallback);
                let pixels = generate_pixels(fallback, GENERATED_SIZE);
                let label = format!("Generated {:?} Texture", fallback);
                Self::from_rgba8(device, queue, &pixels, GENERATED_SIZE, GENERATED_SIZE, srgb, Some(&label))
            }
        }
    }
}

/// Edge length of generated fallback textures.
pub const GENERATED_SIZE: u32 = 256;

/// RGBA8 pixels for a generated `size`×`size` texture.
pub fn generate_pixels(kind: Fallback, size: u32) -> Vec<u8> {
    let noise = value_noise(size as usize, CELL_SIZE[kind as usize]);
    let mut pixels = Vec::with_capacity(noise.len() * 4);
    for n in noise {
        let rgb = match kind {
            Fallback::Ground => [0.18 + 0.12 * n, 0.42 + 0.25 * n, 0.10 + 0.08 * n],
            Fallback::Cloud => [n, n, n],
        };
        pixels.extend(rgb.iter().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
        pixels.push(255);
    }
    pixels
}

/// Noise cell size in texels for [`Fallback::Ground`] and [`Fallback::Cloud`].
const CELL_SIZE: [f32; 2] = [8.0, 32.0];

/// Smooth value noise in [0, 1], tiling with period `side`.
fn value_noise(side: usize, scale: f32) -> Vec<f32> {
    fn hash(x: i32, y: i32) -> f32 {
        let mut n = x.wrapping_add(y.wrapping_mul(57));
        n = (n << 13) ^ n;
        let nn = n
            .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789221))
            .wrapping_add(1376312589)
            & 0x7fffffff;
        nn as f32 / 2147483647.0
    }

    fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    let cells = ((side as f32 / scale).round() as i32).max(1);
    let lattice = |x: i32, y: i32| hash(x.rem_euclid(cells), y.rem_euclid(cells));

    let mut out = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            let fx = x as f32 / scale;
            let fy = y as f32 / scale;
            let (x0, y0) = (fx.floor() as i32, fy.floor() as i32);
            let sx = smoothstep(fx - x0 as f32);
            let sy = smoothstep(fy - y0 as f32);

            let top = lattice(x0, y0) + sx * (lattice(x0 + 1, y0) - lattice(x0, y0));
            let bottom = lattice(x0, y0 + 1) + sx * (lattice(x0 + 1, y0 + 1) - lattice(x0, y0 + 1));
            out.push((top + sy * (bottom - top)).clamp(0.0, 1.0));
        }
    }
    out
}
