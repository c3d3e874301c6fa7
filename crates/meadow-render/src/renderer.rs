//! Main renderer implementation

use crate::camera::Camera;
use crate::material::{GrassMaterial, DEPTH_FORMAT};
use crate::mesh::GpuMesh;
use crate::texture::{Fallback, GpuTexture};
use crate::{Result, ViewConfig};
use std::sync::Arc;

/// Main renderer configuration
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    pub surface_format: wgpu::TextureFormat,
    pub view: ViewConfig,
}

/// Create a Depth32Float texture + view at the given resolution
fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    sample_count: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

/// Multisampled color target resolved into the surface each frame.
/// `None` when rendering single-sampled.
fn create_msaa_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Color Texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(tex.create_view(&wgpu::TextureViewDescriptor::default()))
}

/// Draws a static grass field with the wind material.
pub struct Renderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,

    material: GrassMaterial,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // Depth buffer (Depth32Float) and MSAA color target, recreated on resize
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,

    sky_color: [f32; 3],

    // Frame state
    frame_count: u64,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Create a new renderer, loading the material textures named in the
    /// view config (generated fallbacks stand in for missing files).
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        config: RendererConfig,
    ) -> Result<Self> {
        config.view.validate()?;

        log::info!("Creating Meadow renderer");
        log::info!("  Surface format: {:?}", config.surface_format);
        log::info!("  Resolution: {}x{}", config.width, config.height);
        log::info!("  MSAA: {}x", config.view.msaa_samples);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: std::mem::size_of::<Camera>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() }],
        });

        let ground = GpuTexture::load_or_generate(&device, &queue, &config.view.ground_texture, true, Fallback::Ground);
        let cloud = GpuTexture::load_or_generate(&device, &queue, &config.view.cloud_texture, false, Fallback::Cloud);

        let sample_count = config.view.msaa_samples;
        let material = GrassMaterial::new(
            &device,
            &camera_layout,
            config.surface_format,
            sample_count,
            &ground,
            &cloud,
        );

        let (depth_texture, depth_view) =
            create_depth_texture(&device, config.width, config.height, sample_count);
        let msaa_view =
            create_msaa_target(&device, config.width, config.height, config.surface_format, sample_count);

        log::info!("Meadow renderer initialized successfully");

        Ok(Self {
            device,
            queue,
            material,
            camera_buffer,
            camera_bind_group,
            depth_texture,
            depth_view,
            msaa_view,
            surface_format: config.surface_format,
            sample_count,
            sky_color: config.view.sky_color,
            frame_count: 0,
            width: config.width,
            height: config.height,
        })
    }

    /// Render one frame of `mesh` seen through `camera` into `target`.
    pub fn render(&mut self, mesh: &GpuMesh, camera: &Camera, target: &wgpu::TextureView) -> Result<()> {
        log::trace!("Rendering frame {} (t = {:.0} ms)", self.frame_count, camera.time);

        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let [r, g, b] = self.sky_color.map(|c| c as f64);
            // Draw into the MSAA target and resolve into the surface
            let (view, resolve_target, store) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(target), wgpu::StoreOp::Discard),
                None => (target, None, wgpu::StoreOp::Store),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Grass Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !mesh.is_empty() {
                pass.set_pipeline(self.material.pipeline());
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, self.material.bind_group(), &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));

        self.frame_count += 1;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!("Resizing renderer to {}x{}", width, height);
        self.width = width;
        self.height = height;
        let (tex, view) = create_depth_texture(&self.device, width, height, self.sample_count);
        self.depth_texture = tex;
        self.depth_view = view;
        self.msaa_view = create_msaa_target(&self.device, width, height, self.surface_format, self.sample_count);
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
