//! GPU mesh types for the grass field

use meadow_field::{FieldConfig, FieldGenerator, MeshBuffers, INDICES_PER_BLADE, VERTICES_PER_BLADE};
use std::sync::Arc;

use crate::{Error, Result};

/// Vertex format matching grass.wgsl exactly (44 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl GrassVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GrassVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave the field's attribute buffers, computing vertex normals once.
pub fn pack_vertices(buffers: &MeshBuffers) -> Vec<GrassVertex> {
    let normals = buffers.compute_vertex_normals();
    buffers
        .vertices()
        .zip(normals.chunks_exact(3))
        .map(|(v, n)| GrassVertex {
            position: v.position.to_array(),
            normal: [n[0], n[1], n[2]],
            uv: v.uv.to_array(),
            color: v.color.to_array(),
        })
        .collect()
}

/// Vertex buffer size in bytes for `blades` blades.
pub fn vertex_bytes(blades: u64) -> u64 {
    blades * VERTICES_PER_BLADE as u64 * std::mem::size_of::<GrassVertex>() as u64
}

/// Index buffer size in bytes for `blades` blades.
pub fn index_bytes(blades: u64) -> u64 {
    blades * INDICES_PER_BLADE as u64 * std::mem::size_of::<u32>() as u64
}

/// Fail if a field of `blades` blades would not fit in buffers of at most
/// `max_buffer_size` bytes.
pub fn check_buffer_limits(blades: u64, max_buffer_size: u64) -> Result<()> {
    let vertex = vertex_bytes(blades);
    let index = index_bytes(blades);
    if vertex > max_buffer_size || index > max_buffer_size {
        return Err(Error::Wgpu(format!(
            "{} blades need a {} byte vertex buffer and a {} byte index buffer, device limit is {} bytes",
            blades, vertex, index, max_buffer_size
        )));
    }
    Ok(())
}

/// Validate `config` and make sure its field fits the device's buffers
/// before anything is generated.
pub fn field_generator(config: &FieldConfig, max_buffer_size: u64) -> Result<FieldGenerator> {
    let generator = FieldGenerator::new(config.clone())?;
    check_buffer_limits(config.blade_count as u64, max_buffer_size)?;
    Ok(generator)
}

/// GPU-resident mesh (owns wgpu vertex + index buffers)
#[derive(Clone)]
pub struct GpuMesh {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, vertices: &[GrassVertex], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;
        let vertex_buffer = Arc::new(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grass Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        let index_buffer = Arc::new(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grass Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
        Self { vertex_buffer, index_buffer, index_count: indices.len() as u32 }
    }

    /// Upload a generated field as static geometry
    pub fn from_buffers(device: &wgpu::Device, buffers: &MeshBuffers) -> Result<Self> {
        check_buffer_limits(buffers.blade_count() as u64, device.limits().max_buffer_size)?;
        let vertices = pack_vertices(buffers);
        log::info!(
            "Uploading grass mesh: {} vertices ({} KiB), {} indices",
            vertices.len(),
            std::mem::size_of_val(vertices.as_slice()) / 1024,
            buffers.indices.len()
        );
        Ok(Self::new(device, &vertices, &buffers.indices))
    }

    /// Generate the field described by `config` and upload it.
    pub fn generate(device: &wgpu::Device, config: &FieldConfig) -> Result<Self> {
        let generator = field_generator(config, device.limits().max_buffer_size)?;
        Self::from_buffers(device, &generator.generate_from_config())
    }

    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_44_bytes() {
        assert_eq!(std::mem::size_of::<GrassVertex>(), 44);
        assert_eq!(GrassVertex::layout().array_stride, 44);
    }

    #[test]
    fn attribute_offsets() {
        let offsets: Vec<u64> = GrassVertex::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 32]);
    }

    #[test]
    fn packing_preserves_field_attributes() {
        let config = FieldConfig::new().with_blade_count(10).with_seed(4);
        let buffers = FieldGenerator::new(config).unwrap().generate_from_config();
        let packed = pack_vertices(&buffers);

        assert_eq!(packed.len(), 50);
        for (i, v) in packed.iter().enumerate() {
            assert_eq!(v.position, [buffers.positions[i * 3], buffers.positions[i * 3 + 1], buffers.positions[i * 3 + 2]]);
            assert_eq!(v.uv, [buffers.uvs[i * 2], buffers.uvs[i * 2 + 1]]);
            assert_eq!(v.color, [buffers.colors[i * 3], buffers.colors[i * 3 + 1], buffers.colors[i * 3 + 2]]);
            let n = glam::Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    // wgpu's default max_buffer_size
    const DEFAULT_MAX_BUFFER: u64 = 256 << 20;

    #[test]
    fn buffer_sizes_per_blade() {
        assert_eq!(vertex_bytes(1), 220);
        assert_eq!(index_bytes(1), 36);
        assert_eq!(vertex_bytes(2_000_000), 440_000_000);

        let buffers = FieldGenerator::new(FieldConfig::new().with_blade_count(7).with_seed(1))
            .unwrap()
            .generate_from_config();
        let packed = pack_vertices(&buffers);
        assert_eq!(vertex_bytes(7), std::mem::size_of_val(packed.as_slice()) as u64);
        assert_eq!(index_bytes(7), std::mem::size_of_val(buffers.indices.as_slice()) as u64);
    }

    #[test]
    fn default_field_fits_default_limits() {
        let blades = FieldConfig::default().blade_count as u64;
        assert!(check_buffer_limits(blades, DEFAULT_MAX_BUFFER).is_ok());
        assert!(check_buffer_limits(0, DEFAULT_MAX_BUFFER).is_ok());
    }

    #[test]
    fn oversized_field_is_an_error() {
        let config = FieldConfig::new().with_blade_count(2_000_000);
        assert!(config.validate().is_ok());
        let err = field_generator(&config, DEFAULT_MAX_BUFFER).unwrap_err();
        assert!(matches!(err, Error::Wgpu(msg) if msg.contains("440000000")));

        let limit = DEFAULT_MAX_BUFFER / 220;
        assert!(check_buffer_limits(limit, DEFAULT_MAX_BUFFER).is_ok());
        assert!(check_buffer_limits(limit + 1, DEFAULT_MAX_BUFFER).is_err());
    }

    #[test]
    fn invalid_field_config_surfaces_as_field_error() {
        let config = FieldConfig::new().with_plane_size(-1.0);
        let err = field_generator(&config, DEFAULT_MAX_BUFFER).unwrap_err();
        assert!(matches!(err, Error::Field(meadow_field::Error::InvalidConfig(_))));
    }
}
