//! Field assembler: sample, build, and flatten every blade into the four
//! attribute buffers handed to the renderer.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use crate::blade::{build_blade, Blade, BladeParams, Vertex, INDICES_PER_BLADE, VERTICES_PER_BLADE};
use crate::sampler::sample_point;
use crate::{FieldConfig, Result};

/// Flat, renderer-ready geometry for the whole field.
///
/// Positions and colors hold three floats per vertex, UVs two, and every
/// three indices form a triangle. Blade `i` owns vertices `5i..5i+5`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size every buffer for `blades` blades.
    pub fn with_capacity(blades: usize) -> Self {
        let vertices = blades * VERTICES_PER_BLADE as usize;
        Self {
            positions: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            colors: Vec::with_capacity(vertices * 3),
            indices: Vec::with_capacity(blades * INDICES_PER_BLADE),
        }
    }

    /// Append a blade. Its indices must already be offset to land on the
    /// vertices this call appends.
    pub fn push_blade(&mut self, blade: &Blade) {
        debug_assert_eq!(
            blade.indices.iter().min().copied(),
            Some(self.vertex_count() as u32),
            "blade indices do not start at the next free vertex"
        );
        for v in &blade.vertices {
            self.positions.extend_from_slice(&v.position.to_array());
            self.uvs.extend_from_slice(&v.uv.to_array());
            self.colors.extend_from_slice(&v.color.to_array());
        }
        self.indices.extend_from_slice(&blade.indices);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn blade_count(&self) -> usize {
        self.vertex_count() / VERTICES_PER_BLADE as usize
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Walk the attribute buffers vertex by vertex.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.uvs.chunks_exact(2))
            .zip(self.colors.chunks_exact(3))
            .map(|((p, uv), c)| Vertex {
                position: Vec3::from_slice(p),
                uv: Vec2::from_slice(uv),
                color: Vec3::from_slice(c),
            })
    }

    /// Smooth per-vertex normals, three floats per vertex.
    ///
    /// Each triangle adds its unnormalized face normal (so larger faces weigh
    /// more) to its three corners; the sums are then normalized. Vertices
    /// touched only by degenerate triangles get a zero normal.
    pub fn compute_vertex_normals(&self) -> Vec<f32> {
        let mut acc = vec![Vec3::ZERO; self.vertex_count()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (pa, pb, pc) = (self.position(a), self.position(b), self.position(c));
            let face = (pc - pb).cross(pa - pb);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }

        acc.into_iter()
            .flat_map(|n| n.normalize_or_zero().to_array())
            .collect()
    }
}

/// Generates grass fields from a validated [`FieldConfig`].
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    config: FieldConfig,
    params: BladeParams,
}

impl FieldGenerator {
    pub fn new(config: FieldConfig) -> Result<Self> {
        config.validate()?;
        let params = BladeParams::from(&config);
        Ok(Self { config, params })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Build the full field in one pass.
    ///
    /// Each blade draws five numbers from `rng`: two for its position, then
    /// height, yaw and tip bend. A fixed sequence always gives the same field.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> MeshBuffers {
        let started = Instant::now();
        let count = self.config.blade_count as usize;
        let mut buffers = MeshBuffers::with_capacity(count);

        for i in 0..self.config.blade_count {
            let point = sample_point(self.config.plane_size, rng);
            let blade = build_blade(
                point.position,
                i * VERTICES_PER_BLADE,
                point.uv,
                &self.params,
                rng,
            );
            buffers.push_blade(&blade);
        }

        log::info!(
            "Generated grass field: {} blades, {} vertices, {} indices",
            count,
            buffers.vertex_count(),
            buffers.indices.len()
        );
        log::debug!("Field generation took {:?}", started.elapsed());

        buffers
    }

    /// Generate with an RNG seeded from the config, or from OS entropy when
    /// the config carries no seed.
    pub fn generate_from_config(&self) -> MeshBuffers {
        let mut rng = match self.config.seed {
            Some(seed) => {
                log::debug!("Seeding field RNG with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        self.generate(&mut rng)
    }
}

/// Validate `config` and generate a field from `rng`.
pub fn generate_field<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Result<MeshBuffers> {
    Ok(FieldGenerator::new(config.clone())?.generate(rng))
}
