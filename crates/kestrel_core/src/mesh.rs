//! Triangle mesh data as loaded from disk.
//!
//! Plain positions + indices. The renderer turns this into its own
//! triangle shapes; nothing here knows about materials or rays.

use kestrel_math::Vec3;

/// An indexed triangle mesh (every 3 indices form a triangle).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.positions.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for pos in &self.positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Some((min, max))
    }

    /// Triangle vertices as `[v0, v1, v2]` triplets.
    ///
    /// Triangles referencing a vertex that does not exist are skipped with a
    /// warning.
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            match (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) {
                (Some(&v0), Some(&v1), Some(&v2)) => triangles.push([v0, v1, v2]),
                _ => log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                ),
            }
        }

        triangles
    }
}
