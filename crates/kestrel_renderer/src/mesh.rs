//! Triangle meshes.
//!
//! A mesh is a flat list of triangles tested one after another. All of its
//! triangles share the mesh's material.

use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;
use crate::triangle::Triangle;
use kestrel_core::MeshData;
use kestrel_math::{Interval, Ray, Vec3};

/// A triangle mesh with a single material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    material: MaterialId,
}

impl Mesh {
    /// Build a mesh from existing triangles. Their own materials are
    /// replaced by `material`.
    pub fn from_triangles(triangles: Vec<Triangle>, material: MaterialId) -> Self {
        let mut mesh = Self {
            triangles,
            material,
        };
        mesh.set_material(material);
        mesh
    }

    /// Build a mesh from loaded mesh data.
    pub fn from_data(data: &MeshData, material: MaterialId) -> Self {
        let triangles = data
            .triangles()
            .into_iter()
            .map(|[v0, v1, v2]| Triangle::new(v0, v1, v2, material))
            .collect();

        Self {
            triangles,
            material,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
        for tri in &mut self.triangles {
            tri.set_material(material);
        }
    }

    /// Scale every vertex component-wise about the origin.
    pub fn scale(&mut self, factor: Vec3) {
        for tri in &mut self.triangles {
            tri.scale(factor);
        }
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for tri in &mut self.triangles {
            tri.translate(offset);
        }
    }
}

impl Hittable for Mesh {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for tri in &self.triangles {
            if tri.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        if hit_anything {
            rec.material = self.material;
        }

        hit_anything
    }
}
