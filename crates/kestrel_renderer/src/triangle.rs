//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;
use kestrel_math::{safe_normalize, Interval, Ray, Vec3};

/// Tolerance for the parallel test and the barycentric edges.
///
/// Edges are inclusive with this slack so rays along a shared edge hit one
/// of the two neighbouring triangles instead of slipping between them.
pub const TRIANGLE_EPSILON: f32 = 1e-8;

/// Barycentric hit on a triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    /// Weight of `v1`
    pub u: f32,
    /// Weight of `v2`
    pub v: f32,
}

/// A triangle primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, zero if degenerate)
    normal: Vec3,
    /// Material
    material: MaterialId,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: face_normal(v0, v1, v2),
            material,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Scale every vertex component-wise about the origin.
    pub fn scale(&mut self, factor: Vec3) {
        self.v0 *= factor;
        self.v1 *= factor;
        self.v2 *= factor;
        // Non-uniform scale changes the orientation of the face
        self.normal = face_normal(self.v0, self.v1, self.v2);
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.v0 += offset;
        self.v1 += offset;
        self.v2 += offset;
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < TRIANGLE_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if u < -TRIANGLE_EPSILON || u > 1.0 + TRIANGLE_EPSILON {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < -TRIANGLE_EPSILON || u + v > 1.0 + TRIANGLE_EPSILON {
            return None;
        }

        // Calculate t parameter
        let t = f * edge2.dot(q);

        if !ray_t.contains(t) {
            return None;
        }

        Some(TriangleHit { t, u, v })
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let Some(hit) = self.intersect(ray, ray_t) else {
            return false;
        };

        // Valid intersection found
        rec.t = hit.t;
        rec.p = ray.at(hit.t);
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material;

        true
    }
}

fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    safe_normalize((v1 - v0).cross(v2 - v0))
}
