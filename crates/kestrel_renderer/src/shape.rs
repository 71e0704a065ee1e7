//! Closed set of renderable shapes.

use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;
use crate::mesh::Mesh;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use kestrel_math::{Interval, Ray};

/// Any shape a scene can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Mesh(Mesh),
}

impl Shape {
    pub fn material(&self) -> MaterialId {
        match self {
            Shape::Sphere(s) => s.material(),
            Shape::Triangle(t) => t.material(),
            Shape::Mesh(m) => m.material(),
        }
    }

    /// Number of triangles (0 for analytic shapes).
    pub fn triangle_count(&self) -> usize {
        match self {
            Shape::Sphere(_) => 0,
            Shape::Triangle(_) => 1,
            Shape::Mesh(m) => m.triangle_count(),
        }
    }
}

impl Hittable for Shape {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        match self {
            Shape::Sphere(s) => s.hit(ray, ray_t, rec),
            Shape::Triangle(t) => t.hit(ray, ray_t, rec),
            Shape::Mesh(m) => m.hit(ray, ray_t, rec),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Self {
        Shape::Mesh(mesh)
    }
}
