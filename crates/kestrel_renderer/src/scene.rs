//! Scene aggregate.
//!
//! The scene owns the camera, every material, shape and light. Shapes refer
//! to materials by [`MaterialId`], so nothing borrows from anything else and
//! a finished scene can be shared read-only across render threads.

use crate::camera::Camera;
use crate::hittable::{HitRecord, Hittable};
use crate::integrator::SHADOW_EPSILON;
use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::shape::Shape;
use kestrel_math::{Interval, Ray, Vec3};

/// Everything needed to render one image.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    camera: Camera,
    materials: Vec<Material>,
    shapes: Vec<Shape>,
    lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene around a camera.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            materials: Vec::new(),
            shapes: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Register a material and return its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_shape(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Look up a material.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this scene's `add_material`.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Give every light the same spherical extent (0 restores point lights).
    pub fn set_light_radius(&mut self, radius: f32) {
        for light in &mut self.lights {
            *light = light.with_radius(radius);
        }
    }

    /// Total triangle count over all meshes and loose triangles.
    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Shape::triangle_count).sum()
    }

    /// Closest hit over every shape within `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut rec = HitRecord::default();
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for shape in &self.shapes {
            if shape.hit(ray, ray_t.with_max(closest_so_far), &mut rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything.then_some(rec)
    }

    /// True if any geometry blocks the segment from `from` to `to`.
    ///
    /// Both ends are shrunk by the shadow epsilon so the surfaces at either
    /// end do not count as blockers.
    pub fn occluded(&self, from: Vec3, to: Vec3) -> bool {
        let offset = to - from;
        let distance = offset.length();
        if distance <= 2.0 * SHADOW_EPSILON {
            return false;
        }

        let ray = Ray::new(from, offset / distance);
        let range = Interval::new(SHADOW_EPSILON, distance - SHADOW_EPSILON);
        let mut rec = HitRecord::default();
        self.shapes.iter().any(|shape| shape.hit(&ray, range, &mut rec))
    }
}
