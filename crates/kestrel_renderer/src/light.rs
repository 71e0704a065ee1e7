//! Point lights.

use kestrel_math::{random_in_unit_sphere, safe_normalize, Color, Vec3};
use rand::RngCore;

/// A point light, optionally with a spherical extent for soft shadows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,

    /// Unitless RGB intensity
    pub intensity: Color,

    /// Extent used when sampling shadow rays. 0 is a pure point light.
    pub radius: f32,
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
            radius: 0.0,
        }
    }

    /// Give the light a spherical extent.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    /// A position on the light for one shadow ray.
    ///
    /// Point lights always return their position without touching `rng`.
    pub fn sample_position(&self, rng: &mut dyn RngCore) -> Vec3 {
        if self.radius <= 0.0 {
            return self.position;
        }
        self.position + random_in_unit_sphere(rng) * self.radius
    }

    /// Unit direction from `point` towards the light center.
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        safe_normalize(self.position - point)
    }

    pub fn distance_from(&self, point: Vec3) -> f32 {
        (self.position - point).length()
    }
}
