//! Hittable trait and HitRecord for ray-object intersection.

use crate::integrator::SHADOW_EPSILON;
use crate::material::MaterialId;
use kestrel_math::{Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy, Debug, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material at the intersection point (index into the scene's materials)
    pub material: MaterialId,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }

    /// Origin for secondary rays, nudged off the surface on the side the
    /// incoming ray came from.
    #[inline]
    pub fn offset_point(&self) -> Vec3 {
        self.p + self.normal * SHADOW_EPSILON
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        rec.set_face_normal(&ray, Vec3::Z);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_face_normal_back_is_flipped() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        rec.set_face_normal(&ray, Vec3::NEG_Z);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(ray.direction().dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_offset_point_follows_normal() {
        let rec = HitRecord {
            p: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            ..Default::default()
        };
        let offset = rec.offset_point();
        assert_eq!(offset.x, 1.0);
        assert!(offset.y > 2.0);
        assert_eq!(offset.z, 3.0);
    }
}
