//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;
use kestrel_math::{Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        // Half-b form of the quadratic: h = b / -2
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 || self.radius == 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        rec.material = self.material;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_at(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, MaterialId::default())
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = sphere_at(Vec3::new(0.0, 0.0, -1.0), 0.5);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let interval = Interval::new(0.001, f32::INFINITY);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, interval, &mut rec));
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = sphere_at(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let interval = Interval::new(0.001, f32::INFINITY);
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, interval, &mut rec));
    }

    #[test]
    fn test_near_and_far_roots() {
        for (d, r) in [(3.0, 1.0), (10.0, 2.5), (1.5, 0.25)] {
            let center = Vec3::new(0.0, 0.0, -d);
            let sphere = sphere_at(center, r);
            let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
            let mut rec = HitRecord::default();

            assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
            assert!((rec.t - (d - r)).abs() < 1e-4);
            let outward = (rec.p - center).normalize();
            assert!((outward - Vec3::Z).length() < 1e-4);
            assert!((rec.normal - outward).length() < 1e-5);

            // Exclude the near root and the far side is reported instead
            let after_near = Interval::new(d - r + 0.01, f32::INFINITY);
            assert!(sphere.hit(&ray, after_near, &mut rec));
            assert!((rec.t - (d + r)).abs() < 1e-4);
            assert!(!rec.front_face);
            assert!(ray.direction().dot(rec.normal) <= 0.0);
        }
    }

    #[test]
    fn test_non_unit_direction() {
        let sphere = sphere_at(Vec3::new(0.0, 0.0, -4.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-4);
        assert!((rec.p.z + 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_both_roots_out_of_range() {
        let sphere = sphere_at(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, Interval::new(0.001, 3.0), &mut rec));
        assert!(!sphere.hit(&ray, Interval::new(7.0, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_hit_records_material() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, MaterialId(4));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert_eq!(rec.material, MaterialId(4));
    }

    #[test]
    fn test_negative_radius_is_clamped() {
        let sphere = sphere_at(Vec3::ZERO, -1.0);
        assert_eq!(sphere.radius(), 0.0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::UNIVERSE, &mut rec));
    }
}
