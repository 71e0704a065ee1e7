//! Surface materials.
//!
//! Two closed variants: a Lambertian diffuser and a perfect mirror. Both
//! always scatter; absorption is modelled by the integrator running out
//! of depth.

use std::f32::consts::PI;

use crate::hittable::HitRecord;
use kestrel_math::{random_unit_vector, reflect, safe_normalize, Color, Ray};
use rand::RngCore;

/// Index of a material in a [`Scene`](crate::Scene).
///
/// Ids are handed out by `Scene::add_material` and are only meaningful for
/// the scene that created them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    /// Position in the owning scene's material list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// How light interacts with a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Lambertian diffuser
    Diffuse { albedo: Color },

    /// Perfect mirror tinted by `albedo`
    Specular { albedo: Color },
}

impl Material {
    /// Create a Lambertian material with the given albedo color.
    pub fn diffuse(albedo: Color) -> Self {
        Material::Diffuse { albedo }
    }

    /// Create a mirror with the given tint.
    pub fn specular(albedo: Color) -> Self {
        Material::Specular { albedo }
    }

    /// Reflectance as configured (RGB, 0-1).
    pub fn albedo(&self) -> Color {
        match self {
            Material::Diffuse { albedo } | Material::Specular { albedo } => *albedo,
        }
    }

    /// Weight of mirror inter-reflection against direct lighting.
    pub fn reflectivity(&self) -> f32 {
        match self {
            Material::Diffuse { .. } => 0.0,
            Material::Specular { .. } => 1.0,
        }
    }

    /// Color used for direct lighting and reflection weighting.
    ///
    /// For the diffuser this is the normalized BRDF `albedo / pi`.
    pub fn base_color(&self) -> Color {
        match self {
            Material::Diffuse { albedo } => *albedo / PI,
            Material::Specular { albedo } => *albedo,
        }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `(attenuation, scattered_ray)`. The scattered ray starts just
    /// off the surface on the incoming side.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> (Color, Ray) {
        match self {
            Material::Diffuse { albedo } => {
                // Scatter in a random direction on the hemisphere around the normal
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if scatter_direction.length_squared() < 1e-8 {
                    scatter_direction = rec.normal;
                }

                (*albedo / PI, Ray::new(rec.offset_point(), scatter_direction))
            }
            Material::Specular { albedo } => {
                let incident = safe_normalize(ray_in.direction());
                let reflected = reflect(incident, rec.normal);
                (*albedo, Ray::new(rec.offset_point(), reflected))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_math::{Pcg32, Vec3};
    use rand::SeedableRng;

    fn hit_facing_up() -> HitRecord {
        HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Y,
            t: 1.0,
            front_face: true,
            material: MaterialId::default(),
        }
    }

    #[test]
    fn test_reflectivity() {
        assert_eq!(Material::diffuse(Color::ONE).reflectivity(), 0.0);
        assert_eq!(Material::specular(Color::ONE).reflectivity(), 1.0);
    }

    #[test]
    fn test_specular_reflection_law() {
        let mirror = Material::specular(Color::splat(0.9));
        let rec = hit_facing_up();
        let mut rng = Pcg32::seed_from_u64(7);

        for incoming in [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-0.3, -2.0, 0.7),
            Vec3::new(0.0, -1.0, 0.0),
        ] {
            let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), incoming);
            let (attenuation, scattered) = mirror.scatter(&ray, &rec, &mut rng);

            let d = incoming.normalize();
            let d_out = scattered.direction();
            assert!((d.dot(rec.normal) + d_out.dot(rec.normal)).abs() < 1e-5);
            assert!((d_out.length() - 1.0).abs() < 1e-5);
            assert_eq!(attenuation, Color::splat(0.9));
        }
    }

    #[test]
    fn test_diffuse_scatter_stays_above_surface() {
        let diffuse = Material::diffuse(Color::new(0.8, 0.4, 0.2));
        let rec = hit_facing_up();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        let mut rng = Pcg32::seed_from_u64(1);

        for _ in 0..1000 {
            let (attenuation, scattered) = diffuse.scatter(&ray, &rec, &mut rng);
            assert!(scattered.direction().dot(rec.normal) >= 0.0);
            assert!(scattered.origin().y > 0.0);
            assert!((attenuation - Color::new(0.8, 0.4, 0.2) / PI).length() < 1e-6);
        }
    }

    #[test]
    fn test_diffuse_energy_conservation() {
        // Integrate base_color * cos(theta) over the hemisphere with uniform
        // hemisphere samples (pdf = 1 / 2pi). The result should be the albedo.
        let albedo = Color::new(0.9, 0.5, 0.1);
        let base = Material::diffuse(albedo).base_color();
        let normal = Vec3::Y;
        let mut rng = Pcg32::seed_from_u64(2024);

        let n = 200_000;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            let mut dir = random_unit_vector(&mut rng);
            if dir.dot(normal) < 0.0 {
                dir = -dir;
            }
            sum += base * dir.dot(normal) * (2.0 * PI);
        }
        let estimate = sum / n as f32;

        for (e, a) in estimate.to_array().into_iter().zip(albedo.to_array()) {
            assert!((e - a).abs() < 0.01 * a.max(0.1), "estimate {e} vs albedo {a}");
            assert!(e <= a * 1.01);
        }
    }

    #[test]
    fn test_material_id_index() {
        assert_eq!(MaterialId(3).index(), 3);
        assert_eq!(MaterialId::default().index(), 0);
    }
}
