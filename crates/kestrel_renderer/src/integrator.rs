//! Radiance estimation along a single ray.
//!
//! Direct lighting from point lights with shadow rays, plus mirror
//! inter-reflection blended in by each material's reflectivity:
//!
//! ```text
//! L = direct * (1 - reflectivity) + reflectivity * base_color * L(reflected)
//! ```

use crate::hittable::HitRecord;
use crate::light::Light;
use crate::material::Material;
use crate::renderer::RenderConfig;
use crate::scene::Scene;
use kestrel_math::{safe_normalize, Color, Interval, Ray, Vec3};
use rand::RngCore;

/// Offset along the normal for secondary ray origins, and the trim applied
/// to both ends of a shadow segment.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// Added to the squared light distance to keep falloff finite.
pub const FALLOFF_EPSILON: f32 = 1e-4;

/// Nearest accepted hit for camera and reflection rays.
pub const PRIMARY_T_MIN: f32 = 1e-3;

/// Radiance returned for rays that leave the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Background {
    /// Zero radiance
    #[default]
    Black,

    /// Constant radiance
    Solid(Color),

    /// White at the horizon blending to light blue overhead
    SkyGradient,
}

impl Background {
    pub fn radiance(&self, ray: &Ray) -> Color {
        match self {
            Background::Black => Color::ZERO,
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = safe_normalize(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Compute the color seen by a ray.
///
/// `depth` counts the bounces still allowed; at 0 the result is black.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, Interval::new(PRIMARY_T_MIN, f32::INFINITY)) else {
        return config.background.radiance(ray);
    };

    let material = scene.material(rec.material);
    let reflectivity = material.reflectivity();

    let direct = direct_lighting(scene, &rec, material, config.shadow_samples, rng);

    let reflected = if reflectivity > 0.0 {
        let (_, reflected_ray) = material.scatter(ray, &rec, rng);
        reflectivity
            * material.base_color()
            * ray_color(&reflected_ray, scene, depth - 1, config, rng)
    } else {
        Color::ZERO
    };

    direct * (1.0 - reflectivity) + reflected
}

/// Light arriving directly from every light at a hit point, shaded with
/// the material's base color.
pub fn direct_lighting(
    scene: &Scene,
    rec: &HitRecord,
    material: &Material,
    shadow_samples: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let shadow_origin = rec.offset_point();
    let base_color = material.base_color();
    let mut total = Color::ZERO;

    for light in scene.lights() {
        let to_light = light.position - rec.p;
        let cos_theta = rec.normal.dot(safe_normalize(to_light)).max(0.0);
        if cos_theta <= 0.0 {
            continue;
        }

        let visibility = light_visibility(scene, shadow_origin, light, shadow_samples, rng);
        if visibility <= 0.0 {
            continue;
        }

        let falloff = to_light.length_squared() + FALLOFF_EPSILON;
        total += base_color * cos_theta * light.intensity * visibility / falloff;
    }

    total
}

/// Fraction of shadow rays from `origin` that reach the light.
///
/// At least one ray is always cast. With a point light every sample goes
/// to the same position, so the result is 0 or 1.
pub fn light_visibility(
    scene: &Scene,
    origin: Vec3,
    light: &Light,
    shadow_samples: u32,
    rng: &mut dyn RngCore,
) -> f32 {
    let samples = shadow_samples.max(1);
    let unoccluded = (0..samples)
        .filter(|_| !scene.occluded(origin, light.sample_position(rng)))
        .count();

    unoccluded as f32 / samples as f32
}
