//! Kestrel Renderer - CPU ray tracing core
//!
//! A Whitted-style ray tracer: direct lighting from point lights with
//! shadow rays, plus recursive mirror reflection.
//!
//! - **Geometry**: [`Sphere`], [`Triangle`] and [`Mesh`] behind the closed
//!   [`Shape`] enum
//! - **Materials**: [`Material::Diffuse`] and [`Material::Specular`],
//!   owned by the [`Scene`] and referenced by [`MaterialId`]
//! - **Rendering**: [`render`] spreads scanlines over a fixed pool of
//!   worker threads

mod builder;
mod camera;
mod hittable;
mod integrator;
mod light;
mod material;
mod mesh;
mod renderer;
mod scene;
mod shape;
mod sphere;
mod triangle;

pub use builder::{build_scene, BuildError, BuildResult, DEFAULT_MESH_ALBEDO, DEFAULT_SPHERE_ALBEDO};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use integrator::{
    direct_lighting, light_visibility, ray_color, Background, FALLOFF_EPSILON, PRIMARY_T_MIN,
    SHADOW_EPSILON,
};
pub use light::Light;
pub use material::{Material, MaterialId};
pub use mesh::Mesh;
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_pixel, ImageBuffer, RenderConfig, RenderError,
    StreamAssignment, DEFAULT_SEED,
};
pub use scene::Scene;
pub use shape::Shape;
pub use sphere::Sphere;
pub use triangle::{Triangle, TriangleHit, TRIANGLE_EPSILON};

/// Re-export common math types from kestrel_math
pub use kestrel_math::{Color, Interval, Ray, Vec3};
