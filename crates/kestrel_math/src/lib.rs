//! Kestrel math - vectors, rays, and deterministic sampling.
//!
//! `Vec3` is glam's and doubles as point, direction, and linear RGB color.
//! Call sites document which role a value plays.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
mod rng;
mod sampling;

pub use interval::Interval;
pub use ray::Ray;
pub use rng::{gen_f32, Pcg32};
pub use sampling::{random_in_unit_sphere, random_unit_vector, reflect, safe_normalize};

/// Linear RGB color. Same representation as `Vec3`, different role.
pub type Color = Vec3;
