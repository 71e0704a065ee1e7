//! Direction sampling and small vector helpers.
//!
//! Every sampler takes the caller's generator. Workers pass their own
//! `Pcg32`, tests pass a seeded one.

use std::f32::consts::TAU;

use crate::{gen_f32, Vec3};
use rand::RngCore;

/// Uniform point on the unit sphere.
///
/// Samples z uniformly in [-1, 1] and an azimuth in [0, 2pi), which is an
/// area-preserving map and needs no rejection loop.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let a = gen_f32(rng) * TAU;
    let z = gen_f32(rng) * 2.0 - 1.0;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Uniform point inside the unit ball (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Mirror `v` about the plane with normal `n` (`n` must be unit length).
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Normalize, returning the zero vector for zero-length input instead of NaN.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 {
        v / len
    } else {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pcg32;
    use rand::SeedableRng;

    #[test]
    fn test_unit_vector_has_unit_length() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4, "length {}", v.length());
        }
    }

    #[test]
    fn test_unit_vectors_are_centered() {
        let mut rng = Pcg32::seed_from_u64(2);
        let n = 20_000;
        let mean = (0..n).map(|_| random_unit_vector(&mut rng)).sum::<Vec3>() / n as f32;
        assert!(mean.length() < 0.03, "mean = {mean:?}");
    }

    #[test]
    fn test_successive_draws_differ() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = random_unit_vector(&mut rng);
        let b = random_unit_vector(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_in_unit_sphere() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_safe_normalize_zero() {
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(safe_normalize(Vec3::new(0.0, 3.0, 0.0)), Vec3::Y);
    }
}
