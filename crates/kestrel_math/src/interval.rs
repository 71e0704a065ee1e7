/// A closed range of ray parameters `[min, max]`.
///
/// Intersection routines accept an `Interval` and only report hits whose
/// `t` lies inside it. Aggregates narrow `max` as closer hits are found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Every `t`, including negative ones.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `min <= t <= max`. Both ends count, so a root sitting exactly on a
    /// bound is accepted.
    #[inline]
    pub fn contains(&self, t: f32) -> bool {
        self.min <= t && t <= self.max
    }

    /// Same lower bound, new upper bound.
    #[inline]
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let ray_t = Interval::new(0.001, 5.0);
        assert!(ray_t.contains(0.001));
        assert!(ray_t.contains(5.0));
        assert!(ray_t.contains(2.5));
        assert!(!ray_t.contains(0.0));
        assert!(!ray_t.contains(5.0001));
    }

    #[test]
    fn test_inverted_interval_is_empty() {
        let inverted = Interval::new(1.0, 0.5);
        assert!(!inverted.contains(0.75));
        assert!(!inverted.contains(1.0));
    }

    #[test]
    fn test_with_max_narrows_upper_bound() {
        let narrowed = Interval::new(0.001, f32::INFINITY).with_max(3.0);
        assert_eq!(narrowed.min, 0.001);
        assert!(narrowed.contains(3.0));
        assert!(!narrowed.contains(3.5));
    }

    #[test]
    fn test_universe() {
        assert!(Interval::UNIVERSE.contains(-1e10));
        assert!(Interval::UNIVERSE.contains(1e10));
        assert!(!Interval::UNIVERSE.contains(f32::NAN));
    }
}
