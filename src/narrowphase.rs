use glam::Vec2;

use crate::api::NarrowphaseApi;

/// Narrowphase primitive tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn ray_aabb(origin: Vec2, dir: Vec2, aabb_min: Vec2, aabb_max: Vec2) -> Option<(f32, Vec2)> {
        // Slab method with normal tracking; returns earliest t >= 0
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        let mut n_enter = Vec2::ZERO;

        for axis in 0..2 {
            let (o, d, lo, hi) = (origin[axis], dir[axis], aabb_min[axis], aabb_max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t1 = (lo - o) * inv;
            let mut t2 = (hi - o) * inv;
            let mut n = -1.0;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
                n = 1.0;
            }
            if t1 > tmin {
                tmin = t1;
                n_enter = Vec2::ZERO;
                n_enter[axis] = n;
            }
            if t2 < tmax {
                tmax = t2;
            }
            if tmin > tmax {
                return None;
            }
        }

        // Box entirely behind the ray
        if tmax < 0.0 {
            return None;
        }
        // Origin inside: immediate hit with no meaningful normal
        if tmin < 0.0 {
            return Some((0.0, Vec2::ZERO));
        }
        Some((tmin, n_enter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_aabb_axis_aligned() {
        let min = Vec2::new(2.0, -1.0);
        let max = Vec2::new(3.0, 1.0);
        let (t, n) = Narrowphase::ray_aabb(Vec2::ZERO, Vec2::X, min, max).unwrap();
        assert!((t - 2.0).abs() < 1e-6);
        assert_eq!(n, Vec2::new(-1.0, 0.0));

        // Pointing away
        assert!(Narrowphase::ray_aabb(Vec2::ZERO, -Vec2::X, min, max).is_none());
        // Parallel and outside the slab
        assert!(Narrowphase::ray_aabb(Vec2::new(0.0, 2.0), Vec2::X, min, max).is_none());
    }

    #[test]
    fn test_ray_aabb_downward_normal() {
        let (t, n) = Narrowphase::ray_aabb(
            Vec2::new(0.0, 1.0),
            -Vec2::Y,
            Vec2::new(-5.0, -1.0),
            Vec2::new(5.0, 0.0),
        )
        .unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        assert_eq!(n, Vec2::Y);
    }

    #[test]
    fn test_ray_aabb_origin_inside() {
        let (min, max) = (Vec2::splat(-1.0), Vec2::splat(1.0));
        let (t, n) = Narrowphase::ray_aabb(Vec2::ZERO, Vec2::X, min, max).unwrap();
        assert_eq!(t, 0.0);
        assert_eq!(n, Vec2::ZERO);
    }
}
