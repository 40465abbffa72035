//! Ray representation and the ray-voxel slab test.

use kdpick_math::{Axis, Point3, Vec3};

use crate::voxel::Voxel;

/// A ray in 3D space defined by origin and direction.
///
/// The direction is kept as given: ray parameters `t` are measured in units
/// of its length, and geometric distances are `t * |direction|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of travel (not necessarily unit length).
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// Whether the direction is the zero vector.
    pub fn is_degenerate(&self) -> bool {
        self.direction.iter().all(|&c| c == 0.0)
    }

    /// Intersect the ray with a voxel using the slab method.
    ///
    /// Returns `Some((t_min, t_max))` with `t_min` clamped to zero when the
    /// forward half of the ray overlaps the voxel grown by `tol`. Axes along
    /// which the direction is zero do not constrain the interval; the origin
    /// merely has to lie within that slab. A zero direction never hits.
    pub fn intersect_voxel(&self, voxel: &Voxel, tol: f64) -> Option<(f64, f64)> {
        if self.is_degenerate() {
            return None;
        }

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in Axis::ALL {
            let i = axis.index();
            let o = self.origin[i];
            let d = self.direction[i];
            let lo = voxel.lo(axis) - tol;
            let hi = voxel.hi(axis) + tol;

            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some((t_min.max(0.0), t_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Voxel {
        Voxel::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let p = ray.at(2.5);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_ray_voxel_hit() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let (t_min, t_max) = ray.intersect_voxel(&unit(), 0.0).unwrap();
        assert!((t_min - 5.0).abs() < 1e-10);
        assert!((t_max - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_voxel_miss_parallel_outside_slab() {
        let ray = Ray::new(Point3::new(-5.0, 5.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert!(ray.intersect_voxel(&unit(), 0.0).is_none());
    }

    #[test]
    fn test_ray_inside_voxel() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let (t_min, t_max) = ray.intersect_voxel(&unit(), 0.0).unwrap();
        assert_eq!(t_min, 0.0);
        assert!((t_max - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ray_voxel_behind() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::new(-1.0, 0.0, 0.0));
        assert!(ray.intersect_voxel(&unit(), 0.0).is_none());
    }

    #[test]
    fn test_ray_voxel_diagonal() {
        let ray = Ray::new(Point3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let (t_min, t_max) = ray.intersect_voxel(&unit(), 0.0).unwrap();
        assert!((t_min - 1.0).abs() < 1e-10);
        assert!((t_max - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vec3::zeros());
        assert!(ray.is_degenerate());
        assert!(ray.intersect_voxel(&unit(), 1e-9).is_none());
    }

    #[test]
    fn test_flat_voxel_needs_tolerance() {
        let flat = Voxel::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let ray = Ray::new(Point3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let (t_min, t_max) = ray.intersect_voxel(&flat, 1e-9).unwrap();
        assert!(t_min <= 1.0 && t_max >= 1.0);
    }
}
