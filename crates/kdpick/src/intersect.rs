//! Ray-triangle intersection.

use bitflags::bitflags;
use kdpick_math::{Point3, Tolerance};

use crate::ray::Ray;

bitflags! {
    /// Faces of a triangle a ray may strike.
    ///
    /// The front face is the one the counter-clockwise winding normal points
    /// out of. Used both as a filter on queries and to report the face hit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Side: u8 {
        /// The face the winding normal points out of.
        const FRONT = 0b0000_0001;
        /// The opposite face.
        const BACK  = 0b0000_0010;
        /// Either face.
        const BOTH  = Self::FRONT.bits() | Self::BACK.bits();
    }
}

impl Default for Side {
    fn default() -> Self {
        Side::BOTH
    }
}

/// A ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Parameter along the ray.
    pub t: f64,
    /// Intersection point.
    pub point: Point3,
    /// Face that was struck, either [`Side::FRONT`] or [`Side::BACK`].
    pub side: Side,
    /// Barycentric weights of the point for the three corners.
    pub barycentric: [f64; 3],
}

/// Intersect a ray with the triangle `corners`.
///
/// Returns `None` when the ray is parallel to the triangle's plane (which
/// includes every degenerate triangle), when the plane is crossed at
/// `t <= 0`, or when the crossing lies outside the triangle. Points on an
/// edge within `tol.relative` of the triangle's area are accepted.
pub fn intersect_triangle(ray: &Ray, corners: &[Point3; 3], tol: &Tolerance) -> Option<TriangleHit> {
    let [v0, v1, v2] = corners;
    let normal = (v1 - v0).cross(&(v2 - v0));
    let denom = normal.dot(&ray.direction);

    if tol.is_negligible(denom, normal.norm() * ray.direction.norm()) {
        return None;
    }

    let t = normal.dot(&(v0 - ray.origin)) / denom;
    if t <= 0.0 {
        return None;
    }

    let point = ray.at(t);
    let area2 = normal.norm_squared();
    let slack = -tol.relative * area2;

    let mut barycentric = [0.0; 3];
    for (i, (a, b)) in [(v1, v2), (v2, v0), (v0, v1)].into_iter().enumerate() {
        let edge = (b - a).cross(&(point - a)).dot(&normal);
        if edge < slack {
            return None;
        }
        barycentric[i] = edge / area2;
    }

    let side = if denom < 0.0 { Side::FRONT } else { Side::BACK };

    Some(TriangleHit {
        t,
        point,
        side,
        barycentric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kdpick_math::Vec3;

    fn unit() -> [Point3; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_front_hit() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).unwrap();
        assert_relative_eq!(hit.t, 1.0);
        assert_relative_eq!(hit.point, Point3::new(0.25, 0.25, 0.0));
        assert_eq!(hit.side, Side::FRONT);
        assert_relative_eq!(hit.barycentric[0], 0.5);
        assert_relative_eq!(hit.barycentric[1], 0.25);
        assert_relative_eq!(hit.barycentric[2], 0.25);
    }

    #[test]
    fn test_back_hit() {
        let ray = Ray::new(Point3::new(0.25, 0.25, -2.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).unwrap();
        assert_relative_eq!(hit.t, 2.0);
        assert_eq!(hit.side, Side::BACK);
    }

    #[test]
    fn test_behind_origin() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).is_none());
    }

    #[test]
    fn test_miss_outside() {
        let ray = Ray::new(Point3::new(5.0, 5.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).is_none());
    }

    #[test]
    fn test_parallel_ray() {
        let ray = Ray::new(Point3::new(-1.0, 0.25, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).is_none());
    }

    #[test]
    fn test_edge_hit_accepted() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).unwrap();
        assert_relative_eq!(hit.barycentric[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_triangle_never_hit() {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        let ray = Ray::new(Point3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&ray, &corners, &Tolerance::DEFAULT).is_none());
    }

    #[test]
    fn test_unnormalized_direction_scales_t() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 4.0), Vec3::new(0.0, 0.0, -2.0));
        let hit = intersect_triangle(&ray, &unit(), &Tolerance::DEFAULT).unwrap();
        assert_relative_eq!(hit.t, 2.0);
    }

    #[test]
    fn test_side_mask() {
        assert!(Side::BOTH.contains(Side::FRONT));
        assert!(Side::BOTH.contains(Side::BACK));
        assert!(!Side::FRONT.intersects(Side::BACK));
        assert_eq!(Side::default(), Side::BOTH);
    }
}
