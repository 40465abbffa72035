//! Axis-aligned boxes bounding kd-tree nodes.

use kdpick_math::{Axis, Point3, Vec3};

/// Axis-aligned box covering the region of a kd-tree node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voxel {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Voxel {
    /// Create a voxel from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) voxel suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Whether no point has been included yet.
    pub fn is_empty(&self) -> bool {
        Axis::ALL.iter().any(|&a| self.lo(a) > self.hi(a))
    }

    /// Expand this voxel to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Lower bound along `axis`.
    #[inline]
    pub fn lo(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    /// Upper bound along `axis`.
    #[inline]
    pub fn hi(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Total surface area of the six faces.
    ///
    /// A voxel that is flat along one axis still has the area of its two
    /// coincident faces.
    pub fn surface_area(&self) -> f64 {
        let d = self.size();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Whether `position` lies strictly between the bounds along `axis`.
    pub fn strictly_contains(&self, axis: Axis, position: f64) -> bool {
        position > self.lo(axis) && position < self.hi(axis)
    }

    /// Split into the voxels below and above `position` along `axis`.
    pub fn split(&self, axis: Axis, position: f64) -> (Voxel, Voxel) {
        let mut left = *self;
        let mut right = *self;
        left.max[axis.index()] = position;
        right.min[axis.index()] = position;
        (left, right)
    }

    /// Grow (or shrink, for negative `tol`) the voxel on every side.
    pub fn expanded(&self, tol: f64) -> Voxel {
        let offset = Vec3::new(tol, tol, tol);
        Voxel::new(self.min - offset, self.max + offset)
    }

    /// Clamp a point into the voxel.
    pub fn clamp_point(&self, p: &Point3) -> Point3 {
        Point3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Voxel {
        Voxel::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_surface_area() {
        assert!((unit().surface_area() - 6.0).abs() < 1e-12);
        let flat = Voxel::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 0.0));
        assert!((flat.surface_area() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_split() {
        let (left, right) = unit().split(Axis::Y, 0.25);
        assert_eq!(left.hi(Axis::Y), 0.25);
        assert_eq!(left.lo(Axis::Y), 0.0);
        assert_eq!(right.lo(Axis::Y), 0.25);
        assert_eq!(right.hi(Axis::Y), 1.0);
        assert_eq!(left.hi(Axis::X), 1.0);
        let total = left.surface_area() + right.surface_area();
        assert!(total > unit().surface_area());
    }

    #[test]
    fn test_empty_expands() {
        let mut v = Voxel::empty();
        assert!(v.is_empty());
        v.include_point(&Point3::new(1.0, 2.0, 3.0));
        assert!(!v.is_empty());
        assert_eq!(v.min, v.max);
        v.include_point(&Point3::new(-1.0, 5.0, 0.0));
        assert_eq!(v.min, Point3::new(-1.0, 2.0, 0.0));
        assert_eq!(v.max, Point3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn test_strictly_contains() {
        let v = unit();
        assert!(v.strictly_contains(Axis::X, 0.5));
        assert!(!v.strictly_contains(Axis::X, 0.0));
        assert!(!v.strictly_contains(Axis::X, 1.0));
    }

    #[test]
    fn test_expanded_grows_and_shrinks() {
        let grown = unit().expanded(0.5);
        assert_eq!(grown.min, Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(grown.max, Point3::new(1.5, 1.5, 1.5));
        let shrunk = unit().expanded(-0.25);
        assert_eq!(shrunk.size(), Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(
            shrunk.clamp_point(&Point3::new(0.0, 0.5, 2.0)),
            Point3::new(0.25, 0.5, 0.75)
        );
    }
}
