#![warn(missing_docs)]

//! Math types for the kdpick spatial index.
//!
//! Thin wrappers around nalgebra providing the point, vector and axis
//! types used by the kd-tree builder and ray traversal, together with the
//! tolerance constants shared by the geometric predicates.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in 2D texture space.
pub type Point2 = nalgebra::Point2<f64>;

/// One of the three coordinate axes.
///
/// The derived ordering (`X < Y < Z`) is part of the split event ordering
/// used by the kd-tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// All three axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis (`0`, `1` or `2`).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Absolute tolerance for ray parameters and coordinates.
    pub linear: f64,
    /// Relative tolerance for scale-free predicates (edge tests, parallelism).
    pub relative: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 absolute, 1e-9 relative).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        relative: 1e-9,
    };

    /// Check if `value` is effectively zero relative to `scale`.
    pub fn is_negligible(&self, value: f64, scale: f64) -> bool {
        value.abs() <= self.relative * scale.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_index() {
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
        assert_eq!(Point3::new(1.0, 2.0, 3.0)[Axis::Z.index()], 3.0);
    }

    #[test]
    fn test_axis_ordering() {
        assert!(Axis::X < Axis::Y);
        assert!(Axis::Y < Axis::Z);
    }

    #[test]
    fn test_tolerance_negligible_scales() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.is_negligible(1e-4, 1e6));
        assert!(!tol.is_negligible(1e-4, 1.0));
        assert!(tol.is_negligible(0.0, 0.0));
    }
}
